use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::{Endpoint, FetchError},
    model::{ForecastData, WeatherData},
};

use super::WeatherProvider;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        city: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        tracing::debug!(%url, city, "requesting OpenWeather {}", endpoint.path());

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(
                %status,
                body = %truncate_body(&body),
                "OpenWeather {} request failed",
                endpoint.path()
            );
            return Err(FetchError::NotFound { endpoint, status });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// Fields shared by current and forecast payloads.
struct Reading<'a> {
    dt: i64,
    main: &'a OwMain,
    weather: &'a [OwWeather],
    wind: &'a OwWind,
}

impl Reading<'_> {
    fn into_weather(self, city: &str, country: &str, utc_offset_secs: i32) -> WeatherData {
        let (description, icon) = self
            .weather
            .first()
            .map(|w| (w.description.clone(), w.icon.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        WeatherData {
            city: city.to_string(),
            country: country.to_string(),
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            description,
            icon,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            observed_at: unix_to_utc(self.dt),
            utc_offset_secs,
        }
    }
}

impl From<OwCurrentResponse> for WeatherData {
    fn from(r: OwCurrentResponse) -> Self {
        let reading = Reading {
            dt: r.dt,
            main: &r.main,
            weather: &r.weather,
            wind: &r.wind,
        };
        reading.into_weather(&r.name, &r.sys.country, r.timezone)
    }
}

impl From<OwForecastResponse> for ForecastData {
    fn from(r: OwForecastResponse) -> Self {
        let list = r
            .list
            .iter()
            .map(|e| {
                let reading = Reading {
                    dt: e.dt,
                    main: &e.main,
                    weather: &e.weather,
                    wind: &e.wind,
                };
                reading.into_weather(&r.city.name, &r.city.country, r.city.timezone)
            })
            .collect();

        ForecastData { list }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, FetchError> {
        let parsed: OwCurrentResponse = self.get_json(Endpoint::Weather, city).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastData, FetchError> {
        let parsed: OwForecastResponse = self.get_json(Endpoint::Forecast, city).await?;
        Ok(parsed.into())
    }
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
