use crate::{
    Config, FetchError, ForecastData, WeatherData, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current conditions and forecasts for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, FetchError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastData, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(&config.base_url, api_key.to_owned())?;
    Ok(Arc::new(provider))
}
