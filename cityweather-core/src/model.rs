use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::{DayForecast, group_by_day};

/// One weather observation or forecast entry for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub observed_at: DateTime<Utc>,
    /// Shift of the city's local time from UTC, in seconds.
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl WeatherData {
    /// Observation time in the city's own offset. Out-of-range offsets fall back to UTC.
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix());
        self.observed_at.with_timezone(&offset)
    }

    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }

    pub fn temperature_band(&self) -> TemperatureBand {
        TemperatureBand::from_celsius(self.temperature_c)
    }
}

/// Three-hour forecast entries across the next five days, in API order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    pub list: Vec<WeatherData>,
}

impl ForecastData {
    pub fn by_day(&self) -> Vec<DayForecast<'_>> {
        group_by_day(&self.list)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Coarse classification of a temperature, used to pick an accent for the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Hot,
    Warm,
    Mild,
    Cold,
}

impl TemperatureBand {
    pub fn from_celsius(temp: f64) -> Self {
        if temp > 30.0 {
            Self::Hot
        } else if temp > 20.0 {
            Self::Warm
        } else if temp > 10.0 {
            Self::Mild
        } else {
            Self::Cold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Mild => "mild",
            Self::Cold => "cold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temp: f64, offset: i32) -> WeatherData {
        WeatherData {
            city: "Tokyo".into(),
            country: "JP".into(),
            temperature_c: temp,
            feels_like_c: temp,
            description: "clear sky".into(),
            icon: "01d".into(),
            humidity_pct: 40,
            wind_speed_mps: 2.5,
            observed_at: DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
            utc_offset_secs: offset,
        }
    }

    #[test]
    fn temperature_bands_use_strict_thresholds() {
        assert_eq!(TemperatureBand::from_celsius(30.5), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::from_celsius(30.0), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::from_celsius(20.0), TemperatureBand::Mild);
        assert_eq!(TemperatureBand::from_celsius(10.0), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::from_celsius(-5.0), TemperatureBand::Cold);
        assert_eq!(sample(25.0, 0).temperature_band(), TemperatureBand::Warm);
    }

    #[test]
    fn local_time_applies_city_offset() {
        // 2023-11-14T22:13:20Z
        let data = sample(10.0, 9 * 3600);
        let local = data.local_time();
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2023-11-15 07:13");
    }

    #[test]
    fn local_time_falls_back_to_utc_for_bogus_offset() {
        let data = sample(10.0, 100 * 3600);
        assert_eq!(data.local_time().offset().local_minus_utc(), 0);
    }

    #[test]
    fn icon_url_uses_double_density_asset() {
        assert_eq!(sample(1.0, 0).icon_url(), "https://openweathermap.org/img/wn/01d@2x.png");
    }

    #[test]
    fn observed_at_serializes_as_unix_seconds() {
        let json = serde_json::to_value(sample(1.0, 0)).expect("serialize");
        assert_eq!(json["observed_at"], 1_700_000_000);
    }
}
