//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeather client
//! - Shared domain models and forecast grouping by day
//! - A reducer-driven state store for search submissions
//!
//! It is used by `cityweather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod store;

pub use config::Config;
pub use error::{Endpoint, FetchError};
pub use forecast::{DayForecast, group_by_day};
pub use model::{ForecastData, TemperatureBand, WeatherData};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{RequestId, View, WeatherAction, WeatherState, WeatherStore};
