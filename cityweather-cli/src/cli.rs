use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, ForecastData, View, WeatherState, WeatherStore, config::DEFAULT_BASE_URL,
    provider_from_config,
};
use inquire::{Confirm, InquireError, Password, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and 5-day forecast by city")]
pub struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key, base URL and default city.
    Configure,

    /// Show current conditions for a city.
    Current {
        /// City name; defaults to the configured default city.
        city: Option<String>,
    },

    /// Show the 5-day forecast for a city, one line per day.
    Forecast {
        city: Option<String>,
    },

    /// Show current conditions followed by the forecast.
    Show {
        city: Option<String>,
    },

    /// Search cities interactively until cancelled.
    Search,
}

/// Which parts of a populated state to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Current,
    Forecast,
    Both,
}

impl Screen {
    fn error_prefix(&self) -> &'static str {
        match self {
            Screen::Forecast => "Error loading forecast data",
            Screen::Current | Screen::Both => "Error loading weather data",
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { city } => lookup(city, Screen::Current, self.json).await,
            Command::Forecast { city } => lookup(city, Screen::Forecast, self.json).await,
            Command::Show { city } => lookup(city, Screen::Both, self.json).await,
            Command::Search => search_loop(self.json).await,
        }
    }
}

fn open_store() -> anyhow::Result<(WeatherStore, Config)> {
    let config = Config::load()?;
    tracing::debug!(
        base_url = %config.base_url,
        city = %config.default_city,
        "loaded configuration"
    );
    let provider = provider_from_config(&config)?;
    let store = WeatherStore::new(provider, config.default_city.clone());
    Ok((store, config))
}

async fn lookup(city: Option<String>, screen: Screen, json: bool) -> anyhow::Result<()> {
    let (store, config) = open_store()?;
    let city = city.unwrap_or(config.default_city);

    let Some(state) = store.search(&city).await else {
        bail!("City name must not be empty");
    };

    if let Some(message) = &state.error {
        if json {
            print_state(&state, screen, json)?;
        }
        bail!("{}: {message}", screen.error_prefix());
    }

    print_state(&state, screen, json)
}

async fn search_loop(json: bool) -> anyhow::Result<()> {
    let (store, _) = open_store()?;

    loop {
        let initial = store.state().city;
        let input = match Text::new("Search for a city...").with_initial_value(&initial).prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        // Blank input is ignored and never reaches the network.
        let Some(mut state) = store.search(&input).await else {
            continue;
        };

        loop {
            print_state(&state, Screen::Both, json)?;
            if state.error.is_none() {
                break;
            }
            let again = match Confirm::new("Try again?").with_default(true).prompt() {
                Ok(again) => again,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => false,
                Err(err) => return Err(err).context("Failed to read retry answer"),
            };
            if !again {
                break;
            }
            state = store.retry().await;
        }
    }

    Ok(())
}

fn print_state(state: &WeatherState, screen: Screen, json: bool) -> anyhow::Result<()> {
    if json {
        let value = match state.view() {
            View::Ready { current, forecast } => match screen {
                Screen::Current => serde_json::to_value(current)?,
                Screen::Forecast => serde_json::to_value(forecast)?,
                Screen::Both => serde_json::json!({ "current": current, "forecast": forecast }),
            },
            View::Error(message) => serde_json::json!({ "error": message }),
            View::Loading | View::Empty => serde_json::Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", screen_text(state, screen));
    Ok(())
}

fn screen_text(state: &WeatherState, screen: Screen) -> String {
    match state.view() {
        View::Loading => "Loading weather data...".to_string(),
        View::Error(message) => format!("{}: {message}", screen.error_prefix()),
        View::Ready { current, forecast } => match screen {
            Screen::Current => render::weather_card(current),
            Screen::Forecast => forecast_section(forecast),
            Screen::Both => {
                format!("{}\n\n{}", render::weather_card(current), forecast_section(forecast))
            }
        },
        View::Empty => "No weather data available. Try searching for a city.".to_string(),
    }
}

fn forecast_section(forecast: &ForecastData) -> String {
    if forecast.is_empty() {
        return "No forecast data available. Try searching for a city.".to_string();
    }
    format!("5-Day Forecast\n\n{}", render::forecast_list(&forecast.by_day()))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    config.base_url = Text::new("API base URL:")
        .with_default(DEFAULT_BASE_URL)
        .with_initial_value(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    let city = Text::new("Default city:")
        .with_initial_value(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use cityweather_core::{RequestId, WeatherAction, WeatherData};

    fn weather() -> WeatherData {
        WeatherData {
            city: "Cairo".into(),
            country: "EG".into(),
            temperature_c: 31.0,
            feels_like_c: 30.0,
            description: "sunny".into(),
            icon: "01d".into(),
            humidity_pct: 20,
            wind_speed_mps: 4.0,
            observed_at: DateTime::from_timestamp(1_709_553_600, 0).expect("valid timestamp"),
            utc_offset_secs: 7200,
        }
    }

    fn started() -> WeatherState {
        WeatherState::new("Cairo").reduce(WeatherAction::FetchStart {
            request: RequestId(1),
            city: "Cairo".into(),
        })
    }

    #[test]
    fn parses_subcommands_and_global_json() {
        let args = ["cityweather", "forecast", "Rio de Janeiro", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Forecast { city: Some(ref c) } if c == "Rio de Janeiro"
        ));

        let cli = Cli::try_parse_from(["cityweather", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None }));
    }

    #[test]
    fn loading_and_empty_screens() {
        assert_eq!(screen_text(&started(), Screen::Both), "Loading weather data...");
        assert_eq!(
            screen_text(&WeatherState::new("Cairo"), Screen::Current),
            "No weather data available. Try searching for a city."
        );
    }

    #[test]
    fn error_screen_uses_screen_prefix() {
        let state = started().reduce(WeatherAction::FetchError {
            request: RequestId(1),
            message: "boom".into(),
        });

        assert_eq!(screen_text(&state, Screen::Current), "Error loading weather data: boom");
        assert_eq!(screen_text(&state, Screen::Forecast), "Error loading forecast data: boom");
    }

    #[test]
    fn ready_screens_render_card_and_forecast() {
        let state = started().reduce(WeatherAction::FetchSuccess {
            request: RequestId(1),
            current: weather(),
            forecast: ForecastData {
                list: vec![weather()],
            },
        });

        let current = screen_text(&state, Screen::Current);
        assert!(current.starts_with("Cairo, EG"));
        assert!(current.contains("(hot)"));

        let forecast = screen_text(&state, Screen::Forecast);
        assert!(forecast.starts_with("5-Day Forecast"));
        assert!(forecast.contains("Monday"));

        let both = screen_text(&state, Screen::Both);
        assert!(both.contains("Cairo, EG") && both.contains("5-Day Forecast"));
    }

    #[test]
    fn empty_forecast_has_placeholder() {
        let state = started().reduce(WeatherAction::FetchSuccess {
            request: RequestId(1),
            current: weather(),
            forecast: ForecastData::default(),
        });

        assert_eq!(
            screen_text(&state, Screen::Forecast),
            "No forecast data available. Try searching for a city."
        );

        let both = screen_text(&state, Screen::Both);
        assert!(both.starts_with("Cairo, EG"));
        assert!(both.ends_with("\n\nNo forecast data available. Try searching for a city."));
        assert!(!both.contains("5-Day Forecast"));
    }
}
