//! Application-wide weather state, mutated only through [`WeatherAction`]s.
//!
//! Every search is tagged with a [`RequestId`]. Results that arrive for a
//! search other than the most recent one are dropped by the reducer, so the
//! last search submitted always wins regardless of response order.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    model::{ForecastData, WeatherData},
    provider::WeatherProvider,
};

/// Identifies one search submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherState {
    pub current_weather: Option<WeatherData>,
    pub forecast: Option<ForecastData>,
    pub loading: bool,
    pub error: Option<String>,
    /// Active search key; also what a retry re-issues.
    pub city: String,
    pub pending: Option<RequestId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherAction {
    FetchStart { request: RequestId, city: String },
    FetchSuccess {
        request: RequestId,
        current: WeatherData,
        forecast: ForecastData,
    },
    FetchError { request: RequestId, message: String },
    SetCity(String),
}

/// What a screen should show for a given state.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Ready {
        current: &'a WeatherData,
        forecast: &'a ForecastData,
    },
    Empty,
}

impl WeatherState {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            current_weather: None,
            forecast: None,
            loading: false,
            error: None,
            city: city.into(),
            pending: None,
        }
    }

    pub fn reduce(mut self, action: WeatherAction) -> Self {
        self.apply(action);
        self
    }

    pub fn apply(&mut self, action: WeatherAction) {
        match action {
            WeatherAction::FetchStart { request, city } => {
                self.loading = true;
                self.error = None;
                self.city = city;
                self.pending = Some(request);
            }
            WeatherAction::FetchSuccess { request, current, forecast } => {
                if !self.is_pending(request) {
                    tracing::debug!(?request, "dropping stale weather result");
                    return;
                }
                self.loading = false;
                self.current_weather = Some(current);
                self.forecast = Some(forecast);
                self.error = None;
                self.pending = None;
            }
            WeatherAction::FetchError { request, message } => {
                if !self.is_pending(request) {
                    tracing::debug!(?request, "dropping stale weather error");
                    return;
                }
                self.loading = false;
                self.current_weather = None;
                self.forecast = None;
                self.error = Some(message);
                self.pending = None;
            }
            WeatherAction::SetCity(city) => {
                self.city = city;
            }
        }
    }

    fn is_pending(&self, request: RequestId) -> bool {
        self.pending == Some(request)
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            return View::Loading;
        }
        if let Some(message) = &self.error {
            return View::Error(message);
        }
        match (&self.current_weather, &self.forecast) {
            (Some(current), Some(forecast)) => View::Ready { current, forecast },
            _ => View::Empty,
        }
    }
}

/// Single owner of [`WeatherState`]; observers subscribe to changes.
#[derive(Debug)]
pub struct WeatherStore {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<WeatherState>,
    next_request: AtomicU64,
}

impl WeatherStore {
    pub fn new(provider: Arc<dyn WeatherProvider>, initial_city: impl Into<String>) -> Self {
        let (state, _) = watch::channel(WeatherState::new(initial_city));
        Self {
            provider,
            state,
            next_request: AtomicU64::new(1),
        }
    }

    pub fn dispatch(&self, action: WeatherAction) {
        self.state.send_modify(|state| state.apply(action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn set_city(&self, city: impl Into<String>) {
        self.dispatch(WeatherAction::SetCity(city.into()));
    }

    /// Trim `input` and search for it. Blank input is ignored without any request.
    pub async fn search(&self, input: &str) -> Option<WeatherState> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }
        Some(self.fetch_weather_data(city).await)
    }

    /// Re-issue the search for the active city.
    pub async fn retry(&self) -> WeatherState {
        let city = self.state.borrow().city.clone();
        self.fetch_weather_data(&city).await
    }

    /// Fetch current weather and forecast together and publish the outcome.
    ///
    /// `loading` is set before the first await. If either call fails, both
    /// results are discarded and the error message is published instead.
    pub async fn fetch_weather_data(&self, city: &str) -> WeatherState {
        let request = RequestId(self.next_request.fetch_add(1, Ordering::Relaxed));
        self.dispatch(WeatherAction::FetchStart {
            request,
            city: city.to_string(),
        });
        tracing::info!(city, ?request, "fetching weather");

        let result = tokio::try_join!(
            self.provider.fetch_weather(city),
            self.provider.fetch_forecast(city),
        );

        let action = match result {
            Ok((current, forecast)) => {
                tracing::debug!(city, entries = forecast.list.len(), "weather fetched");
                WeatherAction::FetchSuccess {
                    request,
                    current,
                    forecast,
                }
            }
            Err(err) => {
                tracing::warn!(city, error = %err, "weather fetch failed");
                WeatherAction::FetchError {
                    request,
                    message: err.to_string(),
                }
            }
        };
        self.dispatch(action);

        self.state()
    }
}
