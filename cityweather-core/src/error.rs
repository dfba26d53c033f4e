use std::fmt;

use reqwest::StatusCode;

/// Which upstream resource a request targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Weather,
    Forecast,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Weather => "Weather",
            Endpoint::Forecast => "Forecast",
        })
    }
}

/// Failure of a single call to the weather provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Could not reach the weather service: {0}")]
    Request(reqwest::Error),

    #[error("{endpoint} data not found (HTTP {status})")]
    NotFound {
        endpoint: Endpoint,
        status: StatusCode,
    },

    #[error("{endpoint} data could not be read: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for FetchError {
    /// Strips the request URL, which carries the API key as a query parameter.
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.without_url())
    }
}
