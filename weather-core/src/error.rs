//! Error types for each step of the postal code → weather pipeline.
//!
//! Every step has its own error enum so callers can log the precise cause.
//! [`ForecastError`] folds them into the four outcomes a client can observe;
//! its `Display` text is the fixed message returned to HTTP clients.

use reqwest::StatusCode;
use thiserror::Error;

use crate::cep::CepError;

#[derive(Debug, Error)]
pub enum PostalLookupError {
    #[error("request to postal lookup service failed")]
    Transport(#[source] reqwest::Error),

    #[error("postal lookup service answered with status {0}")]
    Status(StatusCode),

    #[error("failed to parse postal lookup response")]
    Parse(#[source] serde_json::Error),

    #[error("postal code {0} does not exist")]
    NotFound(String),

    #[error("postal code {0} resolved to a record without city or state")]
    Incomplete(String),
}

#[derive(Debug, Error)]
pub enum WeatherFetchError {
    #[error("request to weather service failed")]
    Transport(#[source] reqwest::Error),

    #[error("weather service answered with status {0}")]
    Status(StatusCode),

    #[error("failed to read weather response body")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse weather response")]
    Parse(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid zipcode")]
    InvalidFormat(#[from] CepError),

    #[error("can not find zipcode")]
    LookupFailed(#[from] PostalLookupError),

    #[error("can not find weather")]
    WeatherUnavailable(#[source] WeatherFetchError),

    #[error("weather parser error")]
    WeatherParse(#[source] WeatherFetchError),
}

impl From<WeatherFetchError> for ForecastError {
    fn from(err: WeatherFetchError) -> Self {
        match err {
            WeatherFetchError::Transport(_) | WeatherFetchError::Status(_) => {
                ForecastError::WeatherUnavailable(err)
            }
            WeatherFetchError::Body(_) | WeatherFetchError::Parse(_) => {
                ForecastError::WeatherParse(err)
            }
        }
    }
}

impl ForecastError {
    /// The full cause chain, e.g. `can not find zipcode: postal code 99999999 does not exist`.
    pub fn cause_chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}
