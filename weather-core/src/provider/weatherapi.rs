use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{CurrentWeather, Locality, error::WeatherFetchError};

use super::{WeatherProvider, join_url, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Clone)]
pub struct WeatherApiProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl WeatherApiProvider {
    pub fn new(base_url: String, api_key: String, http: Client) -> Self {
        Self { base_url, api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, locality: &Locality) -> Result<CurrentWeather, WeatherFetchError> {
        let url = join_url(&self.base_url, "current.json");
        let q = locality.query();
        tracing::info!(location = %q, "querying weather service");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str())])
            .send()
            .await
            .map_err(|err| WeatherFetchError::Transport(err.without_url()))?;

        let status = res.status();
        tracing::debug!(%status, "weather service status");

        // Anything but a plain 200 (including other 2xx) means no usable reading.
        if status != StatusCode::OK {
            return Err(WeatherFetchError::Status(status));
        }

        // The request URL carries the API key; keep it out of error text.
        let body = res.text().await.map_err(|err| WeatherFetchError::Body(err.without_url()))?;

        let parsed: WaResponse = serde_json::from_str(&body).map_err(|err| {
            tracing::debug!(body = %truncate_body(&body), "unexpected weather payload");
            WeatherFetchError::Parse(err)
        })?;

        Ok(CurrentWeather { temperature_c: parsed.current.temp_c })
    }
}
