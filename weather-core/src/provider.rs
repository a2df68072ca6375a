use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    Cep, Config, CurrentWeather, Locality,
    config::HttpConfig,
    error::{PostalLookupError, WeatherFetchError},
    provider::{viacep::ViaCepClient, weatherapi::WeatherApiProvider},
};

pub mod viacep;
pub mod weatherapi;

const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Resolves a postal code to the city and state it belongs to.
#[async_trait]
pub trait PostalLookup: Send + Sync + Debug {
    async fn lookup(&self, cep: &Cep) -> Result<Locality, PostalLookupError>;
}

/// Reports current conditions for a resolved locality.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, locality: &Locality) -> Result<CurrentWeather, WeatherFetchError>;
}

/// Build the HTTP client shared by both providers.
pub fn http_client(config: &HttpConfig) -> anyhow::Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Construct the postal lookup client from config.
pub fn postal_lookup_from_config(config: &Config, http: Client) -> Box<dyn PostalLookup> {
    Box::new(ViaCepClient::new(config.viacep.base_url.clone(), http))
}

/// Construct the weather provider from config. Fails when no API key is set.
pub fn weather_provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    Ok(Box::new(WeatherApiProvider::new(
        config.weatherapi.base_url.clone(),
        api_key.to_owned(),
        http,
    )))
}

/// Join a base URL and a path without doubling the slash.
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Shorten an upstream body for logging.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(join_url("http://x/ws", "01001000/json/"), "http://x/ws/01001000/json/");
        assert_eq!(join_url("http://x/ws/", "/current.json"), "http://x/ws/current.json");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "ã".repeat(300);
        let short = truncate_body(&body);

        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn weather_provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let http = http_client(&cfg.http).expect("client");
        let err = weather_provider_from_config(&cfg, http).unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn weather_provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        let http = http_client(&cfg.http).expect("client");

        assert!(weather_provider_from_config(&cfg, http).is_ok());
    }
}
