//! Core library for the weather-by-postal-code service.
//!
//! This crate defines:
//! - Configuration handling
//! - Postal code validation
//! - Abstractions over the postal lookup and weather providers, with
//!   ViaCEP and WeatherAPI.com implementations
//! - Temperature conversion and the reply model
//! - The lookup pipeline and its error taxonomy
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod cep;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod temperature;

pub use cep::{Cep, CepError};
pub use config::Config;
pub use error::{ForecastError, PostalLookupError, WeatherFetchError};
pub use model::{CurrentWeather, Locality, WeatherReply};
pub use provider::{PostalLookup, WeatherProvider};
pub use service::WeatherService;
