use serde::{Deserialize, Serialize};

use crate::temperature;

/// A postal code resolved to a city and its state (UF).
///
/// Both parts are non-empty; incomplete lookup records never become a `Locality`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    pub city: String,
    pub state: String,
}

impl Locality {
    /// Location string sent to the weather provider, e.g. `São Paulo,SP`.
    pub fn query(&self) -> String {
        format!("{},{}", self.city, self.state)
    }
}

/// Current conditions as reported by a weather provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentWeather {
    pub temperature_c: f64,
}

/// Body of a successful `/weather` reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReply {
    pub temp_c: f64,
    pub temp_f: f64,
    pub temp_k: f64,
}

impl WeatherReply {
    /// Derive all three readings from Celsius, truncating each to two decimals.
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            temp_c: temperature::truncate_2dp(celsius),
            temp_f: temperature::truncate_2dp(temperature::celsius_to_fahrenheit(celsius)),
            temp_k: temperature::truncate_2dp(temperature::celsius_to_kelvin(celsius)),
        }
    }
}

impl From<CurrentWeather> for WeatherReply {
    fn from(current: CurrentWeather) -> Self {
        Self::from_celsius(current.temperature_c)
    }
}
