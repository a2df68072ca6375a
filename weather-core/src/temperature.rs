//! Temperature unit conversion.
//!
//! Replies carry values cut to two decimal places by truncation toward zero
//! (`trunc(v * 100) / 100`), not by rounding: `1.239` becomes `1.23` and
//! `-1.239` becomes `-1.23`.

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

/// Adding `0.0` turns a `-0.0` result into `0.0`, so it serializes as `0`.
pub fn truncate_2dp(value: f64) -> f64 {
    (value * 100.0).trunc() / 100.0 + 0.0
}
