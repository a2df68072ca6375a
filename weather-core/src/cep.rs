use std::{fmt, str::FromStr};

use thiserror::Error;

/// Number of digits in a CEP, with no separators.
pub const CEP_LEN: usize = 8;

/// A Brazilian postal code that has passed format validation.
///
/// Only exactly eight ASCII digits are accepted: `01001-000`, `" 01001000"`
/// and `"0100100"` are all rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CepError {
    #[error("postal code is missing")]
    Missing,

    #[error("postal code {0:?} is not exactly {CEP_LEN} digits")]
    Malformed(String),
}

impl Cep {
    /// Validate an optional raw query value.
    pub fn parse(raw: Option<&str>) -> Result<Self, CepError> {
        match raw {
            None | Some("") => Err(CepError::Missing),
            Some(value) => value.parse(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cep {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CepError::Missing);
        }

        if s.len() != CEP_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CepError::Malformed(s.to_string()));
        }

        Ok(Cep(s.to_string()))
    }
}

impl TryFrom<&str> for Cep {
    type Error = CepError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
