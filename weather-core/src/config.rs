use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::provider::{viacep, weatherapi};

/// Address the HTTP server listens on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

/// Postal lookup service (ViaCEP).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepConfig {
    pub base_url: String,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self { base_url: viacep::DEFAULT_BASE_URL.to_string() }
    }
}

/// Weather service (WeatherAPI.com).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self { base_url: weatherapi::DEFAULT_BASE_URL.to_string(), api_key: None }
    }
}

/// Outbound HTTP settings shared by both providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means the transport defaults apply.
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [server]
/// port = 8080
///
/// [weatherapi]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub viacep: ViaCepConfig,
    pub weatherapi: WeatherApiConfig,
    pub http: HttpConfig,
}

pub const ENV_HOST: &str = "WEATHER_SERVER_HOST";
pub const ENV_PORT: &str = "WEATHER_SERVER_PORT";
pub const ENV_VIACEP_BASE_URL: &str = "VIACEP_BASE_URL";
pub const ENV_WEATHERAPI_BASE_URL: &str = "WEATHERAPI_BASE_URL";
pub const ENV_WEATHERAPI_KEY: &str = "WEATHERAPI_KEY";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WEATHER_HTTP_TIMEOUT_SECS";

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-cep", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<()> {
        self.apply_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = var(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = var(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }
        if let Some(url) = var(ENV_VIACEP_BASE_URL) {
            self.viacep.base_url = url;
        }
        if let Some(url) = var(ENV_WEATHERAPI_BASE_URL) {
            self.weatherapi.base_url = url;
        }
        if let Some(key) = var(ENV_WEATHERAPI_KEY) {
            self.weatherapi.api_key = Some(key);
        }
        if let Some(secs) = var(ENV_HTTP_TIMEOUT_SECS) {
            let secs = secs.trim().parse().with_context(|| {
                format!("{ENV_HTTP_TIMEOUT_SECS} must be a number of seconds, got '{secs}'")
            })?;
            self.http.timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// Set/replace the WeatherAPI key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.weatherapi.api_key = Some(api_key);
    }

    /// Returns the WeatherAPI key, if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.weatherapi.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for WeatherAPI.\n\
                 Hint: run `weather-server configure` or set {ENV_WEATHERAPI_KEY}."
            )
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
