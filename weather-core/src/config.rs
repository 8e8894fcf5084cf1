use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_FORECAST_DAYS: u8 = 1;
pub const DEFAULT_HISTORY_DAYS: u32 = 6;

/// Longest daily forecast OpenWeather serves.
pub const MAX_FORECAST_DAYS: u8 = 16;
/// Each history day is one metered call.
pub const MAX_HISTORY_DAYS: u32 = 30;

/// Base URLs of the OpenWeather endpoints used by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocode: String,
    pub current: String,
    pub forecast: String,
    pub history: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://api.openweathermap.org/geo/1.0/direct".into(),
            current: "https://api.openweathermap.org/data/2.5/weather".into(),
            forecast: "https://api.openweathermap.org/data/2.5/forecast/daily".into(),
            history: "https://history.openweathermap.org/data/2.5/history/city".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,

    /// Applied to the outbound HTTP client by the binary. The core itself
    /// sets no timeout.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:8080".into(), request_timeout_secs: None }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// forecast_days = 1
///
/// [server]
/// bind = "0.0.0.0:8080"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub forecast_days: u8,
    pub history_days: u32,
    pub endpoints: Endpoints,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            forecast_days: DEFAULT_FORECAST_DAYS,
            history_days: DEFAULT_HISTORY_DAYS,
            endpoints: Endpoints::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Everything the OpenWeather client needs, injected at construction.
#[derive(Clone, PartialEq)]
pub struct OpenWeatherSettings {
    pub api_key: String,
    pub geocode_base_url: String,
    pub weather_base_url: String,
    pub forecast_base_url: String,
    pub history_base_url: String,
}

impl OpenWeatherSettings {
    /// Point every endpoint at one base URL; handy against a local stub.
    pub fn with_base_url(api_key: impl Into<String>, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api_key: api_key.into(),
            geocode_base_url: format!("{base}/geo/1.0/direct"),
            weather_base_url: format!("{base}/data/2.5/weather"),
            forecast_base_url: format!("{base}/data/2.5/forecast/daily"),
            history_base_url: format!("{base}/data/2.5/history/city"),
        }
    }
}

impl std::fmt::Debug for OpenWeatherSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherSettings")
            .field("api_key", &"<redacted>")
            .field("geocode_base_url", &self.geocode_base_url)
            .field("weather_base_url", &self.weather_base_url)
            .field("forecast_base_url", &self.forecast_base_url)
            .field("history_base_url", &self.history_base_url)
            .finish()
    }
}

impl Config {
    /// Load config from `path`, or an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "weather-service", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Replace the stored key with the environment override, if set.
    pub fn apply_env(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Reject day counts the provider can't serve or that would flood it.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast_days) {
            return Err(anyhow!(
                "forecast_days must be between 1 and {MAX_FORECAST_DAYS}, got {}",
                self.forecast_days
            ));
        }
        if !(1..=MAX_HISTORY_DAYS).contains(&self.history_days) {
            return Err(anyhow!(
                "history_days must be between 1 and {MAX_HISTORY_DAYS}, got {}",
                self.history_days
            ));
        }
        Ok(())
    }

    /// Build the client settings, failing when no key is configured or the
    /// day counts are out of range.
    pub fn openweather_settings(&self) -> Result<OpenWeatherSettings> {
        self.validate()?;

        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })?;

        Ok(OpenWeatherSettings {
            api_key: api_key.to_owned(),
            geocode_base_url: self.endpoints.geocode.clone(),
            weather_base_url: self.endpoints.current.clone(),
            forecast_base_url: self.endpoints.forecast.clone(),
            history_base_url: self.endpoints.history.clone(),
        })
    }
}
