use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::state::DEFAULT_CITY;

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the default `https://api.openweathermap.org/data/2.5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City looked up on startup. Falls back to "London".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_city: Option<String>,

    /// Example TOML:
    /// [openweather]
    /// api_key = "..."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<ProviderConfig>,
}

impl Config {
    /// Load from the platform config file; an absent file is an empty config.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load from disk and apply the `OPENWEATHER_API_KEY` override.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env_api_key(env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file: {}", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Write as TOML, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let text = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// `config.toml` under the platform config dir, e.g. `~/.config/weather-lookup/`.
    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "weather-lookup", "weather-lookup")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// A non-blank environment value replaces the stored key; the stored
    /// base URL is kept.
    pub fn apply_env_api_key(&mut self, value: Option<String>) {
        let Some(key) = value.filter(|v| !v.trim().is_empty()) else {
            return;
        };

        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = key,
            None => {
                self.openweather = Some(ProviderConfig {
                    api_key: key,
                    base_url: None,
                })
            }
        }
    }

    /// Set or replace the API key, keeping any custom base URL.
    pub fn set_api_key(&mut self, api_key: String) {
        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.openweather = Some(ProviderConfig {
                    api_key,
                    base_url: None,
                })
            }
        }
    }

    /// Returns the API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.openweather.as_ref().and_then(|cfg| cfg.base_url.as_deref())
    }

    /// Startup city, ignoring a blank configured value.
    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }
}
