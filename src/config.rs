/// Settings loader - parses settings.toml
///
/// Keeps coordinates, the OpenWeatherMap key, and the two poll intervals out
/// of the code. Loaded once at startup and never changed afterwards.
///
/// ```toml
/// lat = 40.6936
/// lon = -89.5890
/// ow_app_id = "..."
/// current_conditions_interval = 120   # seconds
/// forecast_interval = 21600           # seconds
/// clock = "analog"
/// g_map_key = "..."
///
/// [server]
/// port = 8081
/// public_dir = "public"
///
/// [upstream]
/// user_agent = "piclockjs"
/// ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.toml";

/// Environment variable that overrides `ow_app_id` (also read from `.env`).
pub const OW_APP_ID_VAR: &str = "OW_APP_ID";

/// Longest accepted poll interval, in seconds (30 days).
pub const MAX_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub lat: f64,
    pub lon: f64,

    /// OpenWeatherMap API key.
    #[serde(default)]
    pub ow_app_id: String,

    /// Short poll period (current conditions + alerts), seconds.
    pub current_conditions_interval: u64,

    /// Long poll period (forecast + moon phase), seconds.
    pub forecast_interval: u64,

    /// Clock face preference, passed through to the browser untouched.
    pub clock: Option<String>,

    /// Google Maps key for the browser's radar map.
    pub g_map_key: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Upstream base URLs (no trailing slash) and the client identifier sent
/// with every request. Overridable so tests can point at a local server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub openweathermap_url: String,
    pub usno_url: String,
    pub weather_gov_url: String,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            openweathermap_url: "http://api.openweathermap.org".to_string(),
            usno_url: "http://api.usno.navy.mil".to_string(),
            weather_gov_url: "https://api.weather.gov".to_string(),
            user_agent: "piclockjs".to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text and validates them. Does not consult
    /// the environment.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ConfigError::Invalid(format!("lat {} out of range", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ConfigError::Invalid(format!("lon {} out of range", self.lon)));
        }
        for (name, secs) in [
            ("current_conditions_interval", self.current_conditions_interval),
            ("forecast_interval", self.forecast_interval),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
            if secs > MAX_INTERVAL_SECS {
                return Err(ConfigError::Invalid(format!(
                    "{} of {}s exceeds the {}s maximum",
                    name, secs, MAX_INTERVAL_SECS
                )));
            }
        }
        if self.ow_app_id.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "ow_app_id is empty (set it in the settings file or {})",
                OW_APP_ID_VAR
            )));
        }
        Ok(())
    }
}

/// Loads settings from `path`, applying `.env` / environment overrides.
///
/// `OW_APP_ID`, when set, replaces the file's `ow_app_id` so the key can be
/// kept out of the settings file.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    dotenv::dotenv().ok();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut settings: Settings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Ok(key) = env::var(OW_APP_ID_VAR) {
        if !key.trim().is_empty() {
            settings.ow_app_id = key;
        }
    }

    settings.validate()?;
    Ok(settings)
}
