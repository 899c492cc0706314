/// Shared data types: the documents served to the display, the updates
/// that produce them, and the fetch/normalize error types.
///
/// JSON field names follow what the browser client reads (`tempF`,
/// `curIcon`, `areaDesc`, ...), hence the camelCase renames.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Current conditions
// ---------------------------------------------------------------------------

/// Latest current-conditions document.
///
/// Two independent pipelines contribute to this document: the observation
/// pipeline sets everything except `moon_phase`, the moon-phase pipeline sets
/// only `moon_phase`. Fields stay `None` (and are omitted from JSON) until
/// their pipeline first succeeds, so a fresh document serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_f: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_phase: Option<String>,
}

/// A normalized current-conditions observation (everything but moon phase).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub temp_f: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_dir: String,
    pub cur_icon: String,
    pub cur_desc: String,
    pub sunrise: String,
    pub sunset: String,
}

/// Partial update to `CurrentConditions` produced by a normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionsUpdate {
    Observation(Observation),
    MoonPhase(String),
}

impl CurrentConditions {
    /// Merges an update into the document. Only the fields owned by the
    /// update's pipeline are touched.
    pub fn apply(&mut self, update: ConditionsUpdate) {
        match update {
            ConditionsUpdate::Observation(obs) => {
                self.temp_f = Some(obs.temp_f);
                self.pressure = Some(obs.pressure);
                self.humidity = Some(obs.humidity);
                self.wind_speed = Some(obs.wind_speed);
                self.wind_dir = Some(obs.wind_dir);
                self.cur_icon = Some(obs.cur_icon);
                self.cur_desc = Some(obs.cur_desc);
                self.sunrise = Some(obs.sunrise);
                self.sunset = Some(obs.sunset);
            }
            ConditionsUpdate::MoonPhase(phase) => {
                self.moon_phase = Some(phase);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

/// Number of forecast periods kept from the weather.gov forecast.
pub const FORECAST_PERIODS: usize = 9;

/// One forecast period as shown on the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub temp: i32,
    pub short: String,
    pub icon: String,
}

/// Latest forecast: exactly `FORECAST_PERIODS` entries once populated,
/// empty before the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastList {
    pub list: Vec<ForecastPeriod>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// One active weather alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub area_desc: String,
    pub severity: String,
    pub headline: Option<String>,
    pub description: Option<String>,
}

/// Active alerts for the configured point, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertList {
    pub features: Vec<WeatherAlert>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Upstream payload decoded fine but can't be turned into a document.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("expected at least {expected} forecast periods, found {found}")]
    TooFewPeriods { expected: usize, found: usize },

    #[error("observation has no weather entry")]
    MissingWeather,

    #[error("epoch {0} is out of range")]
    InvalidTimestamp(i64),
}

/// Failure of a single fetch pipeline. Every variant names the URL that was
/// being fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unusable response from {url}: {source}")]
    Normalize {
        url: String,
        #[source]
        source: NormalizeError,
    },
}

impl FetchError {
    /// The URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Parse { url, .. }
            | FetchError::Normalize { url, .. } => url,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
