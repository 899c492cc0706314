/// NWS (weather.gov) API client: forecast and active alerts.
///
/// The forecast is a two-step lookup:
///   1. https://api.weather.gov/points/{lat},{lon}
///      → `.properties.forecast`, the gridpoint forecast URL for the point
///   2. GET that URL → `.properties.periods[]`
///
/// Alerts come from a single call:
///   https://api.weather.gov/alerts/active?point={lat},{lon}

use crate::ingest::http::coords;
use crate::model::{AlertList, ForecastList, ForecastPeriod, NormalizeError, WeatherAlert, FORECAST_PERIODS};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NwsPoint {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    forecast: String,
}

impl NwsPoint {
    /// The gridpoint forecast URL resolved for this point.
    pub fn forecast_url(&self) -> &str {
        &self.properties.forecast
    }
}

#[derive(Debug, Deserialize)]
pub struct NwsForecast {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    name: String,
    temperature: i32,
    short_forecast: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
pub struct NwsAlerts {
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertProperties {
    area_desc: String,
    severity: String,
    headline: Option<String>,
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub fn build_points_url(base_url: &str, lat: f64, lon: f64) -> String {
    format!("{}/points/{}", base_url, coords(lat, lon))
}

pub fn build_alerts_url(base_url: &str, lat: f64, lon: f64) -> String {
    format!("{}/alerts/active?point={}", base_url, coords(lat, lon))
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Keeps the first `FORECAST_PERIODS` periods, in upstream order.
///
/// # Errors
/// `NormalizeError::TooFewPeriods` if the forecast is shorter than that.
/// The display always shows exactly that many periods, so a short
/// forecast is rejected instead of stored.
pub fn normalize_forecast(forecast: &NwsForecast) -> Result<ForecastList, NormalizeError> {
    let periods = &forecast.properties.periods;
    if periods.len() < FORECAST_PERIODS {
        return Err(NormalizeError::TooFewPeriods {
            expected: FORECAST_PERIODS,
            found: periods.len(),
        });
    }

    let list = periods[..FORECAST_PERIODS]
        .iter()
        .map(|p| ForecastPeriod {
            name: p.name.clone(),
            temp: p.temperature,
            short: p.short_forecast.clone(),
            icon: p.icon.clone(),
        })
        .collect();

    Ok(ForecastList { list })
}

/// Maps every active alert, in upstream order.
pub fn normalize_alerts(alerts: &NwsAlerts) -> AlertList {
    let features = alerts
        .features
        .iter()
        .map(|f| WeatherAlert {
            area_desc: f.properties.area_desc.clone(),
            severity: f.properties.severity.clone(),
            headline: f.properties.headline.clone(),
            description: f.properties.description.clone(),
        })
        .collect();

    AlertList { features }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
