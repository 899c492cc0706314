/// Fetch pipelines: fetch → normalize → store, one per document source.
///
/// Each `refresh_*` call is one independent pipeline run. On success the
/// normalized result is written to the store; on any failure (transport,
/// HTTP status, malformed body, unusable payload) the error is returned
/// and the store is left exactly as it was. Nothing here retries; the next
/// scheduler tick is the retry.

use crate::config::Settings;
use crate::ingest::http::{build_client, get_json};
use crate::ingest::nws::{self, NwsAlerts, NwsForecast, NwsPoint};
use crate::ingest::openweathermap::{self, OwmObservation};
use crate::ingest::usno::{self, UsnoOneDay};
use crate::model::{ConditionsUpdate, FetchError};
use crate::store::DocumentStore;
use reqwest::blocking::Client;
use std::sync::Arc;

/// Shared handle for running fetch pipelines. Cheap to clone; clones share
/// the HTTP client, settings, and store.
#[derive(Debug, Clone)]
pub struct Fetchers {
    client: Client,
    settings: Arc<Settings>,
    store: Arc<DocumentStore>,
}

impl Fetchers {
    pub fn new(settings: Arc<Settings>, store: Arc<DocumentStore>) -> Result<Self, reqwest::Error> {
        let client = build_client(&settings.upstream.user_agent)?;
        Ok(Self::with_client(client, settings, store))
    }

    pub fn with_client(client: Client, settings: Arc<Settings>, store: Arc<DocumentStore>) -> Self {
        Self {
            client,
            settings,
            store,
        }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// OpenWeatherMap observation → current conditions (all but moon phase).
    pub fn refresh_current_conditions(&self) -> Result<(), FetchError> {
        let s = &self.settings;
        let url = openweathermap::build_weather_url(
            &s.upstream.openweathermap_url,
            s.lat,
            s.lon,
            &s.ow_app_id,
        );

        let observation: OwmObservation = get_json(&self.client, &url)?;
        let normalized = openweathermap::normalize_observation(&observation)
            .map_err(|source| FetchError::Normalize { url, source })?;

        self.store.apply_conditions(ConditionsUpdate::Observation(normalized));
        tracing::info!("current conditions refreshed");
        Ok(())
    }

    /// USNO one-day data → current conditions' moon phase.
    pub fn refresh_moon_phase(&self) -> Result<(), FetchError> {
        let s = &self.settings;
        let url = usno::build_oneday_url(&s.upstream.usno_url, s.lat, s.lon);

        let data: UsnoOneDay = get_json(&self.client, &url)?;
        self.store.apply_conditions(usno::normalize_moon_phase(&data));
        tracing::info!("moon phase refreshed");
        Ok(())
    }

    /// Resolves the gridpoint forecast URL for the configured point, then
    /// fetches that forecast. The second request is only made if the first
    /// succeeds.
    pub fn refresh_forecast(&self) -> Result<(), FetchError> {
        let s = &self.settings;
        let points_url = nws::build_points_url(&s.upstream.weather_gov_url, s.lat, s.lon);

        let point: NwsPoint = get_json(&self.client, &points_url)?;
        let forecast_url = point.forecast_url();

        let data: NwsForecast = get_json(&self.client, forecast_url)?;
        let forecast = nws::normalize_forecast(&data).map_err(|source| FetchError::Normalize {
            url: forecast_url.to_string(),
            source,
        })?;

        self.store.replace_forecast(forecast);
        tracing::info!("forecast refreshed");
        Ok(())
    }

    /// Active alerts for the configured point. An empty feed clears alerts.
    pub fn refresh_alerts(&self) -> Result<(), FetchError> {
        let s = &self.settings;
        let url = nws::build_alerts_url(&s.upstream.weather_gov_url, s.lat, s.lon);

        let data: NwsAlerts = get_json(&self.client, &url)?;
        let alerts = nws::normalize_alerts(&data);
        tracing::info!("{} active alerts", alerts.features.len());

        self.store.replace_alerts(alerts);
        Ok(())
    }
}
