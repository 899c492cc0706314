/// In-memory document store.
///
/// Holds the latest successfully normalized document per category. Built
/// once in `main` and shared as `Arc<DocumentStore>` between the fetch
/// pipelines (writers) and the HTTP endpoint (reader).
///
/// Each document sits behind its own lock, so a slow forecast write never
/// holds up a read of current conditions. Writes are last-completion-wins:
/// nothing orders overlapping fetch cycles.

use crate::model::{AlertList, ConditionsUpdate, CurrentConditions, ForecastList};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct DocumentStore {
    current: RwLock<CurrentConditions>,
    forecast: RwLock<ForecastList>,
    alerts: RwLock<AlertList>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of current conditions (possibly partially populated).
    pub fn current_conditions(&self) -> CurrentConditions {
        self.current.read().clone()
    }

    /// Snapshot of the forecast (empty before the first success).
    pub fn forecast(&self) -> ForecastList {
        self.forecast.read().clone()
    }

    /// Snapshot of active alerts.
    pub fn alerts(&self) -> AlertList {
        self.alerts.read().clone()
    }

    /// Merges a partial update into current conditions under a single write
    /// lock, so readers never see half an observation.
    pub fn apply_conditions(&self, update: ConditionsUpdate) {
        self.current.write().apply(update);
    }

    pub fn replace_forecast(&self, forecast: ForecastList) {
        *self.forecast.write() = forecast;
    }

    pub fn replace_alerts(&self, alerts: AlertList) {
        *self.alerts.write() = alerts;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
