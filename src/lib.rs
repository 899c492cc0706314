/// piclock_service: weather backend for a browser-based clock display.
///
/// # Module structure
///
/// ```text
/// piclock_service
/// ├── model       — documents served to the display (CurrentConditions, ForecastList, AlertList, …) + errors
/// ├── config      — settings loader (settings.toml + .env overrides)
/// ├── store       — in-memory document store shared by pipelines and endpoint
/// ├── pipeline    — fetch → normalize → store, one per upstream source
/// ├── daemon      — two-cadence scheduler and task supervisor
/// ├── endpoint    — HTTP API + static files for the browser app
/// └── ingest
///     ├── http           — shared blocking GET + JSON decode
///     ├── openweathermap — current conditions: URL, parsing, compass, timestamps
///     ├── usno           — moon phase
///     ├── nws            — weather.gov forecast (points → forecast) and alerts
///     └── fixtures (test only) — representative API response payloads
/// ```

/// Public modules
pub mod config;
pub mod daemon;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod store;
