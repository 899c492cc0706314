//! PiClock weather service - main daemon
//!
//! A server-side daemon that:
//! 1. Polls OpenWeatherMap and USNO for current conditions and moon phase
//! 2. Polls weather.gov for the forecast and active alerts
//! 3. Keeps the latest good copy of each in memory
//! 4. Serves them (and the clock's static files) over HTTP
//!
//! Usage:
//!   cargo run --release                              # settings.toml, port from settings (default 8081)
//!   cargo run --release -- --config /etc/piclock.toml
//!   cargo run --release -- --port 8080
//!
//! Environment:
//!   OW_APP_ID - OpenWeatherMap API key (overrides the settings file)
//!   RUST_LOG  - log filter (default: info, or warn when APP_ENV=production)

use piclock_service::config::{self, DEFAULT_SETTINGS_PATH};
use piclock_service::daemon::{Daemon, DaemonConfig};
use piclock_service::endpoint::{self, EndpointContext};
use piclock_service::pipeline::Fetchers;
use piclock_service::store::DocumentStore;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let default_level = match env::var("APP_ENV").as_deref() {
        Ok("production") => "warn",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    println!("🕰  PiClock Weather Service");
    println!("==========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = DEFAULT_SETTINGS_PATH.to_string();
    let mut port_override: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = args[i + 1].clone();
                i += 2;
            }
            "--port" if i + 1 < args.len() => match args[i + 1].parse() {
                Ok(port) => {
                    port_override = Some(port);
                    i += 2;
                }
                Err(_) => {
                    eprintln!("Error: invalid port '{}'", args[i + 1]);
                    std::process::exit(1);
                }
            },
            "--config" | "--port" => {
                eprintln!("Error: {} requires a value", args[i]);
                std::process::exit(1);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    init_logging();

    let settings = match config::load_settings(&config_path) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        lat = settings.lat,
        lon = settings.lon,
        "loaded settings from {}",
        config_path
    );

    let store = Arc::new(DocumentStore::new());

    let fetchers = match Fetchers::new(Arc::clone(&settings), Arc::clone(&store)) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("\n❌ Failed to build HTTP client: {}\n", e);
            std::process::exit(1);
        }
    };

    // Endpoint runs in a background thread; the scheduler owns the main one.
    let port = port_override.unwrap_or(settings.server.port);
    let ctx = EndpointContext {
        store: Arc::clone(&store),
        settings: Arc::clone(&settings),
    };
    std::thread::spawn(move || {
        if let Err(e) = endpoint::start_endpoint_server(port, ctx) {
            tracing::error!("endpoint server error: {}", e);
            std::process::exit(1);
        }
    });

    let daemon = Daemon::new(DaemonConfig::from_settings(&settings), fetchers);
    if let Err(e) = daemon.run() {
        eprintln!("\n❌ Daemon error: {}", e);
        std::process::exit(1);
    }
}
