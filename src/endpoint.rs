/// HTTP endpoint for the clock display
///
/// Serves the document store as JSON plus the browser app's static files.
///
/// Endpoints:
/// - GET /current  - Current conditions (incl. moon phase)
/// - GET /forecast - Next nine forecast periods
/// - GET /alerts   - Active alerts
/// - GET /coords   - Configured coordinates and display settings
/// - GET /health   - Service health check
/// - GET /         - public/index.html; other paths map into public/

use crate::config::Settings;
use crate::store::DocumentStore;
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Header, Method, Response, Server, StatusCode};

type HttpResponse = Response<Cursor<Vec<u8>>>;

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("failed to start HTTP server on {addr}: {message}")]
    Bind { addr: String, message: String },
}

/// `/coords` body. Field names match what the browser app reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordsResponse {
    pub lat: f64,
    pub lon: f64,
    pub clock: Option<String>,
    pub g_map_key: Option<String>,
}

/// Everything a request handler needs. Read-only.
#[derive(Clone)]
pub struct EndpointContext {
    pub store: Arc<DocumentStore>,
    pub settings: Arc<Settings>,
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Binds `0.0.0.0:{port}` and serves requests until the process exits.
pub fn start_endpoint_server(port: u16, ctx: EndpointContext) -> Result<(), EndpointError> {
    let addr = format!("0.0.0.0:{}", port);
    let server = Server::http(&addr).map_err(|e| EndpointError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;

    tracing::info!("HTTP endpoint listening on http://{}", addr);
    serve(&server, &ctx);
    Ok(())
}

/// Request loop over an already-bound server.
pub fn serve(server: &Server, ctx: &EndpointContext) {
    for request in server.incoming_requests() {
        let response = handle_request(ctx, request.method(), request.url());

        if let Err(e) = request.respond(response) {
            tracing::warn!("failed to send response: {}", e);
        }
    }
}

fn route_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Routes one request to its handler.
pub fn handle_request(ctx: &EndpointContext, method: &Method, url: &str) -> HttpResponse {
    if *method != Method::Get && *method != Method::Head {
        return json_response(405, &serde_json::json!({ "error": "Method not allowed" }));
    }

    match route_path(url) {
        "/current" => json_response(200, &ctx.store.current_conditions()),
        "/forecast" => json_response(200, &ctx.store.forecast()),
        "/alerts" => json_response(200, &ctx.store.alerts()),
        "/coords" => json_response(200, &coords(&ctx.settings)),
        "/health" => handle_health(),
        "/" => handle_static(&ctx.settings.server.public_dir, "index.html"),
        path => handle_static(&ctx.settings.server.public_dir, path.trim_start_matches('/')),
    }
}

fn coords(settings: &Settings) -> CoordsResponse {
    CoordsResponse {
        lat: settings.lat,
        lon: settings.lon,
        clock: settings.clock.clone(),
        g_map_key: settings.g_map_key.clone(),
    }
}

/// Handle /health endpoint
fn handle_health() -> HttpResponse {
    json_response(
        200,
        &serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

fn not_found() -> HttpResponse {
    json_response(
        404,
        &serde_json::json!({
            "error": "Not found",
            "available_endpoints": ["/current", "/forecast", "/alerts", "/coords", "/health"]
        }),
    )
}

// ---------------------------------------------------------------------------
// Static files
// ---------------------------------------------------------------------------

/// Resolves a request path inside `root`, refusing anything that could
/// step outside it.
fn resolve_static_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        _ => "application/octet-stream",
    }
}

fn handle_static(root: &Path, relative: &str) -> HttpResponse {
    let path = match resolve_static_path(root, relative) {
        Some(p) if p.is_file() => p,
        _ => return not_found(),
    };

    match fs::read(&path) {
        Ok(bytes) => with_content_type(Response::from_data(bytes), content_type(&path)),
        Err(e) => {
            tracing::warn!("failed to read {}: {}", path.display(), e);
            not_found()
        }
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_content_type(response: HttpResponse, content_type: &str) -> HttpResponse {
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

/// Create HTTP response with JSON body
fn json_response<T: Serialize>(status_code: u16, body: &T) -> HttpResponse {
    let (status_code, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status_code, bytes),
        Err(e) => {
            tracing::error!("failed to serialize response: {}", e);
            (500, br#"{"error":"Internal server error"}"#.to_vec())
        }
    };

    with_content_type(
        Response::from_data(bytes).with_status_code(StatusCode::from(status_code)),
        "application/json",
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
