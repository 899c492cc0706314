/// Shared blocking HTTP plumbing for the upstream clients.
///
/// All upstreams are plain JSON-over-GET, so one helper does the request,
/// the status check, and the decode. Every error carries the URL.

use crate::model::FetchError;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

/// Builds the client used by every fetch pipeline. The user agent identifies
/// the service to upstreams (weather.gov rejects anonymous clients).
pub fn build_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent.to_string()).build()
}

/// Issues a GET for `url` and decodes the JSON body into `T`.
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    tracing::info!("GET {}", url);

    let response = client
        .get(url)
        .header(ACCEPT, "application/geo+json, application/json")
        .send()
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Formats coordinates the way the upstream URLs expect (`lat,lon`).
pub fn coords(lat: f64, lon: f64) -> String {
    format!("{},{}", lat, lon)
}
