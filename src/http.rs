use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::FetcherError;

pub fn build_client(timeout: Option<Duration>) -> Result<Client, FetcherError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("integration-fetcher/{}", env!("CARGO_PKG_VERSION")))
            .map_err(|err| FetcherError::HttpClient(err.to_string()))?,
    );
    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|err| FetcherError::HttpClient(err.to_string()))
}

/// Reads the body of a service response. Non-success statuses are logged and
/// the body is handed back for the caller to parse.
pub(crate) fn read_body(
    service: &'static str,
    response: reqwest::blocking::Response,
) -> Result<Vec<u8>, reqwest::Error> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            service,
            status = status.as_u16(),
            path = response.url().path(),
            "service returned non-success status"
        );
    }
    Ok(response.bytes()?.to_vec())
}
