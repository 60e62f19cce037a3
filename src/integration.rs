use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::domain::IntegrationId;
use crate::error::FetcherError;
use crate::http;

pub trait IntegrationResolver: Send + Sync {
    /// Raw metadata body for one integration. Only transport failures are
    /// errors here.
    fn fetch_integration(&self, id: &IntegrationId) -> Result<Vec<u8>, FetcherError>;
}

#[derive(Clone)]
pub struct HttpIntegrationResolver {
    client: Client,
    base_url: String,
    session_token: String,
}

impl HttpIntegrationResolver {
    pub fn new(
        base_url: impl Into<String>,
        session_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetcherError> {
        Ok(Self {
            client: http::build_client(Some(timeout))?,
            base_url: base_url.into(),
            session_token: session_token.into(),
        })
    }

    pub fn integration_url(&self, id: &IntegrationId) -> String {
        format!("{}/integrations/{}", self.base_url, id.as_str())
    }
}

impl IntegrationResolver for HttpIntegrationResolver {
    fn fetch_integration(&self, id: &IntegrationId) -> Result<Vec<u8>, FetcherError> {
        let url = self.integration_url(id);
        tracing::debug!(integration_id = %id, "requesting integration");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.session_token))
            .send()
            .map_err(|err| FetcherError::MetadataHttp(err.to_string()))?;
        http::read_body("metadata", response)
            .map_err(|err| FetcherError::MetadataHttp(err.to_string()))
    }
}
