use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::domain::PackageSet;
use crate::error::FetcherError;
use crate::http;

pub trait ManifestRequester: Send + Sync {
    /// Raw download manifest body for a batch of package ids.
    fn fetch_manifest(&self, packages: &PackageSet) -> Result<Vec<u8>, FetcherError>;
}

#[derive(Clone)]
pub struct HttpManifestRequester {
    client: Client,
    base_url: String,
    session_token: String,
}

impl HttpManifestRequester {
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

    fn manifest_url(&self) -> String {
        format!("{}/packages/download-manifest", self.base_url)
    }
}

impl ManifestRequester for HttpManifestRequester {
    fn fetch_manifest(&self, packages: &PackageSet) -> Result<Vec<u8>, FetcherError> {
        tracing::debug!(packages = packages.node_ids.len(), "requesting download manifest");
        // reqwest sets content-type: application/json for .json()
        let response = self
            .client
            .post(self.manifest_url())
            .query(&[("api_key", self.session_token.as_str())])
            .header(ACCEPT, "*/*")
            .json(packages)
            .send()
            .map_err(|err| FetcherError::ManifestHttp(strip_query(err)))?;
        http::read_body("manifest", response)
            .map_err(|err| FetcherError::ManifestHttp(strip_query(err)))
    }
}

// reqwest errors embed the request url, which carries the api key.
fn strip_query(err: reqwest::Error) -> String {
    err.without_url().to_string()
}
