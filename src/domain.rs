use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetcherError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegrationId(String);

impl IntegrationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IntegrationId {
    type Err = FetcherError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.'));
        if !is_valid {
            return Err(FetcherError::InvalidIntegrationId(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// Integration metadata as returned by the metadata service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Integration {
    pub uuid: String,
    pub application_id: i64,
    #[serde(rename = "datasetId")]
    pub dataset_node_id: String,
    pub package_ids: Vec<String>,
    pub params: Value,
}

impl Integration {
    pub fn package_set(&self) -> PackageSet {
        PackageSet {
            node_ids: self.package_ids.clone(),
        }
    }
}

/// Request body for the download manifest endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSet {
    pub node_ids: Vec<String>,
}

impl PackageSet {
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestEntry {
    pub node_id: String,
    pub file_name: String,
    pub path: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub data: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub fn parse_integration(body: &[u8]) -> Result<Integration, FetcherError> {
    serde_json::from_slice(body).map_err(|err| FetcherError::Deserialization {
        what: "integration",
        message: err.to_string(),
    })
}

pub fn parse_manifest(body: &[u8]) -> Result<Manifest, FetcherError> {
    serde_json::from_slice(body).map_err(|err| FetcherError::Deserialization {
        what: "manifest",
        message: err.to_string(),
    })
}
