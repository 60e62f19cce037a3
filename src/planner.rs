//! Maps manifest entries onto the local output tree.
//!
//! Planning is pure: it only computes paths. Entries with unusable names are
//! still planned (so they show up in the audit file) and are rejected later by
//! [`PlannedEntry::validate`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::domain::{Manifest, ManifestEntry};
use crate::error::FetcherError;

/// Record target used for files living at the output root.
pub const ROOT_TARGET: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRecord {
    pub file_name: String,
    pub source_path: String,
    pub target_path: String,
}

#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub entry: ManifestEntry,
    pub record: PathRecord,
    pub target_dir: Utf8PathBuf,
    pub destination: Utf8PathBuf,
}

impl PlannedEntry {
    pub fn validate(&self) -> Result<(), FetcherError> {
        let name = self.entry.file_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(FetcherError::InvalidFileName(name.to_string()));
        }
        if let Some(segment) = self
            .entry
            .path
            .iter()
            .find(|segment| segment.split(['/', '\\']).any(|part| part == "." || part == ".."))
        {
            return Err(FetcherError::InvalidPathSegment(segment.clone()));
        }
        Ok(())
    }
}

pub fn plan(root: &Utf8Path, manifest: &Manifest) -> Vec<PlannedEntry> {
    manifest
        .data
        .iter()
        .map(|entry| plan_entry(root, entry))
        .collect()
}

pub fn plan_entry(root: &Utf8Path, entry: &ManifestEntry) -> PlannedEntry {
    let root = normalize_root(root);
    let segments = segments(&entry.path);

    let target_dir = segments
        .iter()
        .fold(root.clone(), |dir, segment| dir.join(segment));
    let target_path = if segments.is_empty() {
        ROOT_TARGET.to_string()
    } else {
        segments.join("/")
    };

    PlannedEntry {
        record: PathRecord {
            file_name: entry.file_name.clone(),
            source_path: root.join(&entry.file_name).to_string(),
            target_path,
        },
        destination: target_dir.join(&entry.file_name),
        target_dir,
        entry: entry.clone(),
    }
}

fn segments(path: &[String]) -> Vec<&str> {
    path.iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect()
}

fn normalize_root(root: &Utf8Path) -> Utf8PathBuf {
    let trimmed = root.as_str().trim_end_matches('/');
    if trimmed.is_empty() && root.as_str().starts_with('/') {
        Utf8PathBuf::from("/")
    } else {
        Utf8PathBuf::from(trimmed)
    }
}
