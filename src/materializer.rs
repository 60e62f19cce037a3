use std::fs;

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink};
use crate::error::FetcherError;
use crate::fetcher::FileFetcher;
use crate::planner::PlannedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Downloaded,
    SkippedInvalid,
    DirectoryFailed,
    DownloadFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub node_id: String,
    pub file_name: String,
    pub destination: String,
    pub status: ItemStatus,
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == ItemStatus::Downloaded
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub items: Vec<ItemOutcome>,
}

impl MaterializeReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Creates each entry's directory and downloads its file, in manifest order.
/// A failing entry is logged and skipped; it never stops the batch.
pub fn materialize<F: FileFetcher + ?Sized>(
    entries: &[PlannedEntry],
    fetcher: &F,
    sink: &dyn ProgressSink,
) -> MaterializeReport {
    let items = entries
        .iter()
        .map(|planned| materialize_entry(planned, fetcher, sink))
        .collect();
    MaterializeReport { items }
}

fn materialize_entry<F: FileFetcher + ?Sized>(
    planned: &PlannedEntry,
    fetcher: &F,
    sink: &dyn ProgressSink,
) -> ItemOutcome {
    let entry = &planned.entry;
    let outcome = |status: ItemStatus, error: Option<&FetcherError>| ItemOutcome {
        node_id: entry.node_id.clone(),
        file_name: entry.file_name.clone(),
        destination: planned.destination.to_string(),
        status,
        error: error.map(|err| err.to_string()),
    };

    if let Err(err) = planned.validate() {
        tracing::error!(
            node_id = %entry.node_id,
            file = %entry.file_name,
            error = %err,
            "Rejected manifest entry"
        );
        return outcome(ItemStatus::SkippedInvalid, Some(&err));
    }

    if let Err(err) = fs::create_dir_all(planned.target_dir.as_std_path()) {
        let err = FetcherError::DirectoryCreation {
            path: planned.target_dir.to_string(),
            message: err.to_string(),
        };
        tracing::error!(
            node_id = %entry.node_id,
            file = %entry.file_name,
            directory = %planned.target_dir,
            error = %err,
            "Failed to create directory structure"
        );
        return outcome(ItemStatus::DirectoryFailed, Some(&err));
    }

    sink.event(ProgressEvent {
        message: format!("Downloading to: {}", planned.destination),
        elapsed: None,
    });
    let start = std::time::Instant::now();
    if let Err(err) = fetcher.fetch(&entry.url, &planned.destination) {
        tracing::error!(
            node_id = %entry.node_id,
            file = %entry.file_name,
            error = %err,
            "Download failed"
        );
        return outcome(ItemStatus::DownloadFailed, Some(&err));
    }

    sink.event(ProgressEvent {
        message: format!("Successfully downloaded: {}", planned.destination),
        elapsed: Some(start.elapsed()),
    });
    outcome(ItemStatus::Downloaded, None)
}
