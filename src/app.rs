use std::time::Duration;

use camino::Utf8PathBuf;
use chrono::Utc;
use serde::Serialize;

use crate::audit::{self, AuditFormat};
use crate::domain::{Integration, IntegrationId, Manifest, parse_integration, parse_manifest};
use crate::error::FetcherError;
use crate::fetcher::FileFetcher;
use crate::integration::IntegrationResolver;
use crate::manifest::ManifestRequester;
use crate::materializer::{self, ItemOutcome};
use crate::planner;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// What to do when a service body does not deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Abort the run.
    Strict,
    /// Log and continue with an empty integration or manifest.
    Lenient,
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub integration_id: IntegrationId,
    pub output_root: Utf8PathBuf,
    pub parse_policy: ParsePolicy,
    pub audit_format: AuditFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub integration_id: String,
    pub dataset_id: String,
    pub audit_path: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub started_at: String,
    pub finished_at: String,
    pub items: Vec<ItemOutcome>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Clone)]
pub struct App<R: IntegrationResolver, M: ManifestRequester, F: FileFetcher> {
    resolver: R,
    requester: M,
    fetcher: F,
}

impl<R: IntegrationResolver, M: ManifestRequester, F: FileFetcher> App<R, M, F> {
    pub fn new(resolver: R, requester: M, fetcher: F) -> Self {
        Self {
            resolver,
            requester,
            fetcher,
        }
    }

    /// Resolve, request the manifest, write the audit file, then download.
    /// The output root is not touched until the manifest has been parsed.
    pub fn run(
        &self,
        request: &RunRequest,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, FetcherError> {
        let started_at = Utc::now().to_rfc3339();

        let integration = self.resolve(request, sink)?;
        let manifest = self.request_manifest(&integration, request.parse_policy, sink)?;

        let planned = planner::plan(&request.output_root, &manifest);
        let audit_path = audit::write_audit(&request.output_root, &planned, request.audit_format)?;
        sink.event(ProgressEvent {
            message: format!("phase=Audit; wrote {} rows to {audit_path}", planned.len()),
            elapsed: None,
        });

        sink.event(ProgressEvent {
            message: format!("phase=Download; {} files", planned.len()),
            elapsed: None,
        });
        let report = materializer::materialize(&planned, &self.fetcher, sink);
        tracing::info!(
            integration_id = %request.integration_id,
            total = report.total(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "materialization finished"
        );

        Ok(RunSummary {
            integration_id: request.integration_id.to_string(),
            dataset_id: integration.dataset_node_id,
            audit_path: audit_path.to_string(),
            total: report.total(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            items: report.items,
        })
    }

    fn resolve(
        &self,
        request: &RunRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Integration, FetcherError> {
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; integration {}", request.integration_id),
            elapsed: None,
        });
        let start = std::time::Instant::now();
        let body = self.resolver.fetch_integration(&request.integration_id)?;
        tracing::debug!(body = %String::from_utf8_lossy(&body), "integration response");

        let integration = apply_policy(parse_integration(&body), request.parse_policy)?;
        if integration.package_ids.is_empty() {
            tracing::warn!(
                integration_id = %request.integration_id,
                "integration lists no packages"
            );
        }
        sink.event(ProgressEvent {
            message: format!(
                "phase=Resolve; dataset {} with {} packages",
                integration.dataset_node_id,
                integration.package_ids.len()
            ),
            elapsed: Some(start.elapsed()),
        });
        Ok(integration)
    }

    fn request_manifest(
        &self,
        integration: &Integration,
        policy: ParsePolicy,
        sink: &dyn ProgressSink,
    ) -> Result<Manifest, FetcherError> {
        let start = std::time::Instant::now();
        let body = self.requester.fetch_manifest(&integration.package_set())?;
        tracing::debug!(body = %String::from_utf8_lossy(&body), "manifest response");

        let manifest = apply_policy(parse_manifest(&body), policy)?;
        sink.event(ProgressEvent {
            message: format!("phase=Manifest; {} files listed", manifest.len()),
            elapsed: Some(start.elapsed()),
        });
        Ok(manifest)
    }
}

fn apply_policy<T: Default>(
    parsed: Result<T, FetcherError>,
    policy: ParsePolicy,
) -> Result<T, FetcherError> {
    match (parsed, policy) {
        (Ok(value), _) => Ok(value),
        (Err(err), ParsePolicy::Strict) => Err(err),
        (Err(err), ParsePolicy::Lenient) => {
            tracing::error!(error = %err, "continuing with empty value");
            Ok(T::default())
        }
    }
}
