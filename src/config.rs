use std::time::Duration;

use camino::Utf8PathBuf;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use crate::app::{ParsePolicy, RunRequest};
use crate::audit::AuditFormat;
use crate::domain::IntegrationId;
use crate::error::FetcherError;
use crate::fetcher::DownloaderKind;

/// Run settings. Every value is read from the environment; the flags only
/// override it.
#[derive(Debug, Clone, Parser)]
#[command(name = "integration-fetcher")]
#[command(about = "Resolve an integration and download its package files into OUTPUT_DIR")]
#[command(version)]
pub struct Settings {
    // validated in run_request so a bad id gets its own exit code, not clap's
    #[arg(long, env = "INTEGRATION_ID")]
    pub integration_id: String,

    #[arg(long, env = "OUTPUT_DIR")]
    pub output_dir: Utf8PathBuf,

    #[arg(long, env = "SESSION_TOKEN", hide_env_values = true)]
    pub session_token: String,

    #[arg(long, env = "PENNSIEVE_API_HOST2")]
    pub metadata_host: String,

    #[arg(long, env = "PENNSIEVE_API_HOST")]
    pub manifest_host: String,

    #[arg(long, env = "DOWNLOADER", value_enum, default_value_t = DownloaderKind::Http)]
    pub downloader: DownloaderKind,

    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 30)]
    pub api_timeout_secs: u64,

    #[arg(long, env = "DOWNLOAD_TIMEOUT_SECS")]
    pub download_timeout_secs: Option<u64>,

    #[arg(
        long,
        env = "LENIENT_PARSE",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub lenient_parse: bool,

    #[arg(
        long,
        env = "ALLOW_PARTIAL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub allow_partial: bool,

    #[arg(long, env = "AUDIT_FORMAT", value_enum, default_value_t = AuditFormat::Standard)]
    pub audit_format: AuditFormat,
}

impl Settings {
    pub fn metadata_base(&self) -> &str {
        trim_host(&self.metadata_host)
    }

    pub fn manifest_base(&self) -> &str {
        trim_host(&self.manifest_host)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn download_timeout(&self) -> Option<Duration> {
        self.download_timeout_secs.map(Duration::from_secs)
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        if self.lenient_parse {
            ParsePolicy::Lenient
        } else {
            ParsePolicy::Strict
        }
    }

    pub fn run_request(&self) -> Result<RunRequest, FetcherError> {
        Ok(RunRequest {
            integration_id: self.integration_id.parse::<IntegrationId>()?,
            output_root: self.output_dir.clone(),
            parse_policy: self.parse_policy(),
            audit_format: self.audit_format,
        })
    }
}

fn trim_host(host: &str) -> &str {
    host.trim().trim_end_matches('/')
}
