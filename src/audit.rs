use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FetcherError;
use crate::planner::PlannedEntry;

pub const AUDIT_FILE_NAME: &str = "file_paths.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuditFormat {
    /// `filename,source_path,target_path`
    Standard,
    /// `source_path,target_path`. Deprecated.
    Legacy,
}

impl fmt::Display for AuditFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFormat::Standard => write!(f, "standard"),
            AuditFormat::Legacy => write!(f, "legacy"),
        }
    }
}

impl AuditFormat {
    fn header(self) -> &'static str {
        match self {
            AuditFormat::Standard => "filename,source_path,target_path",
            AuditFormat::Legacy => "source_path,target_path",
        }
    }
}

pub fn audit_path(root: &Utf8Path) -> Utf8PathBuf {
    root.join(AUDIT_FILE_NAME)
}

pub fn render(entries: &[PlannedEntry], format: AuditFormat) -> String {
    let mut out = String::new();
    out.push_str(format.header());
    out.push('\n');
    for planned in entries {
        let record = &planned.record;
        let fields = match format {
            AuditFormat::Standard => vec![
                record.file_name.as_str(),
                record.source_path.as_str(),
                record.target_path.as_str(),
            ],
            AuditFormat::Legacy => vec![record.source_path.as_str(), record.target_path.as_str()],
        };
        let row = fields
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Writes the path mapping for every planned entry, replacing any previous
/// audit file. Returns the path written.
pub fn write_audit(
    root: &Utf8Path,
    entries: &[PlannedEntry],
    format: AuditFormat,
) -> Result<Utf8PathBuf, FetcherError> {
    if format == AuditFormat::Legacy {
        tracing::warn!("legacy two-column audit format is deprecated; use AUDIT_FORMAT=standard");
    }
    let path = audit_path(root);
    let audit_err = |err: std::io::Error| FetcherError::Audit {
        path: path.to_string(),
        message: err.to_string(),
    };

    fs::create_dir_all(root.as_std_path()).map_err(audit_err)?;
    let tmp_path = path.with_extension("csv.tmp");
    fs::write(tmp_path.as_std_path(), render(entries, format)).map_err(audit_err)?;
    fs::rename(tmp_path.as_std_path(), path.as_std_path()).map_err(audit_err)?;
    Ok(path)
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quotes_only_when_needed() {
        assert_eq!(escape_field("a.csv"), "a.csv");
        assert_eq!(escape_field("a,b.csv"), "\"a,b.csv\"");
        assert_eq!(escape_field("say \"hi\".txt"), "\"say \"\"hi\"\".txt\"");
    }
}
