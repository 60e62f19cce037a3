use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use camino::Utf8Path;
use clap::ValueEnum;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::FetcherError;
use crate::http;

/// Error pages beyond this many characters are cut in download errors.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DownloaderKind {
    Http,
    Wget,
}

impl fmt::Display for DownloaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloaderKind::Http => write!(f, "http"),
            DownloaderKind::Wget => write!(f, "wget"),
        }
    }
}

/// Writes the resource behind `url` to `destination`, replacing any existing
/// file. Failures are reported as [`FetcherError::Download`].
pub trait FileFetcher: Send + Sync {
    fn fetch(&self, url: &str, destination: &Utf8Path) -> Result<(), FetcherError>;
}

impl<T: FileFetcher + ?Sized> FileFetcher for Box<T> {
    fn fetch(&self, url: &str, destination: &Utf8Path) -> Result<(), FetcherError> {
        (**self).fetch(url, destination)
    }
}

pub fn build_fetcher(
    kind: DownloaderKind,
    timeout: Option<Duration>,
) -> Result<Box<dyn FileFetcher>, FetcherError> {
    Ok(match kind {
        DownloaderKind::Http => Box::new(HttpFetcher::new(timeout)?),
        DownloaderKind::Wget => Box::new(WgetFetcher::new()?),
    })
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetcherError> {
        Ok(Self {
            client: http::build_client(timeout)?,
        })
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Utf8Path) -> Result<(), FetcherError> {
        let download_err = |message: String| FetcherError::Download {
            file: file_label(destination),
            message,
        };

        // presigned urls carry credentials, keep them out of error text
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| download_err(err.without_url().to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let body = truncate(body.trim(), MAX_ERROR_BODY_CHARS);
            let message = if body.is_empty() {
                format!("server returned status {}", status.as_u16())
            } else {
                format!("server returned status {}: {body}", status.as_u16())
            };
            return Err(download_err(message));
        }

        let mut file = File::create(destination.as_std_path())
            .map_err(|err| download_err(format!("create {destination}: {err}")))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| download_err(format!("write {destination}: {err}")))?;
        Ok(())
    }
}

/// Shells out to `wget -v -O <destination> <url>`.
#[derive(Debug, Clone)]
pub struct WgetFetcher {
    wget: PathBuf,
}

impl WgetFetcher {
    pub fn new() -> Result<Self, FetcherError> {
        let wget =
            find_in_path("wget").ok_or_else(|| FetcherError::MissingTool("wget".to_string()))?;
        Ok(Self { wget })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            wget: program.into(),
        }
    }
}

impl FileFetcher for WgetFetcher {
    fn fetch(&self, url: &str, destination: &Utf8Path) -> Result<(), FetcherError> {
        let output = Command::new(&self.wget)
            .arg("-v")
            .arg("-O")
            .arg(destination.as_std_path())
            .arg(url)
            .output()
            .map_err(|err| FetcherError::Download {
                file: file_label(destination),
                message: format!("failed to run {}: {err}", self.wget.display()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.wget.display(), output.status)
            } else {
                stderr.to_string()
            };
            return Err(FetcherError::Download {
                file: file_label(destination),
                message,
            });
        }

        tracing::debug!(
            destination = %destination,
            stdout = %stdout.trim(),
            stderr = %stderr.trim(),
            "wget finished"
        );
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn file_label(destination: &Utf8Path) -> String {
    destination
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| destination.to_string())
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| [dir.join(format!("{name}.exe")), dir.join(name)])
        .find(|candidate| candidate.is_file())
}
