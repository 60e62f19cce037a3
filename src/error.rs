use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FetcherError {
    #[error("invalid integration id: {0}")]
    InvalidIntegrationId(String),

    #[error("metadata request failed: {0}")]
    MetadataHttp(String),

    #[error("manifest request failed: {0}")]
    ManifestHttp(String),

    #[error("failed to parse {what} response: {message}")]
    #[diagnostic(help("set LENIENT_PARSE=true to continue with an empty value"))]
    Deserialization { what: &'static str, message: String },

    #[error("failed to create directory {path}: {message}")]
    DirectoryCreation { path: String, message: String },

    #[error("download failed for {file}: {message}")]
    Download { file: String, message: String },

    #[error("invalid file name in manifest: {0:?}")]
    InvalidFileName(String),

    #[error("invalid path segment in manifest: {0:?}")]
    InvalidPathSegment(String),

    #[error("failed to write audit file {path}: {message}")]
    Audit { path: String, message: String },

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("{failed} of {total} files failed to materialize")]
    IncompleteDownload { failed: usize, total: usize },
}

impl FetcherError {
    /// Failures reaching or reading the two API services.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FetcherError::MetadataHttp(_)
                | FetcherError::ManifestHttp(_)
                | FetcherError::Deserialization { .. }
        )
    }
}
