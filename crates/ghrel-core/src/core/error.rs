use std::path::PathBuf;
use thiserror::Error;

pub type GhrelResult<T> = Result<T, GhrelError>;

#[derive(Error, Debug)]
pub enum GhrelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A local file the operation needs does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The remote side answered with a non-success status.
    #[error("HTTP {status} {reason}: {body}")]
    RemoteFailure {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GhrelError {
    /// Build a `RemoteFailure` from a status code and the response body.
    pub fn remote(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        GhrelError::RemoteFailure {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: body.into(),
        }
    }

    /// True for a missing local file and for a remote 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            GhrelError::FileNotFound(_) => true,
            GhrelError::RemoteFailure { status, .. } => *status == 404,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GhrelError::Cancelled)
    }
}
