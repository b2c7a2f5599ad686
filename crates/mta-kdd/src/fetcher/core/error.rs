//! Error types for the fetcher with context for diagnostics

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while caching a remote resource.
///
/// None of these escape [`ensure_cached`](crate::fetcher::ensure_cached):
/// they are logged there and swallowed. [`Fetcher::fetch`](crate::fetcher::Fetcher::fetch)
/// returns them for callers that want to inspect the failure.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request exceeded the configured timeout
    #[error("Request to '{url}' timed out after {duration_secs}s")]
    Timeout {
        url: String,
        duration_secs: u64,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} returned for '{url}'")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Connection, TLS or body transfer errors
    #[error("HTTP request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Writing the response body to disk failed
    #[error("Could not save '{path}' ({operation})")]
    Storage {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client itself could not be built
    #[error("Failed to create HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
}

/// File operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Create,
    Write,
    Rename,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Rename => write!(f, "renaming"),
        }
    }
}

/// Coarse failure classes a fetch can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeout or connection error
    TransientNetwork,
    /// Non-2xx response
    RemoteRequest,
    /// Disk could not take the file
    LocalStorage,
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Stable snake_case kind used in log fields and events
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "network_timeout",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::Request { .. } => "http_request",
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Storage { .. } => "storage",
            FetchError::Client { .. } => "client",
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout { .. } | FetchError::Request { .. } => FailureKind::TransientNetwork,
            FetchError::HttpStatus { .. } => FailureKind::RemoteRequest,
            // A URL or client that cannot be used never reaches the server
            FetchError::InvalidUrl { .. } | FetchError::Client { .. } => FailureKind::TransientNetwork,
            FetchError::Storage { .. } => FailureKind::LocalStorage,
        }
    }

    /// Classify a reqwest error raised while talking to `url`
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                duration_secs: timeout_secs,
            }
        } else if let Some(status) = error.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        FetchError::Storage {
            path: path.into(),
            operation,
            source,
        }
    }
}
