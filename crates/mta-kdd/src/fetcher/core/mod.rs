//! Core types used throughout the fetcher

pub mod error;
pub mod files;
pub mod http;
pub mod progress;

pub use error::{FailureKind, FetchError, FileOperation, Result};
pub use http::HttpClient;
pub use progress::{
    ConsoleReporter, FetchCallback, FetchEvent, FetchReporter, IntoFetchCallback, NullReporter,
};

/// Result of a successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// File was already cached, no request was made
    AlreadyCached { size: u64 },
    /// File was downloaded on this call
    Downloaded { size: u64 },
}

impl FetchOutcome {
    pub fn size(&self) -> u64 {
        match self {
            FetchOutcome::AlreadyCached { size } | FetchOutcome::Downloaded { size } => *size,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}
