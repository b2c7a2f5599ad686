//! Errors surfaced by the loader

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that propagate out of [`load_combined_dataset`](crate::loader::load_combined_dataset)
///
/// Fetch failures are not in here: they are swallowed by the fetcher and
/// resurface as [`LoadError::MissingCache`] when the file is read.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not create data directory '{path}'")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cache file was never written, usually because its fetch failed
    #[error("Path does not exist: '{path}'")]
    MissingCache {
        path: PathBuf,
    },

    #[error("Failed to read CSV '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// The two datasets do not line up column for column
    #[error("Union can only be performed on tables with compatible columns: {detail}")]
    SchemaMismatch {
        detail: String,
    },

    #[error("Table engine error")]
    Engine(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
