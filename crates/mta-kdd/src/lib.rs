//! MTA-KDD dataset library
//!
//! Fetches the MTA-KDD-19 legitimate and malware traffic feature sets,
//! caches them under a local data directory and loads them as a single
//! table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mta_kdd::{load_combined_dataset, DatasetSummary, DEFAULT_BASE_URL};
//!
//! # async fn example() -> mta_kdd::LoadResult<()> {
//! // Downloads into ./data on the first run, reuses the files afterwards
//! let dataset = load_combined_dataset(DEFAULT_BASE_URL).await?;
//! println!("{}", DatasetSummary::from_frame(&dataset));
//! # Ok(())
//! # }
//! ```
//!
//! Caching a single file:
//!
//! ```rust,no_run
//! # async fn example() {
//! mta_kdd::ensure_cached(
//!     "https://raw.githubusercontent.com/IvanLetteri/MTA-KDD-19/master/datasetMalware33featues.csv",
//!     "./data/datasetLeg33featues.csv",
//! ).await;
//! // Failures are logged, not returned: check the file to know
//! # }
//! ```
//!
//! # Features
//!
//! - **Idempotent cache**: a file on disk is never fetched again
//! - **Bounded requests**: 10 second network timeout by default
//! - **Atomic writes**: a failed download leaves no file behind
//! - **Fetch events**: optional callback for cache hits, downloads and failures
//! - **Row-wise union**: both feature sets in one polars `DataFrame`

pub mod fetcher;
pub mod loader;

pub use fetcher::{
    ensure_cached, ConsoleReporter, FetchCallback, FetchConfig, FetchError, FetchEvent,
    FetchOutcome, FetchReporter, Fetcher, IntoFetchCallback, NullReporter,
};
pub use loader::{
    load_combined_dataset, DatasetLoader, DatasetSummary, LoadError, LoaderConfig,
    ProcessingContext, RemoteResource, ResourceKey, Result as LoadResult, APP_NAME,
    DEFAULT_BASE_URL, DEFAULT_DATA_DIR,
};
