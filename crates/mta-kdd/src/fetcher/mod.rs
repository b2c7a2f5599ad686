//! Cached single-file fetcher
//!
//! Ensures a local copy of a remote resource exists:
//! - a file already present at the destination is a cache hit and is never
//!   re-requested or re-validated
//! - otherwise the resource is downloaded once, with a bounded timeout
//! - failures are logged and swallowed by [`ensure_cached`]; the absence of
//!   the file afterwards is the only failure signal
//!
//! The swallow-and-continue contract means a failed fetch only surfaces
//! later, when something tries to read the missing file. Use
//! [`Fetcher::fetch`] directly when the failure itself matters.

pub mod config;
pub mod core;

pub use config::{FetchConfig, DEFAULT_TIMEOUT};
pub use self::core::{
    ConsoleReporter, FailureKind, FetchCallback, FetchError, FetchEvent, FetchOutcome,
    FetchReporter, FileOperation, HttpClient, IntoFetchCallback, NullReporter, Result,
};

use std::path::Path;
use tokio::fs;
use tracing::{error, info, info_span, Instrument};

/// Fetcher with a configured HTTP client and optional event callback
pub struct Fetcher {
    client: HttpClient,
    config: FetchConfig,
    callback: Option<FetchCallback>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = HttpClient::from_config(&config)?;
        Ok(Self {
            client,
            config,
            callback: None,
        })
    }

    /// Attach a callback receiving [`FetchEvent`]s
    pub fn with_callback(mut self, callback: FetchCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Download `url` to `local_path` unless the file already exists
    pub async fn fetch(&self, url: &str, local_path: &Path) -> Result<FetchOutcome> {
        async move {
            if local_path.exists() {
                let size = fs::metadata(local_path).await.map(|m| m.len()).unwrap_or(0);
                info!("{} already exists", local_path.display());
                self.emit(FetchEvent::CacheHit {
                    path: local_path.to_path_buf(),
                });
                return Ok(FetchOutcome::AlreadyCached { size });
            }

            info!("Downloading {}...", local_path.display());
            self.emit(FetchEvent::DownloadStarted {
                url: url.to_string(),
                path: local_path.to_path_buf(),
            });

            let size = self.client.download_to_file(url, local_path).await?;

            info!("{} saved successfully ({} bytes)", local_path.display(), size);
            self.emit(FetchEvent::DownloadComplete {
                url: url.to_string(),
                path: local_path.to_path_buf(),
                size,
            });
            Ok(FetchOutcome::Downloaded { size })
        }
        .instrument(info_span!("fetch", url = %url, path = %local_path.display()))
        .await
    }

    /// Like [`Fetcher::fetch`] but every failure is logged and swallowed
    pub async fn ensure_cached(&self, url: &str, local_path: &Path) {
        if let Err(e) = self.fetch(url, local_path).await {
            log_failure(&e);
            self.emit(FetchEvent::Failed {
                url: url.to_string(),
                path: local_path.to_path_buf(),
                category: e.category(),
                error: e.to_string(),
            });
        }
    }

    fn emit(&self, event: FetchEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }
}

/// Ensure `local_path` holds the body of a GET to `url`
///
/// Existing files are left untouched. Timeouts, error statuses, request
/// failures and write failures are logged and swallowed, leaving no file
/// behind. Uses the default [`FetchConfig`] (10 second timeout).
pub async fn ensure_cached(url: &str, local_path: impl AsRef<Path>) {
    match Fetcher::new(FetchConfig::default()) {
        Ok(fetcher) => fetcher.ensure_cached(url, local_path.as_ref()).await,
        Err(e) => log_failure(&e),
    }
}

pub(crate) fn log_failure(e: &FetchError) {
    let category = e.category();
    match e {
        FetchError::Timeout { url, duration_secs } => {
            error!(category, "Request to {} exceeded the {}s timeout", url, duration_secs);
        }
        FetchError::HttpStatus { url, status } => {
            error!(category, "HTTP error {} for {}", status, url);
        }
        FetchError::Request { url, source } => {
            error!(category, "Request to {} failed: {}", url, source);
        }
        FetchError::InvalidUrl { url, source } => {
            error!(category, "Request to {} failed: {}", url, source);
        }
        FetchError::Storage { path, operation, source } => {
            error!(category, "System error {} {}: {}", operation, path.display(), source);
        }
        FetchError::Client { source } => {
            error!(category, "Could not initialise HTTP client: {}", source);
        }
    }
}

#[cfg(test)]
mod tests;
