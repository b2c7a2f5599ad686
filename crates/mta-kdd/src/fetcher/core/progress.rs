//! Fetch lifecycle events and reporters

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback receiving fetch events
pub type FetchCallback = Arc<dyn Fn(FetchEvent) + Send + Sync>;

/// Events emitted while ensuring a resource is cached
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// File was already on disk, nothing was requested
    CacheHit {
        path: PathBuf,
    },
    DownloadStarted {
        url: String,
        path: PathBuf,
    },
    DownloadComplete {
        url: String,
        path: PathBuf,
        size: u64,
    },
    /// The fetch failed and was swallowed
    Failed {
        url: String,
        path: PathBuf,
        category: &'static str,
        error: String,
    },
}

/// Trait for reporting fetch events with per-event hooks
pub trait FetchReporter: Send + Sync {
    fn on_cache_hit(&self, _path: &Path) {}
    fn on_download_started(&self, _url: &str, _path: &Path) {}
    fn on_download_complete(&self, _url: &str, _path: &Path, _size: u64) {}
    fn on_failed(&self, _url: &str, _path: &Path, _category: &str, _error: &str) {}
}

/// Extension trait to convert a FetchReporter into a FetchCallback
pub trait IntoFetchCallback {
    fn into_callback(self) -> FetchCallback;
}

impl<T: FetchReporter + 'static> IntoFetchCallback for T {
    fn into_callback(self) -> FetchCallback {
        Arc::new(move |event| match event {
            FetchEvent::CacheHit { path } => self.on_cache_hit(&path),
            FetchEvent::DownloadStarted { url, path } => self.on_download_started(&url, &path),
            FetchEvent::DownloadComplete { url, path, size } => {
                self.on_download_complete(&url, &path, size);
            }
            FetchEvent::Failed { url, path, category, error } => {
                self.on_failed(&url, &path, category, &error);
            }
        })
    }
}

/// Prints one line per event to the console
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl FetchReporter for ConsoleReporter {
    fn on_cache_hit(&self, path: &Path) {
        println!("{} already exists.", path.display());
    }

    fn on_download_started(&self, _url: &str, path: &Path) {
        println!("Downloading {}...", path.display());
    }

    fn on_download_complete(&self, _url: &str, path: &Path, size: u64) {
        println!("{} saved successfully ({} bytes).", path.display(), size);
    }

    fn on_failed(&self, url: &str, _path: &Path, category: &str, error: &str) {
        eprintln!("Error [{}] fetching {}: {}", category, url, error);
    }
}

/// Reporter that does nothing
#[derive(Debug, Default)]
pub struct NullReporter;

impl FetchReporter for NullReporter {}
