//! Combined MTA-KDD dataset loader
//!
//! Call chain:
//!
//! `load_combined_dataset` / `DatasetLoader::load`
//! ↓
//! `RemoteResource::resolve_all` (URLs and cache paths)
//! ↓
//! `Fetcher::ensure_cached`, once per resource, in order
//! ↓
//! `ProcessingContext::read_csv` for each cache file
//! ↓
//! `ProcessingContext::union`
//!
//! Fetch failures never stop the loader. They show up as
//! [`LoadError::MissingCache`] when the absent file is read.

pub mod error;
pub mod resources;
pub mod session;
pub mod summary;

pub use error::{LoadError, Result};
pub use resources::{RemoteResource, ResourceKey, DEFAULT_BASE_URL, DEFAULT_DATA_DIR};
pub use session::{ProcessingContext, ProcessingContextBuilder};
pub use summary::{ColumnSummary, DatasetSummary};

use polars::prelude::DataFrame;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, info_span, Instrument};

use crate::fetcher::{FetchConfig, Fetcher};

/// Name the processing context is created with
pub const APP_NAME: &str = "MalwareAnalysis";

/// Configuration for [`DatasetLoader`]
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Prefix the remote file names are appended to
    pub base_url: String,
    pub data_dir: PathBuf,
    pub app_name: String,
    pub fetch: FetchConfig,
}

impl LoaderConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            app_name: APP_NAME.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Fetches both datasets and unions them
pub struct DatasetLoader {
    config: LoaderConfig,
    fetcher: Option<Fetcher>,
}

impl DatasetLoader {
    /// Loader that builds its fetcher from `config.fetch` on each load
    pub fn new(config: LoaderConfig) -> Self {
        Self { config, fetcher: None }
    }

    /// Loader using a preconfigured fetcher, e.g. one with an event callback
    pub fn with_fetcher(config: LoaderConfig, fetcher: Fetcher) -> Self {
        Self {
            config,
            fetcher: Some(fetcher),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn resources(&self) -> [RemoteResource; 2] {
        RemoteResource::resolve_all(&self.config.base_url, &self.config.data_dir)
    }

    /// Make sure both cache files exist, then read and union them
    pub async fn load(&self) -> Result<DataFrame> {
        let data_dir = &self.config.data_dir;
        async move {
            fs::create_dir_all(data_dir)
                .await
                .map_err(|source| LoadError::DataDir {
                    path: data_dir.clone(),
                    source,
                })?;

            let resources = self.resources();
            self.fetch_all(&resources).await;

            let context = ProcessingContext::builder()
                .app_name(self.config.app_name.as_str())
                .get_or_create();

            let [first, second] = &resources;
            let first_frame = context.read_csv(&first.local_path)?;
            let second_frame = context.read_csv(&second.local_path)?;
            info!(
                "Loaded {} rows ({}) and {} rows ({})",
                first_frame.height(),
                first.key,
                second_frame.height(),
                second.key
            );

            let combined = context.union(first_frame, second_frame)?;
            info!("Combined dataset has {} rows x {} columns", combined.height(), combined.width());
            Ok(combined)
        }
        .instrument(info_span!("load_dataset", data_dir = %data_dir.display()))
        .await
    }

    async fn fetch_all(&self, resources: &[RemoteResource]) {
        let owned;
        let fetcher = match &self.fetcher {
            Some(fetcher) => fetcher,
            None => match Fetcher::new(self.config.fetch.clone()) {
                Ok(fetcher) => {
                    owned = fetcher;
                    &owned
                }
                Err(e) => {
                    // Without a client every fetch fails; reading reports it
                    crate::fetcher::log_failure(&e);
                    return;
                }
            },
        };

        for resource in resources {
            fetcher.ensure_cached(&resource.url, &resource.local_path).await;
        }
    }
}

/// Fetch the two MTA-KDD-19 CSVs below `base_url` into `./data` and union them
///
/// Rows of the `mta` file come first, then the `leg` file. Failed downloads
/// are only logged; the load then fails with [`LoadError::MissingCache`].
pub async fn load_combined_dataset(base_url: &str) -> Result<DataFrame> {
    DatasetLoader::new(LoaderConfig::default().with_base_url(base_url))
        .load()
        .await
}
