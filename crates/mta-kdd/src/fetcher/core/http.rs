//! HTTP client with integrated download-to-file support

use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::files::{atomic_rename, create_temp_path, discard_temp};
use crate::fetcher::config::FetchConfig;
use crate::fetcher::core::{FetchError, FileOperation, Result};

/// HTTP client that streams a single GET response onto disk
///
/// The body is written byte for byte; no charset decoding takes place.
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client from fetch configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        // Per-phase bounds: a body that keeps arriving is never cut off
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// GET `url` and store the body at `dest_path`
    ///
    /// Returns the number of bytes written. On error nothing is left at
    /// `dest_path` or at its temporary sibling.
    pub async fn download_to_file(&self, url: &str, dest_path: &Path) -> Result<u64> {
        let temp_path = create_temp_path(dest_path);
        let result = self.stream_to(url, &temp_path).await;

        match result {
            Ok(written) => {
                if let Err(e) = atomic_rename(&temp_path, dest_path).await {
                    discard_temp(&temp_path).await;
                    return Err(e);
                }
                debug!("Stream download completed: {} bytes", written);
                Ok(written)
            }
            Err(e) => {
                discard_temp(&temp_path).await;
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &str, temp_path: &Path) -> Result<u64> {
        let parsed = url::Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let timeout_secs = self.timeout.as_secs();
        debug!("GET {} (timeout {:?})", parsed, self.timeout);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(url, e, timeout_secs))?;

        debug!("Content length: {:?}", response.content_length());

        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| FetchError::storage(temp_path, FileOperation::Create, e))?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e, timeout_secs))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::storage(temp_path, FileOperation::Write, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| FetchError::storage(temp_path, FileOperation::Write, e))?;
        file.sync_all()
            .await
            .map_err(|e| FetchError::storage(temp_path, FileOperation::Write, e))?;

        Ok(written)
    }
}
