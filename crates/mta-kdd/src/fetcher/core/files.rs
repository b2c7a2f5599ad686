//! File operation utilities
//!
//! Downloads land in a `.part` sibling first and are renamed into place, so
//! the destination either holds the complete body or does not exist.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::fetcher::core::{FetchError, FileOperation, Result};

/// Temporary path for an in-flight download
pub fn create_temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest_path.with_file_name(name)
}

/// Atomically rename a finished temporary file to its final destination
pub async fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .await
        .map_err(|e| FetchError::storage(dest_path, FileOperation::Rename, e))?;
    debug!("Atomically renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}

/// Best-effort removal of a leftover temporary file
pub async fn discard_temp(temp_path: &Path) {
    match fs::remove_file(temp_path).await {
        Ok(()) => debug!("Removed partial file {}", temp_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => debug!("Could not remove partial file {}: {}", temp_path.display(), e),
    }
}
