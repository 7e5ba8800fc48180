use crate::error::{Result, VendorFetchError};
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::Path;

/// Creates `path` and any missing parents. Existing directories are left alone.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    if path.exists() {
        return Err(VendorFetchError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    std::fs::create_dir_all(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => VendorFetchError::PermissionDenied {
            path: path.to_path_buf(),
        },
        ErrorKind::AlreadyExists => VendorFetchError::NotADirectory {
            path: path.to_path_buf(),
        },
        _ => VendorFetchError::Filesystem {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Created directory {path:?}");
    Ok(())
}

/// Deletes a partially written file. Never fails: a missing file is fine and
/// any other error is only logged.
pub async fn remove_partial_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial file {path:?}"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove partial file {path:?}: {e}"),
    }
}
