//! Cache error types.

use std::path::PathBuf;

/// Errors from loading or flushing the fare cache.
///
/// All of these are fatal for a run: continuing would either discard fetched
/// fares or silently overwrite another process's data.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing file exists but could not be read.
    #[error("failed to read cache file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file is not a valid cache document.
    #[error("cache file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Writing the temporary file failed.
    #[error("failed to write cache: {0}")]
    Write(#[from] std::io::Error),

    /// Serializing the merged table failed.
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temporary file could not be renamed over the backing file.
    #[error("failed to replace cache file {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}
