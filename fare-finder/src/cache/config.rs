//! Cache configuration.

use std::path::PathBuf;

/// Default cache file, relative to the working directory.
const DEFAULT_PATH: &str = "train_prices_cache.json";

/// Configuration for the fare cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path to the backing file.
    pub path: PathBuf,

    /// When false the cache starts empty and never touches the disk.
    pub enabled: bool,
}

impl CacheConfig {
    /// Create an enabled cache config backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }

    /// Enable or disable persistence.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}
