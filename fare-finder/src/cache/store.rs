//! File-backed fare cache.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::FareRecord;

use super::config::CacheConfig;
use super::entry::{CacheKey, CacheValue};
use super::error::CacheError;

/// Version written to the backing file.
const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the cache file.
#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    version: u32,
    entries: BTreeMap<String, CacheValue>,
}

/// Process-wide fare cache.
///
/// Created once per run with [`FareCache::load`], handed to the fare source,
/// and flushed to disk on every [`put`](FareCache::put). A cache built with
/// [`FareCache::in_memory`] (or from a disabled config) never touches disk.
#[derive(Debug, Default)]
pub struct FareCache {
    entries: HashMap<String, CacheValue>,

    /// Backing file; `None` for a memory-only cache.
    path: Option<PathBuf>,
}

impl FareCache {
    /// Load the cache described by `config`.
    ///
    /// A missing backing file gives an empty cache. A disabled config always
    /// gives an empty, memory-only cache.
    pub fn load(config: &CacheConfig) -> Result<Self, CacheError> {
        if !config.enabled {
            debug!("fare cache disabled, using memory only");
            return Ok(Self::in_memory());
        }

        let entries: HashMap<String, CacheValue> = read_entries(&config.path)?
            .map(|entries| entries.into_iter().collect())
            .unwrap_or_default();

        debug!(
            path = %config.path.display(),
            entries = entries.len(),
            "loaded fare cache"
        );

        Ok(Self {
            entries,
            path: Some(config.path.clone()),
        })
    }

    /// Create an empty cache that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Look up a cached value.
    pub fn get(&self, key: &CacheKey) -> Option<&CacheValue> {
        self.entries.get(&key.to_string())
    }

    /// Look up cached fares. `None` if absent or if the entry holds something else.
    pub fn fares(&self, key: &CacheKey) -> Option<&[FareRecord]> {
        match self.get(key)? {
            CacheValue::Fares { fares } => Some(fares),
            CacheValue::Stops { .. } => None,
        }
    }

    /// Look up a cached stop count.
    pub fn stops(&self, key: &CacheKey) -> Option<usize> {
        match self.get(key)? {
            CacheValue::Stops { count } => Some(*count),
            CacheValue::Fares { .. } => None,
        }
    }

    /// Insert or overwrite an entry, then flush to disk.
    ///
    /// The in-memory entry is kept even if the flush fails.
    pub fn put(&mut self, key: CacheKey, value: CacheValue) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);

        match &self.path {
            Some(path) => self.flush(path),
            None => Ok(()),
        }
    }

    /// Number of entries held in memory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing file, if this cache is persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Merge this cache over the current file contents and replace the file.
    fn flush(&self, path: &Path) -> Result<(), CacheError> {
        let mut entries = read_entries(path)?.unwrap_or_default();
        let on_disk = entries.len();

        for (key, value) in &self.entries {
            entries.insert(key.clone(), value.clone());
        }

        let document = CacheDocument {
            version: FORMAT_VERSION,
            entries,
        };
        write_document(path, &document)?;

        debug!(
            path = %path.display(),
            on_disk,
            total = document.entries.len(),
            "flushed fare cache"
        );
        Ok(())
    }
}

/// Read the entries of a cache file. `Ok(None)` if the file does not exist.
fn read_entries(path: &Path) -> Result<Option<BTreeMap<String, CacheValue>>, CacheError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let document: CacheDocument =
        serde_json::from_str(&contents).map_err(|source| CacheError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(document.entries))
}

/// Write `document` to a temporary file beside `path`, then rename it over `path`.
///
/// If the rename fails the temporary file is removed and `path` is untouched.
fn write_document(path: &Path, document: &CacheDocument) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    // Dropping the returned `PersistError` deletes the temporary file.
    temp.persist(path).map_err(|e| CacheError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
