//! Local snapshot of the last full record fetch, used in offline mode.
//!
//! Only raw records are cached. Aggregates and pivots are always re-derived
//! from records and are never written to disk.

use crate::config;
use crate::error::{InvoiceError, Result};
use crate::models::InvoiceRecord;
use log::warn;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Stores and reloads the last successful full fetch.
pub struct CacheManager {
    /// Directory where snapshots are stored.
    pub cache_dir: PathBuf,
    /// If true, the SDK serves records from the snapshot and never calls the API.
    pub offline: bool,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
        })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(config::RECORDS_SNAPSHOT)
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Write `records` as the current snapshot.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a corrupt snapshot behind.
    pub fn store_records(&self, records: &[InvoiceRecord]) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        let bytes = serde_json::to_vec(records)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(self.snapshot_path()).map_err(|e| e.error)?;
        Ok(())
    }

    /// Load the snapshot.
    ///
    /// If the snapshot is corrupt it is deleted, so the next online fetch
    /// writes a fresh one.
    pub fn load_records(&self) -> Result<Vec<InvoiceRecord>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Err(InvoiceError::NotFound(
                "No cached invoice snapshot is available".to_string(),
            ));
        }

        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<Vec<InvoiceRecord>>(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Err(InvoiceError::NotFound(format!(
                    "Cached snapshot was corrupt and has been removed. \
                     Fetch online to rebuild it. Original error: {}",
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
