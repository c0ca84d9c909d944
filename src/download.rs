//! Gated document retrieval.
//!
//! At most one document retrieval may be in flight across the whole SDK.
//! The [`DownloadCoordinator`] is that gate; [`DocumentTransfer`] is the
//! collaborator that actually fetches and saves a document once the gate
//! is held.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use reqwest::Url;

use crate::client::LazyClient;
use crate::error::{InvoiceError, Result};
use crate::models::{ConsumerUnitRow, MonthKey};

// ---------------------------------------------------------------------------
// DownloadCoordinator
// ---------------------------------------------------------------------------

/// Outcome of [`DownloadCoordinator::begin_retrieval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected,
}

/// Mutual-exclusion gate over every document key.
///
/// `Idle` when no key is held, `Pending(key)` while one retrieval runs.
/// While any key is pending, every other `begin_retrieval` is rejected.
#[derive(Debug, Default)]
pub struct DownloadCoordinator {
    pending: Mutex<Option<String>>,
}

impl DownloadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Option<String>> {
        // A panic while holding the lock cannot leave the Option half-written.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move `Idle -> Pending(key)`, or hand back the key already pending.
    fn admit(&self, key: &str) -> std::result::Result<(), String> {
        let mut state = self.state();
        if let Some(current) = state.as_deref() {
            debug!("Rejecting retrieval of '{}': '{}' is pending", key, current);
            return Err(current.to_string());
        }
        *state = Some(key.to_string());
        Ok(())
    }

    /// Move `Idle -> Pending(key)`, or reject if anything is already pending.
    pub fn begin_retrieval(&self, key: &str) -> Admission {
        match self.admit(key) {
            Ok(()) => Admission::Accepted,
            Err(_) => Admission::Rejected,
        }
    }

    /// Move `Pending(key) -> Idle`.
    ///
    /// Ending a key that is not the one in flight is ignored.
    pub fn end_retrieval(&self, key: &str) {
        let mut state = self.state();
        match state.clone() {
            Some(current) if current == key => *state = None,
            Some(current) => warn!(
                "Ignoring end of retrieval '{}': '{}' is the one pending",
                key, current
            ),
            None => debug!("Ignoring end of retrieval '{}': nothing pending", key),
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.state().as_deref() == Some(key)
    }

    pub fn is_any_pending(&self) -> bool {
        self.state().is_some()
    }

    pub fn pending_key(&self) -> Option<String> {
        self.state().clone()
    }

    /// Acquire the gate as a guard that releases it on drop.
    pub fn try_acquire(&self, key: &str) -> Option<RetrievalPermit<'_>> {
        self.acquire(key).ok()
    }

    /// Like [`try_acquire`](Self::try_acquire), but a rejection names the
    /// key that held the gate at the moment of the attempt.
    pub fn acquire(&self, key: &str) -> Result<RetrievalPermit<'_>> {
        self.admit(key)
            .map(|()| RetrievalPermit {
                coordinator: self,
                key: key.to_string(),
            })
            .map_err(|pending| InvoiceError::Busy { pending })
    }
}

/// Held while a retrieval is in flight. Dropping it returns the coordinator to `Idle`.
#[derive(Debug)]
pub struct RetrievalPermit<'a> {
    coordinator: &'a DownloadCoordinator,
    key: String,
}

impl RetrievalPermit<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for RetrievalPermit<'_> {
    fn drop(&mut self) {
        self.coordinator.end_retrieval(&self.key);
    }
}

// ---------------------------------------------------------------------------
// DocumentTransfer
// ---------------------------------------------------------------------------

/// Fetches the document behind a locator and saves it under a suggested name.
pub trait DocumentTransfer {
    /// Returns the path the document was saved to.
    fn retrieve_and_save(&self, locator: &str, suggested_name: &str) -> Result<PathBuf>;
}

/// Run one transfer while holding the coordinator's gate.
///
/// Fails with [`InvoiceError::Busy`] without calling `transfer` when another
/// retrieval is pending. The gate is released whether the transfer succeeds
/// or fails, and a failure is never retried.
pub fn retrieve<T: DocumentTransfer + ?Sized>(
    coordinator: &DownloadCoordinator,
    transfer: &T,
    key: &str,
    locator: &str,
    suggested_name: &str,
) -> Result<PathBuf> {
    let _permit = coordinator.acquire(key)?;
    transfer.retrieve_and_save(locator, suggested_name)
}

/// Retrieval key for one cell of the unit × month matrix, e.g. `"UC 1::Jan"`.
pub fn document_key(row: &ConsumerUnitRow, month: &MonthKey) -> String {
    format!("{}::{}", row.consumer_unit_name, month)
}

/// File name offered for a unit's monthly invoice, e.g. `"UC_1_JAN.pdf"`.
///
/// Path separators and other characters unsafe in file names are replaced.
pub fn suggested_file_name(row: &ConsumerUnitRow, month: &MonthKey) -> String {
    let month = match month {
        MonthKey::Known(m) => m.code().to_string(),
        MonthKey::Raw(raw) => raw.to_uppercase(),
    };
    format!(
        "{}_{}.pdf",
        sanitize(&row.consumer_unit_name),
        sanitize(&month)
    )
}

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// HttpDocumentTransfer
// ---------------------------------------------------------------------------

/// Downloads documents over HTTP into a local directory.
///
/// Relative locators are resolved against the API base URL. Each file is
/// written to a temp file first and renamed on success, so a failed
/// transfer never leaves a partial document behind.
pub struct HttpDocumentTransfer {
    http: Arc<LazyClient>,
    base_url: Url,
    download_dir: PathBuf,
}

impl HttpDocumentTransfer {
    pub fn new(http: Arc<LazyClient>, base_url: Url, download_dir: PathBuf) -> Self {
        Self {
            http,
            base_url,
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Absolute URL for `locator`.
    ///
    /// A locator starting with `/` is taken from the server root, so
    /// `/api/invoices/download/5` keeps its own path. Other relative locators
    /// land under the base path.
    pub fn resolve(&self, locator: &str) -> Result<Url> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(InvoiceError::InvalidArgument(
                "document locator is empty".to_string(),
            ));
        }
        match Url::parse(locator) {
            Ok(url) => Ok(url),
            Err(_) => self.base_url.join(locator).map_err(|e| {
                InvoiceError::InvalidArgument(format!("invalid document locator '{}': {}", locator, e))
            }),
        }
    }
}

impl DocumentTransfer for HttpDocumentTransfer {
    fn retrieve_and_save(&self, locator: &str, suggested_name: &str) -> Result<PathBuf> {
        let url = self.resolve(locator)?;
        info!("Downloading {}", url);

        fs::create_dir_all(&self.download_dir)?;
        let dest = self.download_dir.join(sanitize(suggested_name));

        let resp = self.http.get()?.get(url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(InvoiceError::Transfer(format!(
                "{} responded with {}",
                url, status
            )));
        }
        let bytes = resp.bytes()?;

        // The temp file is removed on drop if anything below fails.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.download_dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&dest).map_err(|e| e.error)?;

        info!("Saved {} ({} bytes)", dest.display(), bytes.len());
        Ok(dest)
    }
}
