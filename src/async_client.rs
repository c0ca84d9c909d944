//! Async wrapper around [`InvoiceSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use energy_invoices::AsyncInvoiceSdk;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncInvoiceSdk::builder().build().await.unwrap();
//!
//!     let records = sdk.fetch_all_records().await.unwrap();
//!     let dashboard = sdk.run(move |s| Ok(s.dashboard(&records, "2024"))).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::analytics::MergePolicy;
use crate::download::{self, DocumentTransfer, DownloadCoordinator};
use crate::error::{InvoiceError, Result};
use crate::models::{InvoiceRecord, YearSummary};
use crate::query::SearchParams;
use crate::InvoiceSdk;

// ---------------------------------------------------------------------------
// AsyncInvoiceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncInvoiceSdk`] instance.
pub struct AsyncInvoiceSdkBuilder {
    base_url: Option<String>,
    cache_dir: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    merge_policy: MergePolicy,
}

impl Default for AsyncInvoiceSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            cache_dir: None,
            download_dir: None,
            offline: false,
            timeout: crate::config::DEFAULT_TIMEOUT,
            merge_policy: MergePolicy::default(),
        }
    }
}

impl AsyncInvoiceSdkBuilder {
    /// Set the invoice API base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the directory downloaded documents are saved to.
    pub fn download_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.download_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncInvoiceSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = InvoiceSdk::builder();
            if let Some(url) = self.base_url {
                builder = builder.base_url(&url);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(dir) = self.download_dir {
                builder = builder.download_dir(dir);
            }
            builder = builder
                .offline(self.offline)
                .timeout(self.timeout)
                .merge_policy(self.merge_policy);
            let sdk = builder.build()?;
            Ok(AsyncInvoiceSdk::from_sdk(sdk))
        })
        .await
        .map_err(|e| InvoiceError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncInvoiceSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`InvoiceSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. Fetches are serialized through a
/// [`Mutex`]; document downloads bypass it and go straight to the shared
/// [`DownloadCoordinator`], so a second download started while one is in
/// flight is rejected rather than queued.
pub struct AsyncInvoiceSdk {
    inner: Arc<Mutex<InvoiceSdk>>,
    coordinator: Arc<DownloadCoordinator>,
    transfer: Arc<dyn DocumentTransfer + Send + Sync>,
}

impl AsyncInvoiceSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncInvoiceSdkBuilder {
        AsyncInvoiceSdkBuilder::default()
    }

    /// Wrap an already-built [`InvoiceSdk`].
    pub fn from_sdk(sdk: InvoiceSdk) -> Self {
        Self {
            coordinator: sdk.coordinator_handle(),
            transfer: sdk.transfer_handle(),
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&InvoiceSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&InvoiceSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| InvoiceError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| InvoiceError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>> {
        self.run(|s| s.fetch_all_records()).await
    }

    pub async fn search_records(&self, params: SearchParams) -> Result<Vec<InvoiceRecord>> {
        self.run(move |s| s.search_records(&params)).await
    }

    pub async fn fetch_summary_for_year(&self, year: &str) -> Result<YearSummary> {
        let year = year.to_string();
        self.run(move |s| s.fetch_summary_for_year(&year)).await
    }

    /// Download a document through the shared gate.
    ///
    /// Fails immediately with [`InvoiceError::Busy`] if another download is in flight.
    pub async fn download_locator(&self, key: &str, locator: &str, suggested_name: &str) -> Result<PathBuf> {
        let coordinator = self.coordinator.clone();
        let transfer = self.transfer.clone();
        let (key, locator, name) = (key.to_string(), locator.to_string(), suggested_name.to_string());
        tokio::task::spawn_blocking(move || {
            download::retrieve(coordinator.as_ref(), transfer.as_ref(), &key, &locator, &name)
        })
        .await
        .map_err(|e| InvoiceError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// The shared download gate.
    pub fn coordinator(&self) -> &DownloadCoordinator {
        &self.coordinator
    }
}
