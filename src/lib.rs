//! Energy invoice SDK for Rust.
//!
//! Fetches monthly energy-invoice records from the invoice API and derives
//! the two views built on top of them:
//!
//! - per-month category totals for a selected year, with current-vs-previous
//!   month comparisons ([`analytics::aggregate`], [`analytics::compare`]);
//! - a consumer-unit × month matrix of invoice documents
//!   ([`analytics::group_by_unit`]), whose cells are downloaded through a
//!   single system-wide gate ([`DownloadCoordinator`]).
//!
//! # Quick start
//!
//! ```no_run
//! use energy_invoices::{InvoiceSdk, UnitFilter};
//!
//! let sdk = InvoiceSdk::builder()
//!     .base_url("https://invoices.example.com/api")
//!     .build()
//!     .unwrap();
//!
//! let records = sdk.fetch_all_records().unwrap();
//! let dashboard = sdk.dashboard(&records, "2024");
//! let rows = sdk.library(&records, &UnitFilter::default());
//! ```

pub mod analytics;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod query;
pub mod sequencer;

pub use analytics::{
    aggregate, compare, group_by_unit, normalize, ComparisonResult, Dashboard, Direction,
    MergePolicy, PercentageChange, UnitFilter,
};
#[cfg(feature = "async")]
pub use async_client::AsyncInvoiceSdk;
pub use cache::CacheManager;
pub use client::{ApiClient, LazyClient, RecordSource};
pub use download::{Admission, DocumentTransfer, DownloadCoordinator, HttpDocumentTransfer};
pub use error::{InvoiceError, Result};
pub use query::SearchParams;
pub use sequencer::{FetchSequencer, RequestTicket, ViewState};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use models::{parse_period_label, ConsumerUnitRow, InvoiceRecord, MonthKey, YearSummary};

// ---------------------------------------------------------------------------
// InvoiceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`InvoiceSdk`] instance.
///
/// Use [`InvoiceSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](InvoiceSdkBuilder::build) to create the SDK.
pub struct InvoiceSdkBuilder {
    base_url: String,
    cache_dir: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    merge_policy: MergePolicy,
    record_source: Option<Arc<dyn RecordSource + Send + Sync>>,
    document_transfer: Option<Arc<dyn DocumentTransfer + Send + Sync>>,
}

impl Default for InvoiceSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_API_URL.to_string(),
            cache_dir: None,
            download_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            merge_policy: MergePolicy::default(),
            record_source: None,
            document_transfer: None,
        }
    }
}

impl InvoiceSdkBuilder {
    /// Set the invoice API base URL, e.g. `https://host/api`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set a custom cache directory for the offline snapshot.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/energy-invoices` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the directory downloaded invoice documents are saved to.
    ///
    /// Defaults to the user's download directory.
    pub fn download_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.download_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, record fetches are served from the last cached snapshot
    /// and the API is never called. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How [`InvoiceSdk::library`] resolves duplicate unit/month records.
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Replace the HTTP record source.
    pub fn record_source(mut self, source: Arc<dyn RecordSource + Send + Sync>) -> Self {
        self.record_source = Some(source);
        self
    }

    /// Replace the HTTP document transfer.
    pub fn document_transfer(mut self, transfer: Arc<dyn DocumentTransfer + Send + Sync>) -> Self {
        self.document_transfer = Some(transfer);
        self
    }

    /// Build the SDK.
    ///
    /// Validates the base URL and creates the cache directory. No request is
    /// sent until the first fetch.
    pub fn build(self) -> Result<InvoiceSdk> {
        let api = ApiClient::new(&self.base_url, self.timeout)?;
        let base_url = api.base_url().to_string();
        let cache = CacheManager::new(self.cache_dir, self.offline)?;

        let transfer: Arc<dyn DocumentTransfer + Send + Sync> = match self.document_transfer {
            Some(transfer) => transfer,
            None => Arc::new(HttpDocumentTransfer::new(
                Arc::clone(api.http()),
                api.base_url().clone(),
                self.download_dir.unwrap_or_else(config::default_download_dir),
            )),
        };
        let source: Arc<dyn RecordSource + Send + Sync> = match self.record_source {
            Some(source) => source,
            None => Arc::new(api),
        };

        Ok(InvoiceSdk {
            base_url,
            source,
            transfer,
            cache,
            merge_policy: self.merge_policy,
            coordinator: Arc::new(DownloadCoordinator::new()),
            sequencer: Arc::new(FetchSequencer::new()),
        })
    }
}

// ---------------------------------------------------------------------------
// InvoiceSdk
// ---------------------------------------------------------------------------

/// The main entry point for the energy invoice SDK.
///
/// Owns the record source, the offline cache, the document transfer, and the
/// one [`DownloadCoordinator`] every retrieval goes through. Analytics are
/// recomputed from records on every call; nothing derived is kept.
///
/// Created via [`InvoiceSdk::builder()`].
pub struct InvoiceSdk {
    base_url: String,
    source: Arc<dyn RecordSource + Send + Sync>,
    transfer: Arc<dyn DocumentTransfer + Send + Sync>,
    cache: CacheManager,
    merge_policy: MergePolicy,
    coordinator: Arc<DownloadCoordinator>,
    sequencer: Arc<FetchSequencer>,
}

impl InvoiceSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> InvoiceSdkBuilder {
        InvoiceSdkBuilder::default()
    }

    // -- Record retrieval ----------------------------------------------------

    /// Fetch every invoice record.
    ///
    /// Online, a successful fetch also refreshes the offline snapshot; a
    /// failure to write the snapshot is logged and does not fail the fetch.
    /// Offline, the snapshot is returned.
    pub fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>> {
        if self.cache.offline {
            return self.cache.load_records();
        }
        let records = self.source.fetch_all_records()?;
        info!("Fetched {} invoice records", records.len());
        if let Err(e) = self.cache.store_records(&records) {
            warn!("Could not update the offline snapshot: {}", e);
        }
        Ok(records)
    }

    /// Fetch records matching server-side search filters.
    ///
    /// Offline, the same filters are applied to the snapshot: name filters as
    /// case-insensitive prefixes, `year` as an exact match.
    pub fn search_records(&self, params: &SearchParams) -> Result<Vec<InvoiceRecord>> {
        if self.cache.offline {
            let records = self.cache.load_records()?;
            return Ok(search_locally(records, params));
        }
        self.source.fetch_records_by_search(params)
    }

    /// Fetch the server's pre-aggregated summary for `year`.
    ///
    /// Not available offline.
    pub fn fetch_summary_for_year(&self, year: &str) -> Result<YearSummary> {
        if self.cache.offline {
            return Err(InvoiceError::NotFound(format!(
                "Year summary for {} is not available offline",
                year
            )));
        }
        self.source.fetch_summary_for_year(year)
    }

    /// Fetch invoices for one client number and period label.
    pub fn fetch_by_client(&self, client_number: &str, period_label: &str) -> Result<Vec<InvoiceRecord>> {
        if self.cache.offline {
            let client_number = client_number.trim();
            let period_label = period_label.trim();
            return Ok(self
                .cache
                .load_records()?
                .into_iter()
                .filter(|r| {
                    r.client_number.as_deref().map(str::trim) == Some(client_number)
                        && r.period_label.trim().eq_ignore_ascii_case(period_label)
                })
                .collect());
        }
        self.source.fetch_by_client(client_number, period_label)
    }

    // -- Derived views -------------------------------------------------------

    /// Aggregate `records` for `year` into chart series and card metrics.
    pub fn dashboard(&self, records: &[InvoiceRecord], year: &str) -> Dashboard {
        analytics::build_dashboard(records, year)
    }

    /// Pivot `records` into one row per consumer unit after applying `filter`.
    pub fn library(&self, records: &[InvoiceRecord], filter: &UnitFilter) -> Vec<ConsumerUnitRow> {
        analytics::group_by_unit_with(filter.apply(records), self.merge_policy)
    }

    // -- Document retrieval --------------------------------------------------

    /// Download the document for one cell of the unit × month matrix.
    ///
    /// Fails with [`InvoiceError::NotFound`] if the row has no locator for
    /// `month`, and with [`InvoiceError::Busy`] if another retrieval is in
    /// flight.
    pub fn download(&self, row: &ConsumerUnitRow, month: &MonthKey) -> Result<PathBuf> {
        let locator = row.locator_for(month).ok_or_else(|| {
            InvoiceError::NotFound(format!(
                "No document for {} in {}",
                row.consumer_unit_name, month
            ))
        })?;
        let key = download::document_key(row, month);
        let name = download::suggested_file_name(row, month);
        self.download_locator(&key, locator, &name)
    }

    /// Download an arbitrary locator under `key` through the gate.
    pub fn download_locator(&self, key: &str, locator: &str, suggested_name: &str) -> Result<PathBuf> {
        download::retrieve(
            self.coordinator.as_ref(),
            self.transfer.as_ref(),
            key,
            locator,
            suggested_name,
        )
    }

    // -- Accessors -----------------------------------------------------------

    /// The download gate; use it to disable triggers while anything is pending.
    pub fn coordinator(&self) -> &DownloadCoordinator {
        &self.coordinator
    }

    /// Shared handle to the download gate.
    pub fn coordinator_handle(&self) -> Arc<DownloadCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Shared handle to the document transfer.
    pub fn transfer_handle(&self) -> Arc<dyn DocumentTransfer + Send + Sync> {
        Arc::clone(&self.transfer)
    }

    /// Request-generation tokens for views that fetch on every filter change.
    pub fn sequencer(&self) -> &FetchSequencer {
        &self.sequencer
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn is_offline(&self) -> bool {
        self.cache.offline
    }

    /// Remove the offline snapshot.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }
}

fn search_locally(records: Vec<InvoiceRecord>, params: &SearchParams) -> Vec<InvoiceRecord> {
    let (_, pairs) = params.build();
    let get = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_lowercase())
    };
    let unit_prefix = get(query::CONSUMER_UNIT_NAME_PARAM);
    let distributor_prefix = get(query::DISTRIBUTOR_NAME_PARAM);
    let year = params.selected_year().map(str::to_string);

    records
        .into_iter()
        .filter(|r| {
            unit_prefix
                .as_ref()
                .map_or(true, |p| r.consumer_unit_name.to_lowercase().starts_with(p))
        })
        .filter(|r| {
            distributor_prefix
                .as_ref()
                .map_or(true, |p| r.distributor_name.to_lowercase().starts_with(p))
        })
        .filter(|r| {
            year.as_ref().map_or(true, |y| {
                parse_period_label(&r.period_label).is_some_and(|key| &key.year == y)
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for InvoiceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvoiceSdk(base_url={}, cache_dir={}, offline={}, downloading={})",
            self.base_url,
            self.cache.cache_dir.display(),
            self.cache.offline,
            self.coordinator.pending_key().as_deref().unwrap_or("-")
        )
    }
}
