//! Shared test fixtures for the energy invoice SDK integration tests.
//!
//! Provides sample records built from JSON, a static in-memory
//! [`RecordSource`], and document transfers that record or block their calls.

#![allow(dead_code)]

use energy_invoices::models::{InvoiceRecord, YearSummary};
use energy_invoices::{DocumentTransfer, InvoiceError, InvoiceSdk, RecordSource, Result, SearchParams};
use serde_json::json;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Build a record from a JSON object. Panics on invalid JSON shape.
pub fn record(value: serde_json::Value) -> InvoiceRecord {
    serde_json::from_value(value).unwrap()
}

/// A record with all seven quantities set, as plain numbers.
#[allow(clippy::too_many_arguments)]
pub fn full_record(
    unit: &str,
    period: &str,
    gen_kwh: f64,
    grid_kwh: f64,
    comp_kwh: f64,
    gen_val: f64,
    grid_val: f64,
    contrib: f64,
    comp_val: f64,
) -> InvoiceRecord {
    record(json!({
        "periodLabel": period,
        "consumerUnitName": unit,
        "consumerUnitNumber": "3001",
        "distributorName": "CEMIG",
        "generatedEnergyKwh": gen_kwh,
        "gridEnergyKwh": grid_kwh,
        "compensatedEnergyKwh": comp_kwh,
        "generatedEnergyValue": gen_val,
        "gridEnergyValue": grid_val,
        "publicLightingContribution": contrib,
        "compensatedEnergyValue": comp_val,
    }))
}

/// A record carrying only what the pivot needs.
pub fn doc_record(unit: &str, period: &str, locator: &str) -> InvoiceRecord {
    record(json!({
        "periodLabel": period,
        "consumerUnitName": unit,
        "consumerUnitNumber": format!("{}-no", unit),
        "distributorName": "CEMIG",
        "pdfLocator": locator,
    }))
}

/// Two JAN records and one FEV record with doubled values, all for `UC1`.
pub fn scenario_records() -> Vec<InvoiceRecord> {
    vec![
        full_record("UC1", "JAN/2024", 100.0, 10.0, 50.0, 80.0, 8.0, 2.0, -40.0),
        full_record("UC1", "JAN/2024", 100.0, 10.0, 50.0, 80.0, 8.0, 2.0, -40.0),
        full_record("UC1", "FEV/2024", 200.0, 20.0, 100.0, 160.0, 16.0, 4.0, -80.0),
    ]
}

// ---------------------------------------------------------------------------
// Record sources
// ---------------------------------------------------------------------------

/// In-memory record source. Search applies only the year filter.
pub struct StaticSource {
    pub records: Vec<InvoiceRecord>,
    pub summary: YearSummary,
    pub calls: Mutex<usize>,
}

impl StaticSource {
    pub fn new(records: Vec<InvoiceRecord>) -> Self {
        Self {
            records,
            summary: YearSummary::default(),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl RecordSource for StaticSource {
    fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.records.clone())
    }

    fn fetch_records_by_search(&self, params: &SearchParams) -> Result<Vec<InvoiceRecord>> {
        *self.calls.lock().unwrap() += 1;
        let year = params.selected_year().map(|y| format!("/{}", y));
        Ok(self
            .records
            .iter()
            .filter(|r| year.as_ref().map_or(true, |y| r.period_label.ends_with(y.as_str())))
            .cloned()
            .collect())
    }

    fn fetch_summary_for_year(&self, _year: &str) -> Result<YearSummary> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.summary.clone())
    }
}

/// A source whose every fetch fails.
pub struct FailingSource;

impl RecordSource for FailingSource {
    fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>> {
        Err(InvoiceError::UnexpectedResponse("boom".to_string()))
    }

    fn fetch_records_by_search(&self, _params: &SearchParams) -> Result<Vec<InvoiceRecord>> {
        Err(InvoiceError::UnexpectedResponse("boom".to_string()))
    }

    fn fetch_summary_for_year(&self, _year: &str) -> Result<YearSummary> {
        Err(InvoiceError::UnexpectedResponse("boom".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Document transfers
// ---------------------------------------------------------------------------

/// Records every call; fails when `fail` is set.
#[derive(Default)]
pub struct RecordingTransfer {
    pub calls: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingTransfer {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentTransfer for RecordingTransfer {
    fn retrieve_and_save(&self, locator: &str, suggested_name: &str) -> Result<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push((locator.to_string(), suggested_name.to_string()));
        if self.fail {
            Err(InvoiceError::Transfer(format!("{} responded with 404", locator)))
        } else {
            Ok(PathBuf::from(suggested_name))
        }
    }
}

/// Signals when a transfer starts, then waits until released.
pub struct BlockingTransfer {
    pub started: Mutex<Sender<()>>,
    pub release: Mutex<Receiver<()>>,
}

impl DocumentTransfer for BlockingTransfer {
    fn retrieve_and_save(&self, _locator: &str, suggested_name: &str) -> Result<PathBuf> {
        self.started.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        Ok(PathBuf::from(suggested_name))
    }
}

// ---------------------------------------------------------------------------
// SDK setup
// ---------------------------------------------------------------------------

/// An SDK backed by the given fakes and a temporary cache directory.
///
/// The caller must keep the returned `TempDir` alive for the duration of the
/// test so the cache directory is not deleted prematurely.
pub fn setup_sdk(
    source: Arc<dyn RecordSource + Send + Sync>,
    transfer: Arc<dyn DocumentTransfer + Send + Sync>,
    offline: bool,
) -> (InvoiceSdk, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = InvoiceSdk::builder()
        .cache_dir(tmp_dir.path())
        .download_dir(tmp_dir.path().join("downloads"))
        .offline(offline)
        .record_source(source)
        .document_transfer(transfer)
        .build()
        .unwrap();
    (sdk, tmp_dir)
}
