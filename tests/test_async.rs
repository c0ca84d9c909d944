//! Async wrapper tests. Run with `--features async`.

#![cfg(feature = "async")]

mod common;

use std::sync::Arc;

use common::{RecordingTransfer, StaticSource};
use energy_invoices::{AsyncInvoiceSdk, InvoiceError, SearchParams};

#[tokio::test]
async fn async_fetches_run_on_the_blocking_pool() {
    let source = Arc::new(StaticSource::new(common::scenario_records()));
    let (sdk, _tmp) = common::setup_sdk(source, Arc::new(RecordingTransfer::default()), false);
    let sdk = AsyncInvoiceSdk::from_sdk(sdk);

    let records = sdk.fetch_all_records().await.unwrap();
    assert_eq!(records.len(), 3);

    let mut params = SearchParams::new();
    params.year("2024");
    assert_eq!(sdk.search_records(params).await.unwrap().len(), 3);

    let dashboard = sdk
        .run(move |s| Ok(s.dashboard(&records, "2024")))
        .await
        .unwrap();
    assert_eq!(dashboard.aggregates.len(), 2);
}

#[tokio::test]
async fn async_download_shares_the_gate() {
    let transfer = Arc::new(RecordingTransfer::default());
    let (sdk, _tmp) = common::setup_sdk(
        Arc::new(StaticSource::new(Vec::new())),
        transfer.clone(),
        false,
    );
    let sdk = AsyncInvoiceSdk::from_sdk(sdk);

    sdk.download_locator("UC1::Jan", "a.pdf", "a.pdf").await.unwrap();
    assert_eq!(transfer.calls().len(), 1);

    sdk.coordinator().begin_retrieval("held");
    let err = sdk
        .download_locator("UC2::Jan", "b.pdf", "b.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::Busy { .. }));
    assert_eq!(transfer.calls().len(), 1);
}

#[tokio::test]
async fn async_builder_offline_without_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = AsyncInvoiceSdk::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .await
        .unwrap();
    assert!(matches!(
        sdk.fetch_all_records().await,
        Err(InvoiceError::NotFound(_))
    ));
}
