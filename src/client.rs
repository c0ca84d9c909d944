//! HTTP boundary to the invoice API.
//!
//! Every response is validated here, before any record reaches the analytics
//! layer: a top-level payload that is not an array, or any record missing its
//! required text fields, fails the whole fetch. No partial record set is ever
//! returned.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;

use crate::config;
use crate::error::{InvoiceError, Result};
use crate::models::{InvoiceRecord, YearSummary};
use crate::query::{SearchParams, YEAR_PARAM};

// ---------------------------------------------------------------------------
// RecordSource
// ---------------------------------------------------------------------------

/// Anything that can produce invoice records for the SDK.
pub trait RecordSource {
    fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>>;

    fn fetch_records_by_search(&self, params: &SearchParams) -> Result<Vec<InvoiceRecord>>;

    /// Server pre-aggregated dashboard payload for `year`.
    fn fetch_summary_for_year(&self, year: &str) -> Result<YearSummary>;

    /// Invoices for one client number and period label, e.g. `("123", "JAN/2024")`.
    ///
    /// The default implementation filters a full fetch.
    fn fetch_by_client(&self, client_number: &str, period_label: &str) -> Result<Vec<InvoiceRecord>> {
        let client_number = client_number.trim();
        let period_label = period_label.trim();
        Ok(self
            .fetch_all_records()?
            .into_iter()
            .filter(|r| {
                r.client_number.as_deref().map(str::trim) == Some(client_number)
                    && r.period_label.trim().eq_ignore_ascii_case(period_label)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Response validation
// ---------------------------------------------------------------------------

/// Turn a decoded JSON payload into validated records.
///
/// Fails with [`InvoiceError::UnexpectedResponse`] if `payload` is not an
/// array, and with [`InvoiceError::InvalidRecord`] on the first element that
/// does not decode or validate.
pub fn parse_records(payload: Value) -> Result<Vec<InvoiceRecord>> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(InvoiceError::UnexpectedResponse(format!(
                "expected an array of invoices, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record: InvoiceRecord = serde_json::from_value(item)
            .map_err(|e| InvoiceError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;
        record
            .validate()
            .map_err(|reason| InvoiceError::InvalidRecord { index, reason })?;
        records.push(record);
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// LazyClient
// ---------------------------------------------------------------------------

/// Blocking HTTP client built on first use.
///
/// Shared by the record source and the document transfer, so an SDK that
/// only ever serves its offline snapshot never builds one.
#[derive(Debug)]
pub struct LazyClient {
    timeout: Duration,
    client: OnceLock<Client>,
}

impl LazyClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self {
            timeout: config::DEFAULT_TIMEOUT,
            client: OnceLock::from(client),
        }
    }

    pub fn is_built(&self) -> bool {
        self.client.get().is_some()
    }

    /// The client, building it on the first call.
    pub fn get(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(self.client.get_or_init(|| built))
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Blocking HTTP client for the invoice API.
pub struct ApiClient {
    base_url: Url,
    http: Arc<LazyClient>,
}

impl ApiClient {
    /// Create a client for `base_url`. No HTTP client is built until the first request.
    ///
    /// A trailing `/` is added to the base when missing so relative endpoint
    /// paths join under it rather than replacing its last segment.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            base_url,
            http: Arc::new(LazyClient::new(timeout)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The lazily built HTTP client, shared with the document transfer.
    pub fn http(&self) -> &Arc<LazyClient> {
        &self.http
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| InvoiceError::InvalidArgument(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn get_json(&self, url: Url) -> Result<Value> {
        info!("Fetching {}", url);
        let resp = self.http.get()?.get(url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }
}

impl RecordSource for ApiClient {
    fn fetch_all_records(&self) -> Result<Vec<InvoiceRecord>> {
        let url = self.endpoint(config::INVOICES_PATH)?;
        parse_records(self.get_json(url)?)
    }

    fn fetch_records_by_search(&self, params: &SearchParams) -> Result<Vec<InvoiceRecord>> {
        let (path, pairs) = params.build();
        let mut url = self.endpoint(&path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        parse_records(self.get_json(url)?)
    }

    fn fetch_summary_for_year(&self, year: &str) -> Result<YearSummary> {
        let mut url = self.endpoint(config::DASHBOARD_PATH)?;
        url.query_pairs_mut().append_pair(YEAR_PARAM, year.trim());
        let payload = self.get_json(url)?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Invoices for one client number and period label, e.g. `("123", "JAN/2024")`.
    ///
    /// Both values are sent as single, percent-encoded path segments.
    fn fetch_by_client(&self, client_number: &str, period_label: &str) -> Result<Vec<InvoiceRecord>> {
        if client_number.trim().is_empty() {
            return Err(InvoiceError::InvalidArgument(
                "client number is empty".to_string(),
            ));
        }
        let mut url = self.endpoint(config::INVOICES_PATH)?;
        url.path_segments_mut()
            .map_err(|_| InvoiceError::InvalidArgument(format!("base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(client_number.trim())
            .push(period_label.trim());
        parse_records(self.get_json(url)?)
    }
}

/// Parse and normalize an API base URL.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| InvoiceError::InvalidArgument(format!("invalid base URL '{}': {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(InvoiceError::InvalidArgument(format!(
            "base URL '{}' cannot be used as a base",
            base_url
        )));
    }
    Ok(url)
}
