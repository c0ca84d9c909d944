use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";

pub const INVOICES_PATH: &str = "invoices";
pub const SEARCH_PATH: &str = "invoices/search";
pub const DASHBOARD_PATH: &str = "dashboard";

/// File name of the offline snapshot written after each full fetch.
pub const RECORDS_SNAPSHOT: &str = "records.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("energy-invoices")
    } else {
        PathBuf::from(".energy-invoices-cache")
    }
}

pub fn default_download_dir() -> PathBuf {
    if let Some(downloads) = dirs::download_dir() {
        downloads
    } else {
        PathBuf::from(".")
    }
}
