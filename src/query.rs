//! Search query-string builder for the invoice search endpoint.
//!
//! Builder methods return `&mut Self` for chaining. Blank values are dropped
//! so the server never receives empty filters.
//!
//! # Example
//!
//! ```rust
//! use energy_invoices::SearchParams;
//! let (path, params) = SearchParams::new()
//!     .consumer_unit_name("Escola")
//!     .year("2024")
//!     .build();
//! assert_eq!(path, "invoices/search");
//! assert_eq!(params.len(), 2);
//! ```

use crate::config;

pub const CONSUMER_UNIT_NAME_PARAM: &str = "consumerUnitName";
pub const DISTRIBUTOR_NAME_PARAM: &str = "distributorName";
pub const YEAR_PARAM: &str = "year";

/// Filters forwarded to the server-side search.
///
/// Name filters are prefix matches on the server; `year` is an exact match on
/// the period label's year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    consumer_unit_name: Option<String>,
    distributor_name: Option<String>,
    year: Option<String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consumer_unit_name(&mut self, prefix: &str) -> &mut Self {
        self.consumer_unit_name = non_blank(prefix);
        self
    }

    pub fn distributor_name(&mut self, prefix: &str) -> &mut Self {
        self.distributor_name = non_blank(prefix);
        self
    }

    pub fn year(&mut self, year: &str) -> &mut Self {
        self.year = non_blank(year);
        self
    }

    pub fn selected_year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    /// Build the endpoint path and its `(name, value)` query pairs.
    pub fn build(&self) -> (String, Vec<(String, String)>) {
        let mut params = Vec::new();
        if let Some(name) = &self.consumer_unit_name {
            params.push((CONSUMER_UNIT_NAME_PARAM.to_string(), name.clone()));
        }
        if let Some(name) = &self.distributor_name {
            params.push((DISTRIBUTOR_NAME_PARAM.to_string(), name.clone()));
        }
        if let Some(year) = &self.year {
            params.push((YEAR_PARAM.to_string(), year.clone()));
        }
        (config::SEARCH_PATH.to_string(), params)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
