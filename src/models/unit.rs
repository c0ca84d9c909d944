use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::period::Month;

// ---------------------------------------------------------------------------
// MonthKey — Column key of the per-unit document index
// ---------------------------------------------------------------------------

/// A recognized month, or the raw month text of a label that did not parse.
///
/// Known months order first (calendar order), raw keys after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonthKey {
    Known(Month),
    Raw(String),
}

impl MonthKey {
    pub fn as_str(&self) -> &str {
        match self {
            MonthKey::Known(m) => m.abbreviation(),
            MonthKey::Raw(raw) => raw,
        }
    }
}

impl From<Month> for MonthKey {
    fn from(month: Month) -> Self {
        MonthKey::Known(month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConsumerUnitRow — One pivoted row per consumer unit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerUnitRow {
    pub consumer_unit_name: String,
    pub consumer_unit_number: String,
    pub distributor_name: String,
    pub months_index: BTreeMap<MonthKey, String>,
}

impl ConsumerUnitRow {
    /// Document locator for a recognized month, if any.
    pub fn locator(&self, month: Month) -> Option<&str> {
        self.months_index
            .get(&MonthKey::Known(month))
            .map(String::as_str)
    }

    /// Document locator for any month key, including raw ones.
    pub fn locator_for(&self, key: &MonthKey) -> Option<&str> {
        self.months_index.get(key).map(String::as_str)
    }
}
