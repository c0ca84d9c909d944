//! Pivot of flat invoice records into one row per consumer unit.
//!
//! Each row carries a sparse month → document-locator index. Unlike the
//! aggregator, the pivot never drops a record over its period label: an
//! unrecognized month code is kept as a raw column key.

use std::collections::HashMap;

use crate::models::{split_label, ConsumerUnitRow, InvoiceRecord, Month, MonthKey};

// ---------------------------------------------------------------------------
// MergePolicy
// ---------------------------------------------------------------------------

/// How to resolve two records for the same unit and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The record folded last replaces the earlier locator.
    #[default]
    LastWriteWins,
    /// The first locator seen is kept.
    FirstWriteWins,
}

// ---------------------------------------------------------------------------
// UnitFilter
// ---------------------------------------------------------------------------

/// Local case-insensitive substring filter applied before grouping.
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub consumer_unit_name: Option<String>,
    pub distributor_name: Option<String>,
}

impl UnitFilter {
    pub fn matches(&self, record: &InvoiceRecord) -> bool {
        contains_ignore_case(&record.consumer_unit_name, self.consumer_unit_name.as_deref())
            && contains_ignore_case(&record.distributor_name, self.distributor_name.as_deref())
    }

    /// Return the records that pass the filter, in input order.
    pub fn apply<'a>(&self, records: &'a [InvoiceRecord]) -> Vec<&'a InvoiceRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Column key for a record's period label.
///
/// `"FEV/2024"` maps to `Known(Fev)`. `"13/2024"` maps to `Raw("13")`, and a
/// label with no `/` maps to the whole trimmed label.
pub fn month_key(period_label: &str) -> MonthKey {
    let code = match split_label(period_label) {
        Some(parts) => parts.month_code,
        None => period_label.trim(),
    };
    match Month::from_code(code) {
        Some(month) => MonthKey::Known(month),
        None => MonthKey::Raw(code.to_string()),
    }
}

/// Group records by consumer-unit name with [`MergePolicy::LastWriteWins`].
pub fn group_by_unit<'a, I>(records: I) -> Vec<ConsumerUnitRow>
where
    I: IntoIterator<Item = &'a InvoiceRecord>,
{
    group_by_unit_with(records, MergePolicy::default())
}

/// Group records by consumer-unit name.
///
/// Rows come out in first-seen order of their unit name. Display fields are
/// taken from the first record of each unit. Records without a locator still
/// create their unit's row but add no month entry.
pub fn group_by_unit_with<'a, I>(records: I, policy: MergePolicy) -> Vec<ConsumerUnitRow>
where
    I: IntoIterator<Item = &'a InvoiceRecord>,
{
    let mut rows: Vec<ConsumerUnitRow> = Vec::new();
    let mut index_of: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let idx = *index_of
            .entry(record.consumer_unit_name.as_str())
            .or_insert_with(|| {
                rows.push(ConsumerUnitRow {
                    consumer_unit_name: record.consumer_unit_name.clone(),
                    consumer_unit_number: record.consumer_unit_number.clone(),
                    distributor_name: record.distributor_name.clone(),
                    months_index: Default::default(),
                });
                rows.len() - 1
            });

        let Some(locator) = record.pdf_locator.as_deref() else {
            continue;
        };
        if locator.trim().is_empty() {
            continue;
        }

        let key = month_key(&record.period_label);
        let months = &mut rows[idx].months_index;
        match policy {
            MergePolicy::LastWriteWins => {
                months.insert(key, locator.to_string());
            }
            MergePolicy::FirstWriteWins => {
                months.entry(key).or_insert_with(|| locator.to_string());
            }
        }
    }

    rows
}
