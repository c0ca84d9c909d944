//! Per-month category totals for one selected year.
//!
//! The aggregator is a pure fold over already-resident records: it is re-run
//! from scratch whenever the record set or the selected year changes.

use std::collections::HashMap;

use log::debug;

use super::normalize::{normalize, round2};
use crate::models::{parse_period_label, InvoiceRecord, PeriodAggregate, PeriodKey};

/// Group `records` by (year, month) for `year` and sum their categories.
///
/// Records with a malformed period label or an unknown month code are skipped.
/// The result holds one [`PeriodAggregate`] per month present, ordered
/// `JAN` .. `DEZ`.
pub fn aggregate(records: &[InvoiceRecord], year: &str) -> Vec<PeriodAggregate> {
    let mut by_period: HashMap<PeriodKey, PeriodAggregate> = HashMap::new();

    for record in records {
        let key = match parse_period_label(&record.period_label) {
            Some(key) => key,
            None => {
                debug!(
                    "Skipping record for '{}': unparseable period label '{}'",
                    record.consumer_unit_name, record.period_label
                );
                continue;
            }
        };
        if key.year != year {
            continue;
        }

        let agg = by_period
            .entry(key.clone())
            .or_insert_with(|| PeriodAggregate::new(key));
        fold(agg, record);
    }

    let mut out: Vec<PeriodAggregate> = by_period.into_values().collect();
    out.sort_by_key(|agg| agg.key.month.number());
    out
}

/// Add one record into its period's running totals.
fn fold(agg: &mut PeriodAggregate, record: &InvoiceRecord) {
    let generated_kwh = normalize(record.generated_energy_kwh.as_ref());
    let grid_kwh = normalize(record.grid_energy_kwh.as_ref());
    let compensated_kwh = normalize(record.compensated_energy_kwh.as_ref());
    let generated_value = normalize(record.generated_energy_value.as_ref());
    let grid_value = normalize(record.grid_energy_value.as_ref());
    let compensated_value = normalize(record.compensated_energy_value.as_ref());
    let lighting = normalize(record.public_lighting_contribution.as_ref());

    agg.total_consumption_kwh = round2(agg.total_consumption_kwh + generated_kwh + grid_kwh);
    agg.total_compensated_kwh = round2(agg.total_compensated_kwh + compensated_kwh);
    agg.total_financial_value =
        round2(agg.total_financial_value + generated_value + grid_value + lighting);
    agg.total_savings_value = round2(agg.total_savings_value + compensated_value.abs());

    if compensated_value < 0.0 {
        agg.spend_exceeds_savings = true;
    }
}

/// Distinct years present in `records`, ascending. Unparseable labels are ignored.
pub fn available_years(records: &[InvoiceRecord]) -> Vec<String> {
    let mut years: Vec<String> = records
        .iter()
        .filter_map(|r| parse_period_label(&r.period_label))
        .map(|key| key.year)
        .collect();
    years.sort();
    years.dedup();
    years
}
