//! Chart-ready projections of a period aggregate sequence.

use crate::models::{EnergyPoint, FinancialPoint, PeriodAggregate, SeriesPoint};

pub fn energy_series(aggregates: &[PeriodAggregate]) -> Vec<EnergyPoint> {
    aggregates
        .iter()
        .map(|agg| EnergyPoint {
            name: agg.label().to_string(),
            consumption_kwh: agg.total_consumption_kwh,
            compensated_kwh: agg.total_compensated_kwh,
        })
        .collect()
}

pub fn financial_series(aggregates: &[PeriodAggregate]) -> Vec<FinancialPoint> {
    aggregates
        .iter()
        .map(|agg| FinancialPoint {
            name: agg.label().to_string(),
            financial_value: agg.total_financial_value,
            savings_value: agg.total_savings_value,
            spend_exceeds_savings: agg.spend_exceeds_savings,
        })
        .collect()
}

/// Same shape as the server's `groupedData`, so both dashboard modes render alike.
pub fn combined_series(aggregates: &[PeriodAggregate]) -> Vec<SeriesPoint> {
    aggregates.iter().map(SeriesPoint::from).collect()
}
