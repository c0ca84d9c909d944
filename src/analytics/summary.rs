//! Current-vs-previous-month card metrics and the assembled dashboard view.

use serde::Serialize;

use super::aggregate::aggregate;
use super::compare::{compare, ComparisonResult};
use super::series::{energy_series, financial_series};
use crate::models::{
    CardTotals, EnergyPoint, FinancialPoint, InvoiceRecord, Month, PeriodAggregate,
};

/// One dashboard card: a category's latest value and its change against the previous period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetric {
    pub category: &'static str,
    pub current: f64,
    pub previous: f64,
    pub comparison: ComparisonResult,
}

impl CardMetric {
    fn new(category: &'static str, current: f64, previous: f64) -> Self {
        Self {
            category,
            current,
            previous,
            comparison: compare(current, previous),
        }
    }
}

/// Card metrics for the last aggregate in `aggregates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub month: Month,
    pub previous_month: Option<Month>,
    pub cards: Vec<CardMetric>,
}

/// Compare the latest period against the one before it.
///
/// `aggregates` must be in chronological order, as returned by
/// [`aggregate`](super::aggregate::aggregate). With a single period, the
/// previous values are zero. Returns `None` for an empty slice.
pub fn period_over_period(aggregates: &[PeriodAggregate]) -> Option<PeriodSummary> {
    let (current, rest) = aggregates.split_last()?;
    let previous = rest.last();

    let prev = |f: fn(&PeriodAggregate) -> f64| previous.map(f).unwrap_or(0.0);

    let cards = vec![
        CardMetric::new(
            "consumption_kwh",
            current.total_consumption_kwh,
            prev(|a| a.total_consumption_kwh),
        ),
        CardMetric::new(
            "compensated_kwh",
            current.total_compensated_kwh,
            prev(|a| a.total_compensated_kwh),
        ),
        CardMetric::new(
            "financial_value",
            current.total_financial_value,
            prev(|a| a.total_financial_value),
        ),
        CardMetric::new(
            "savings_value",
            current.total_savings_value,
            prev(|a| a.total_savings_value),
        ),
    ];

    Some(PeriodSummary {
        month: current.key.month,
        previous_month: previous.map(|a| a.key.month),
        cards,
    })
}

impl CardTotals {
    /// Comparisons for the four server-computed cards, in display order.
    pub fn comparisons(&self) -> Vec<CardMetric> {
        let (cur, prev) = (&self.current, &self.previous);
        vec![
            CardMetric::new("generated_energy", cur.generated_energy, prev.generated_energy),
            CardMetric::new("consumed_energy", cur.consumed_energy, prev.consumed_energy),
            CardMetric::new(
                "compensated_energy",
                cur.compensated_energy,
                prev.compensated_energy,
            ),
            CardMetric::new("credit_balance", cur.credit_balance, prev.credit_balance),
        ]
    }
}

// ---------------------------------------------------------------------------
// Dashboard — Everything the chart and card layer needs for one year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub year: String,
    pub aggregates: Vec<PeriodAggregate>,
    pub energy: Vec<EnergyPoint>,
    pub financial: Vec<FinancialPoint>,
    pub summary: Option<PeriodSummary>,
}

/// Aggregate `records` for `year` and derive both chart series and the card metrics.
pub fn build_dashboard(records: &[InvoiceRecord], year: &str) -> Dashboard {
    let aggregates = aggregate(records, year);
    Dashboard {
        year: year.to_string(),
        energy: energy_series(&aggregates),
        financial: financial_series(&aggregates),
        summary: period_over_period(&aggregates),
        aggregates,
    }
}
