use serde::{Deserialize, Serialize};

use super::period::PeriodKey;

// ---------------------------------------------------------------------------
// PeriodAggregate — Category totals for one (year, month)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAggregate {
    pub key: PeriodKey,
    pub total_consumption_kwh: f64,
    pub total_compensated_kwh: f64,
    pub total_financial_value: f64,
    pub total_savings_value: f64,
    pub spend_exceeds_savings: bool,
}

impl PeriodAggregate {
    pub fn new(key: PeriodKey) -> Self {
        Self {
            key,
            total_consumption_kwh: 0.0,
            total_compensated_kwh: 0.0,
            total_financial_value: 0.0,
            total_savings_value: 0.0,
            spend_exceeds_savings: false,
        }
    }

    /// Month abbreviation used as the chart label, e.g. `"Mar"`.
    pub fn label(&self) -> &'static str {
        self.key.month.abbreviation()
    }
}

// ---------------------------------------------------------------------------
// SeriesPoint — Chart row, shared by the server summary and local aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    #[serde(rename = "totalKwh")]
    pub total_kwh: f64,
    #[serde(rename = "totalCompensada")]
    pub total_compensated: f64,
    #[serde(rename = "totalFinance")]
    pub total_finance: f64,
    #[serde(rename = "totalEconomia")]
    pub total_savings: f64,
    #[serde(
        rename = "gastoMaiorQueEconomia",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spend_exceeds_savings: Option<bool>,
}

impl From<&PeriodAggregate> for SeriesPoint {
    fn from(agg: &PeriodAggregate) -> Self {
        Self {
            name: agg.label().to_string(),
            total_kwh: agg.total_consumption_kwh,
            total_compensated: agg.total_compensated_kwh,
            total_finance: agg.total_financial_value,
            total_savings: agg.total_savings_value,
            spend_exceeds_savings: Some(agg.spend_exceeds_savings),
        }
    }
}

/// Consumption vs compensated energy for one month (kWh).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyPoint {
    pub name: String,
    pub consumption_kwh: f64,
    pub compensated_kwh: f64,
}

/// Value without distributed generation vs GD savings for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPoint {
    pub name: String,
    pub financial_value: f64,
    pub savings_value: f64,
    pub spend_exceeds_savings: bool,
}

// ---------------------------------------------------------------------------
// CardTotals / YearSummary — Server pre-aggregated dashboard payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardValues {
    #[serde(rename = "energiaGerada", default)]
    pub generated_energy: f64,
    #[serde(rename = "energiaConsumida", default)]
    pub consumed_energy: f64,
    #[serde(rename = "energiaCompensada", default)]
    pub compensated_energy: f64,
    #[serde(rename = "saldoCreditos", default)]
    pub credit_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardTotals {
    #[serde(flatten)]
    pub current: CardValues,
    #[serde(rename = "previousValues", default)]
    pub previous: CardValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    #[serde(rename = "cardData")]
    pub card_totals: CardTotals,
    #[serde(rename = "groupedData", default)]
    pub period_series: Vec<SeriesPoint>,
}
