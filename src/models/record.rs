use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawNumber — A numeric field as the API sends it (text or number)
// ---------------------------------------------------------------------------

/// Invoice quantities arrive either as JSON numbers or as strings.
///
/// Any other JSON value is kept as [`RawNumber::Other`] so one odd field never
/// rejects its record. Use [`crate::analytics::normalize`] to turn one into an
/// `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    /// Booleans, arrays and objects. Normalizes to 0.
    Other(serde_json::Value),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// InvoiceRecord — One billing period for one consumer unit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub period_label: String,
    pub consumer_unit_name: String,
    #[serde(default)]
    pub consumer_unit_number: String,
    #[serde(default)]
    pub distributor_name: String,
    #[serde(default)]
    pub client_number: Option<String>,
    #[serde(default)]
    pub generated_energy_kwh: Option<RawNumber>,
    #[serde(default)]
    pub grid_energy_kwh: Option<RawNumber>,
    #[serde(default)]
    pub compensated_energy_kwh: Option<RawNumber>,
    #[serde(default)]
    pub generated_energy_value: Option<RawNumber>,
    #[serde(default)]
    pub grid_energy_value: Option<RawNumber>,
    #[serde(default)]
    pub compensated_energy_value: Option<RawNumber>,
    #[serde(default)]
    pub public_lighting_contribution: Option<RawNumber>,
    #[serde(default)]
    pub pdf_locator: Option<String>,
}

impl InvoiceRecord {
    /// Check the text fields the core relies on.
    ///
    /// Numeric fields are never rejected here; they default to 0 downstream.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.consumer_unit_name.trim().is_empty() {
            return Err("consumerUnitName is blank".to_string());
        }
        if self.period_label.trim().is_empty() {
            return Err("periodLabel is blank".to_string());
        }
        Ok(())
    }
}
