//! Numeric coercion for invoice quantities.

use crate::models::RawNumber;

/// Coerce an optional raw quantity into an `f64`.
///
/// Absent values, blank or unparseable text, non-numeric JSON and non-finite
/// numbers all become `0.0`. Never fails.
pub fn normalize(value: Option<&RawNumber>) -> f64 {
    let parsed = match value {
        None | Some(RawNumber::Other(_)) => return 0.0,
        Some(RawNumber::Number(n)) => *n,
        Some(RawNumber::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return 0.0;
            }
            match text.parse::<f64>() {
                Ok(n) => n,
                Err(_) => return 0.0,
            }
        }
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
