use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Month — The fixed 12-code month vocabulary used in period labels
// ---------------------------------------------------------------------------

/// Calendar month as it appears in invoice period labels (`JAN` .. `DEZ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    Jan,
    Fev,
    Mar,
    Abr,
    Mai,
    Jun,
    Jul,
    Ago,
    Set,
    Out,
    Nov,
    Dez,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Fev,
        Month::Mar,
        Month::Abr,
        Month::Mai,
        Month::Jun,
        Month::Jul,
        Month::Ago,
        Month::Set,
        Month::Out,
        Month::Nov,
        Month::Dez,
    ];

    /// Parse a 3-letter month code. Surrounding whitespace and case are ignored.
    pub fn from_code(code: &str) -> Option<Month> {
        let code = code.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(code))
    }

    /// Upper-case code used in period labels, e.g. `"FEV"`.
    pub fn code(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Fev => "FEV",
            Month::Mar => "MAR",
            Month::Abr => "ABR",
            Month::Mai => "MAI",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Ago => "AGO",
            Month::Set => "SET",
            Month::Out => "OUT",
            Month::Nov => "NOV",
            Month::Dez => "DEZ",
        }
    }

    /// Title-case abbreviation used as a column/series label, e.g. `"Fev"`.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Fev => "Fev",
            Month::Mar => "Mar",
            Month::Abr => "Abr",
            Month::Mai => "Mai",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Ago => "Ago",
            Month::Set => "Set",
            Month::Out => "Out",
            Month::Nov => "Nov",
            Month::Dez => "Dez",
        }
    }

    /// Calendar month number, `JAN = 1` .. `DEZ = 12`.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// PeriodKey
// ---------------------------------------------------------------------------

/// Year + month pair identifying one aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: String,
    pub month: Month,
}

// ---------------------------------------------------------------------------
// Period label parsing
// ---------------------------------------------------------------------------

/// The two halves of a `MONTH/YEAR` label, trimmed but not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelParts<'a> {
    pub month_code: &'a str,
    pub year: &'a str,
}

/// Split a period label on its first `/`.
///
/// Returns `None` if there is no separator.
pub fn split_label(label: &str) -> Option<LabelParts<'_>> {
    let (month_code, year) = label.split_once('/')?;
    Some(LabelParts {
        month_code: month_code.trim(),
        year: year.trim(),
    })
}

/// Parse a label such as `"JAN/2024"` into a [`PeriodKey`].
///
/// Returns `None` when the separator is missing, the year is empty, or the
/// month code is not one of the twelve recognized codes.
pub fn parse_period_label(label: &str) -> Option<PeriodKey> {
    let parts = split_label(label)?;
    if parts.year.is_empty() {
        return None;
    }
    let month = Month::from_code(parts.month_code)?;
    Some(PeriodKey {
        year: parts.year.to_string(),
        month,
    })
}
