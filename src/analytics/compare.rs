//! Period-over-period comparison with safe division.

use serde::Serialize;
use std::fmt;

use super::normalize::round2;

pub const NO_CHANGE_TEXT: &str = "no change";
pub const UNDEFINED_TEXT: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
    Unchanged,
}

/// Relative change of `current` against `previous`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PercentageChange {
    /// `current == previous`.
    NoChange,
    /// Signed percentage, rounded to 2 decimals.
    Defined(f64),
    /// The previous value was zero, or the ratio is not a finite number.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub percentage: PercentageChange,
    pub direction: Direction,
}

impl ComparisonResult {
    /// Display text: `"+12.50%"`, `"-3.00%"`, `"no change"` or `"n/a"`.
    pub fn text(&self) -> String {
        match self.percentage {
            PercentageChange::NoChange => NO_CHANGE_TEXT.to_string(),
            PercentageChange::Undefined => UNDEFINED_TEXT.to_string(),
            PercentageChange::Defined(pct) => {
                if self.direction == Direction::Increase {
                    format!("+{:.2}%", pct)
                } else {
                    format!("{:.2}%", pct)
                }
            }
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.direction == Direction::Unchanged
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Compare `current` against `previous`.
///
/// Equal values are [`Direction::Unchanged`]. Otherwise the direction follows
/// the sign of `current - previous`, and the percentage is relative to
/// `|previous|`. A zero `previous`, a non-finite input, or a ratio that
/// overflows yields [`PercentageChange::Undefined`] instead of an infinite one.
pub fn compare(current: f64, previous: f64) -> ComparisonResult {
    if current == previous {
        return ComparisonResult {
            percentage: PercentageChange::NoChange,
            direction: Direction::Unchanged,
        };
    }

    let difference = current - previous;
    let direction = if difference > 0.0 {
        Direction::Increase
    } else {
        Direction::Decrease
    };

    if previous == 0.0 || !current.is_finite() || !previous.is_finite() {
        return ComparisonResult {
            percentage: PercentageChange::Undefined,
            direction,
        };
    }

    let percentage = round2(difference / previous.abs() * 100.0);
    if !percentage.is_finite() {
        return ComparisonResult {
            percentage: PercentageChange::Undefined,
            direction,
        };
    }

    ComparisonResult {
        percentage: PercentageChange::Defined(percentage),
        direction,
    }
}
