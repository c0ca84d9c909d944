//! Pure transformations over already-fetched invoice records.
//!
//! Nothing in this module performs I/O. Every function is a deterministic
//! function of its inputs and is meant to be re-run in full whenever the
//! record set, filter, or selected year changes.

pub mod aggregate;
pub mod compare;
pub mod normalize;
pub mod pivot;
pub mod series;
pub mod summary;

pub use aggregate::{aggregate, available_years};
pub use compare::{compare, ComparisonResult, Direction, PercentageChange};
pub use normalize::{normalize, round2};
pub use pivot::{group_by_unit, group_by_unit_with, month_key, MergePolicy, UnitFilter};
pub use series::{combined_series, energy_series, financial_series};
pub use summary::{build_dashboard, period_over_period, CardMetric, Dashboard, PeriodSummary};
