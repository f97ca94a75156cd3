//! Progress Computation
//!
//! Judges a category match against the scan and turns raw counts into the
//! percentages shown in the tree. Everything here is a pure function.

pub mod coverage;
pub mod validator;

pub use coverage::{file_coverage, FileCoverage};
pub use validator::{validate, Validation};

/// Percentages at or above this value are reported as 100
pub const COMPLETION_SNAP_PERCENT: f64 = 90.0;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator` as a percentage in [0, 100], snapped to 100 at
/// or above [`COMPLETION_SNAP_PERCENT`] and rounded to one decimal
pub fn snapped_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = numerator as f64 / denominator as f64 * 100.0;
    if raw >= COMPLETION_SNAP_PERCENT {
        return 100.0;
    }
    round1(raw.min(100.0))
}
