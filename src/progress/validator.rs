//! Consistency check and progress figures for a folder/category match.

use crate::progress::snapped_percent;
use serde::Serialize;

/// Outcome of checking a category's ledger counts against a folder scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub valid: bool,
    /// done vs. scanned file count
    pub combined_progress: f64,
    /// done vs. ledger total
    pub actual_progress: f64,
    pub is_complete: bool,
    pub data_source_mismatch: bool,
    /// ledger total minus scanned file count; positive when the ledger has more
    pub mismatch_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Validate a match and compute its two progress percentages.
///
/// A ledger that claims more finished items than the folder holds cannot
/// describe this folder: the result is invalid and the caller drops the
/// match rather than clamping it.
pub fn validate(nas_file_count: u64, ledger_total: u64, ledger_done: u64) -> Validation {
    let valid = ledger_done <= nas_file_count;
    let reason = (!valid).then(|| {
        format!(
            "ledger done count {} exceeds scanned file count {}",
            ledger_done, nas_file_count
        )
    });

    let gap = nas_file_count.abs_diff(ledger_total) as f64;
    let scale = nas_file_count.max(ledger_total).max(1) as f64;

    Validation {
        valid,
        combined_progress: snapped_percent(ledger_done, nas_file_count),
        actual_progress: snapped_percent(ledger_done, ledger_total),
        is_complete: ledger_done == ledger_total && ledger_total == nas_file_count,
        data_source_mismatch: gap > 0.1 * scale,
        mismatch_count: ledger_total as i64 - nas_file_count as i64,
        reason,
    }
}
