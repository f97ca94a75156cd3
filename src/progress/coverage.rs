//! Per-file analysis coverage from the metadata ledger.

use crate::model::MetadataEntry;
use crate::progress::COMPLETION_SNAP_PERCENT;

/// How much of one video the metadata ledger has analysed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileCoverage {
    /// Furthest analysed timecode over the file duration, capped at 100
    pub progress_percent: f64,
    pub is_complete: bool,
}

/// Coverage of a file given its matched ledger entry.
///
/// Unmatched files and files without a duration have zero coverage.
pub fn file_coverage(entry: Option<&MetadataEntry>, duration_secs: f64) -> FileCoverage {
    match entry {
        Some(entry) if duration_secs > 0.0 => {
            let raw = entry.max_timecode_sec / duration_secs * 100.0;
            FileCoverage {
                progress_percent: raw.min(100.0),
                is_complete: raw >= COMPLETION_SNAP_PERCENT,
            }
        }
        _ => FileCoverage {
            progress_percent: 0.0,
            is_complete: false,
        },
    }
}
