//! Archive Progress: media archive progress reporting
//!
//! Reconciles a scanned media archive (folders and video files) with two
//! externally maintained ledgers: a work-status ledger of per-category
//! counts and a metadata ledger of per-video analysis rows. Folders are
//! matched to categories by name heuristics, with each category claimed by
//! at most one folder per hierarchy; files are matched to ledger titles;
//! the result is a progress tree with validated, reconciled percentages.

pub mod aggregate;
pub mod cancel;
pub mod cascade;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod matching;
pub mod model;
pub mod progress;
pub mod service;
pub mod source;
pub mod tooling;
pub mod totals;
pub mod types;

pub use aggregate::{FolderProgress, MatchingMethod, TraversalOptions, TreeAggregator};
pub use cancel::{CancellationToken, Interrupt};
pub use cascade::ClaimSet;
pub use config::{ConfigLoader, ProgressConfig};
pub use error::ApiError;
pub use matching::{match_category, FileMatcher, MatchCandidate, MatchRule};
pub use model::{
    FileRecord, FolderNode, MetadataEntry, MetadataLedger, MetadataRow, WorkStatusEntry,
    WorkStatusLedger,
};
pub use progress::{validate, Validation};
pub use service::{
    FileDetail, FolderDetail, MatchExplanation, ProgressService, TreeReport, TreeRequest,
};
pub use source::{ArchiveSnapshot, FileFilter, FileSource, FolderSource, LedgerSource};
pub use totals::ArchiveTotals;
