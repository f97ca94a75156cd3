//! Archive Data Model
//!
//! Read-only views of the scanner output and the two spreadsheet-sourced
//! ledgers. The engine never mutates these; they are owned by the scanner
//! and sync collaborators and handed over as snapshots.

pub mod file;
pub mod folder;
pub mod ledger;

pub use file::{normalize_extension, FileRecord};
pub use folder::FolderNode;
pub use ledger::{MetadataEntry, MetadataLedger, MetadataRow, WorkStatusEntry, WorkStatusLedger};
