//! Archive Sources
//!
//! Read-only access to the scanner output and the two ledgers. The engine
//! talks to its collaborators only through these traits; [`ArchiveSnapshot`]
//! is the in-memory implementation used by the CLI and the tests.

pub mod snapshot;

use crate::error::ApiError;
use crate::model::{normalize_extension, FileRecord, FolderNode, MetadataLedger, WorkStatusLedger};

pub use snapshot::{ArchiveSnapshot, SnapshotDocument};

/// Scanned folder hierarchy
pub trait FolderSource: Send + Sync {
    /// Top-level folders (depth 0)
    fn roots(&self) -> Result<Vec<FolderNode>, ApiError>;

    /// Direct children of the folder at `path`; empty for unknown paths
    fn children_of(&self, path: &str) -> Result<Vec<FolderNode>, ApiError>;

    fn by_exact_path(&self, path: &str) -> Result<Option<FolderNode>, ApiError>;
}

/// Scanned files
pub trait FileSource: Send + Sync {
    /// Files whose `folder_path` is exactly `folder_path`, ordered by name
    fn files_under(&self, folder_path: &str, filter: &FileFilter)
        -> Result<Vec<FileRecord>, ApiError>;

    fn file_by_path(&self, path: &str) -> Result<Option<FileRecord>, ApiError>;
}

/// Ledger snapshots, refreshed out-of-band by the sync jobs
pub trait LedgerSource: Send + Sync {
    fn work_status_snapshot(&self) -> Result<WorkStatusLedger, ApiError>;

    fn metadata_snapshot(&self) -> Result<MetadataLedger, ApiError>;
}

/// Which files of a folder take part in a traversal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFilter {
    extensions: Option<Vec<String>>,
    include_hidden: bool,
}

impl FileFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given extensions, in any of the forms `mp4`, `.MP4`.
    ///
    /// An empty list means no restriction.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .filter(|e| !e.as_ref().trim().trim_start_matches('.').is_empty())
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        self.extensions = if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        };
        self
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn extensions(&self) -> Option<&[String]> {
        self.extensions.as_deref()
    }

    pub fn accepts(&self, file: &FileRecord) -> bool {
        if !self.include_hidden && file.hidden() {
            return false;
        }
        match &self.extensions {
            None => true,
            Some(allowed) => file
                .normalized_extension()
                .map(|ext| allowed.contains(&ext))
                .unwrap_or(false),
        }
    }
}
