//! Core identifier types shared across the progress engine.

/// CategoryId: primary key of a work-status ledger row
pub type CategoryId = i64;

/// FolderId: primary key of a scanned folder
pub type FolderId = i64;

/// FileId: primary key of a scanned file
pub type FileId = i64;
