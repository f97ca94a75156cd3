//! Tree Aggregation
//!
//! Builds per-folder progress records depth-first. Each folder resolves its
//! own category, matches its direct files against the metadata ledger and
//! folds its children's metadata and codec counts into its own. Work
//! summaries are never summed across folders.

pub mod record;
pub mod summary;
pub mod tree;

pub use record::{
    ChildSummary, FileProgress, FolderInfo, FolderProgress, MatchedCategory, MatchingMethod,
    WorkSummary,
};
pub use summary::{CodecHistogram, CodecSummary, MetadataSummary, MetadataTally};
pub use tree::{Assessment, TraversalOptions, TreeAggregator};
