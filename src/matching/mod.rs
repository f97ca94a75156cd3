//! Text Matching
//!
//! Heuristics that link free-text names across the three archive views:
//! folder names to work-status categories, and file names to metadata
//! ledger titles. Both matchers are pure and return at most one winner.

pub mod file;
pub mod name;
pub mod normalize;

pub use file::{keyword_similarity, FileMatch, FileMatcher, SIMILARITY_THRESHOLD};
pub use name::{match_category, score_candidates, MatchCandidate, MatchRule};
