//! File-name to metadata-ledger title matching.

use crate::matching::normalize::{keywords, normalize_title};
use crate::model::{MetadataEntry, MetadataLedger};
use std::collections::BTreeSet;

/// Minimum keyword similarity for a fuzzy title match
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

const CONTAINMENT_SCORE: f64 = 0.8;

/// |A ∩ B| / min(|A|, |B|) over stopword-filtered keywords; 0 when either is empty
pub fn keyword_similarity(a: &str, b: &str) -> f64 {
    overlap(&keywords(a), &keywords(b))
}

fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / a.len().min(b.len()) as f64
}

/// Ledger title a file was linked to
#[derive(Debug, Clone, PartialEq)]
pub struct FileMatch<'a> {
    pub title: &'a str,
    pub entry: &'a MetadataEntry,
    pub score: f64,
}

struct TitleForm<'a> {
    entry: &'a MetadataEntry,
    normalized: String,
    keywords: BTreeSet<String>,
}

/// File matcher bound to one metadata ledger snapshot.
///
/// Titles are normalized once up front; a traversal matches every file of
/// the tree against the same snapshot.
pub struct FileMatcher<'a> {
    titles: Vec<TitleForm<'a>>,
}

impl<'a> FileMatcher<'a> {
    pub fn new(ledger: &'a MetadataLedger) -> Self {
        let titles = ledger
            .entries()
            .iter()
            .map(|entry| TitleForm {
                entry,
                normalized: normalize_title(&entry.file_name),
                keywords: keywords(&entry.file_name),
            })
            .filter(|t| !t.normalized.is_empty())
            .collect();
        Self { titles }
    }

    /// Best ledger title for a file name.
    ///
    /// An exact normalized match returns immediately. Otherwise containment
    /// (either direction) scores 0.8 and keyword similarity scores its ratio
    /// when at least 0.5; a later title only replaces the running best with a
    /// strictly higher score.
    pub fn match_file(&self, file_name: &str) -> Option<FileMatch<'a>> {
        let normalized = normalize_title(file_name);
        if normalized.is_empty() {
            return None;
        }
        let file_keywords = keywords(file_name);

        let mut best: Option<FileMatch<'a>> = None;
        let mut best_score = 0.0;

        for title in &self.titles {
            if normalized == title.normalized {
                return Some(FileMatch {
                    title: &title.entry.file_name,
                    entry: title.entry,
                    score: 1.0,
                });
            }

            if (title.normalized.contains(&normalized) || normalized.contains(&title.normalized))
                && CONTAINMENT_SCORE > best_score
            {
                best_score = CONTAINMENT_SCORE;
                best = Some(FileMatch {
                    title: &title.entry.file_name,
                    entry: title.entry,
                    score: CONTAINMENT_SCORE,
                });
            }

            let similarity = overlap(&file_keywords, &title.keywords);
            if similarity >= SIMILARITY_THRESHOLD && similarity > best_score {
                best_score = similarity;
                best = Some(FileMatch {
                    title: &title.entry.file_name,
                    entry: title.entry,
                    score: similarity,
                });
            }
        }

        best
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
