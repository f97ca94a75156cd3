//! Folder-name to work-status category matching.
//!
//! Rules are evaluated per candidate in fixed priority order; the first rule
//! that fires gives the candidate its score. The single best candidate across
//! the pool wins. Bare substring containment is never a rule: `WSOP` must not
//! match `WSOPE`.

use crate::matching::normalize::{fold_case, normalize_folder_name, word_set};
use crate::model::WorkStatusEntry;
use crate::types::CategoryId;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Which heuristic produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    Exact,
    ExactNormalized,
    CategoryPrefix,
    FolderPrefix,
    Subset,
    Word,
    Year,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::ExactNormalized => "exact-normalized",
            MatchRule::CategoryPrefix => "category-prefix",
            MatchRule::FolderPrefix => "folder-prefix",
            MatchRule::Subset => "subset",
            MatchRule::Word => "word",
            MatchRule::Year => "year",
        }
    }
}

/// Winning category for a folder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub category_id: CategoryId,
    pub score: f64,
    pub rule: MatchRule,
}

/// Precomputed forms of one name
struct NameForm {
    lower: String,
    normalized: String,
    words: BTreeSet<String>,
}

impl NameForm {
    fn new(raw: &str) -> Self {
        let normalized = normalize_folder_name(raw);
        let words = word_set(&normalized);
        Self {
            lower: fold_case(raw),
            normalized,
            words,
        }
    }
}

fn subset_score(word_count: usize) -> f64 {
    let raw = 0.88 + 0.01 * word_count as f64;
    (raw.min(0.94) * 100.0).round() / 100.0
}

fn evaluate(folder: &NameForm, category: &NameForm) -> Option<(MatchRule, f64)> {
    // Blank names have no words and can never match
    if folder.words.is_empty() || category.words.is_empty() {
        return None;
    }

    if folder.lower == category.lower {
        return Some((MatchRule::Exact, 1.0));
    }

    if folder.normalized == category.normalized {
        return Some((MatchRule::ExactNormalized, 0.98));
    }

    if category.lower.starts_with(&format!("{} ", folder.lower)) {
        // A single-word parent folder (WSOP) must not claim a series (WSOP LA)
        if folder.words.len() == 1 && category.words.len() >= 2 {
            return None;
        }
        return Some((MatchRule::CategoryPrefix, 0.90));
    }

    if folder.lower.starts_with(&format!("{} ", category.lower))
        || folder.lower.starts_with(&format!("{}_", category.lower))
    {
        return Some((MatchRule::FolderPrefix, 0.85));
    }

    if category.words.len() >= 2 && category.words.is_subset(&folder.words) {
        return Some((MatchRule::Subset, subset_score(category.words.len())));
    }

    if category.words.contains(&folder.lower) && folder.words.len() >= category.words.len() {
        return Some((MatchRule::Word, 0.80));
    }

    if folder.lower.len() == 4
        && folder.lower.chars().all(|c| c.is_ascii_digit())
        && category.words.contains(&folder.lower)
    {
        return Some((MatchRule::Year, 0.70));
    }

    None
}

/// Per-candidate rule outcome, in candidate order.
///
/// Used to explain why a folder did or did not match.
pub fn score_candidates<'a, I>(
    folder_name: &str,
    candidates: I,
) -> Vec<(&'a WorkStatusEntry, Option<(MatchRule, f64)>)>
where
    I: IntoIterator<Item = &'a WorkStatusEntry>,
{
    let folder = NameForm::new(folder_name);
    candidates
        .into_iter()
        .map(|entry| {
            let outcome = evaluate(&folder, &NameForm::new(&entry.category));
            (entry, outcome)
        })
        .collect()
}

/// Best category for a folder name, or `None`.
///
/// Ordering: score, then the candidate's done/total ratio (both descending);
/// on a full tie the earliest candidate in iteration order is kept.
pub fn match_category<'a, I>(folder_name: &str, candidates: I) -> Option<MatchCandidate>
where
    I: IntoIterator<Item = &'a WorkStatusEntry>,
{
    let mut best: Option<(MatchCandidate, f64)> = None;

    for (entry, outcome) in score_candidates(folder_name, candidates) {
        let Some((rule, score)) = outcome else {
            continue;
        };
        let ratio = entry.completion_ratio();
        let better = match &best {
            None => true,
            Some((current, current_ratio)) => {
                match score.total_cmp(&current.score) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => ratio > *current_ratio,
                }
            }
        };
        if better {
            best = Some((
                MatchCandidate {
                    category_id: entry.id,
                    score,
                    rule,
                },
                ratio,
            ));
        }
    }

    best.map(|(candidate, _)| candidate)
}
