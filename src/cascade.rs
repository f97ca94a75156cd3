//! Cascading-match prevention.
//!
//! A category may be credited to at most one folder per traversal. Claims
//! are immutable values threaded through the recursion: each call receives
//! the ids already taken by ancestors and earlier siblings/cousins and
//! returns the ids taken within its own subtree.

use crate::error::ApiError;
use crate::matching::{match_category, MatchCandidate};
use crate::model::{FolderNode, WorkStatusEntry, WorkStatusLedger};
use crate::source::FolderSource;
use crate::types::CategoryId;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Set of category ids already credited to some folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClaimSet {
    ids: BTreeSet<CategoryId>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new set that also holds `id`
    #[must_use]
    pub fn with(&self, id: CategoryId) -> Self {
        let mut ids = self.ids.clone();
        ids.insert(id);
        Self { ids }
    }

    /// Shorthand for `with` on an optional claim
    #[must_use]
    pub fn with_opt(&self, id: Option<CategoryId>) -> Self {
        match id {
            Some(id) => self.with(id),
            None => self.clone(),
        }
    }

    #[must_use]
    pub fn union(&self, other: &ClaimSet) -> Self {
        Self {
            ids: self.ids.union(&other.ids).copied().collect(),
        }
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<CategoryId> for ClaimSet {
    fn from_iter<T: IntoIterator<Item = CategoryId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// How a folder got its category
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBy {
    /// Explicit `category_override` on the folder
    Override,
    Fuzzy(MatchCandidate),
}

/// A folder's category before validation
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub entry: &'a WorkStatusEntry,
    pub by: ResolvedBy,
}

/// Categories not yet claimed, in snapshot order
pub fn available<'a>(
    ledger: &'a WorkStatusLedger,
    excluded: &'a ClaimSet,
) -> impl Iterator<Item = &'a WorkStatusEntry> + 'a {
    ledger
        .entries()
        .iter()
        .filter(move |entry| !excluded.contains(entry.id))
}

/// Resolve a folder's category against the unclaimed pool.
///
/// An override that names a category in the snapshot wins even if that
/// category is already claimed. An override naming an unknown id falls back
/// to fuzzy matching.
pub fn resolve<'a>(
    folder: &FolderNode,
    ledger: &'a WorkStatusLedger,
    excluded: &ClaimSet,
) -> Option<Resolution<'a>> {
    if let Some(id) = folder.category_override {
        match ledger.get(id) {
            Some(entry) => {
                return Some(Resolution {
                    entry,
                    by: ResolvedBy::Override,
                })
            }
            None => debug!(
                folder = %folder.path,
                category_id = id,
                "Override names an unknown category, falling back to fuzzy matching"
            ),
        }
    }

    let candidate = match_category(&folder.name, available(ledger, excluded))?;
    let entry = ledger.get(candidate.category_id)?;
    Some(Resolution {
        entry,
        by: ResolvedBy::Fuzzy(candidate),
    })
}

/// Claims made on the way from the archive root down to `path`.
///
/// Every existing folder on the path prefix chain resolves a category
/// against the pool left by the folders above it. The folder at `path`
/// itself is included when `include_target` is set.
pub fn ancestor_claims(
    folders: &dyn FolderSource,
    ledger: &WorkStatusLedger,
    path: &str,
    include_target: bool,
) -> Result<ClaimSet, ApiError> {
    let mut prefixes = FolderNode::path_prefixes(path);
    if !include_target {
        prefixes.pop();
    }

    let mut claims = ClaimSet::new();
    for prefix in prefixes {
        let Some(folder) = folders.by_exact_path(&prefix)? else {
            continue;
        };
        if let Some(resolution) = resolve(&folder, ledger, &claims) {
            debug!(
                folder = %folder.path,
                category_id = resolution.entry.id,
                "Ancestor claims category"
            );
            claims = claims.with(resolution.entry.id);
        }
    }
    Ok(claims)
}
