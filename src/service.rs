//! Progress Service
//!
//! Entry points over a set of archive sources: the progress tree, a
//! single-folder detail, a single-file detail, and the cached archive
//! totals. Ledger snapshots are loaded once per call and passed down
//! immutably.

use crate::aggregate::{
    ChildSummary, FileProgress, FolderInfo, FolderProgress, TraversalOptions, TreeAggregator,
};
use crate::cancel::Interrupt;
use crate::cascade::{ancestor_claims, ClaimSet};
use crate::config::{ProgressConfig, TraversalConfig};
use crate::error::ApiError;
use crate::matching::normalize::normalize_folder_name;
use crate::matching::{match_category, score_candidates, FileMatcher, MatchRule};
use crate::model::MetadataRow;
use crate::source::{ArchiveSnapshot, FileFilter, FileSource, FolderSource, LedgerSource};
use crate::totals::{ArchiveTotals, TotalsCache};
use crate::types::CategoryId;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Parameters of a tree build
#[derive(Debug, Clone, Default)]
pub struct TreeRequest {
    /// `None` starts at the top-level folders; `Some(p)` at p's children
    pub path: Option<String>,
    /// Defaults to `traversal.default_depth`, clamped to `traversal.max_depth`
    pub depth: Option<u32>,
    pub include_files: bool,
    pub include_codecs: bool,
    /// Extension filter, any of `mp4`, `.MP4`; empty means all
    pub extensions: Vec<String>,
    pub include_hidden: bool,
    pub interrupt: Interrupt,
}

impl TreeRequest {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// A built tree plus the archive-wide totals it should be read against
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub tree: Vec<FolderProgress>,
    pub root_stats: ArchiveTotals,
    /// Depth the tree was actually built to
    pub depth: u32,
}

/// One folder with its own summaries and its immediate children's matches
#[derive(Debug, Clone, Serialize)]
pub struct FolderDetail {
    pub folder: FolderProgress,
    pub children: Vec<ChildSummary>,
    #[serde(skip_serializing_if = "is_zero")]
    pub children_omitted: usize,
}

/// One file with the analysis rows of its matched ledger title
#[derive(Debug, Clone, Serialize)]
pub struct FileDetail {
    pub file: FileProgress,
    /// Rows ordered by `timecode_out_sec`; empty when unmatched
    pub rows: Vec<MetadataRow>,
}

/// A category that a folder name would match under some rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub category_id: CategoryId,
    pub category: String,
    pub rule: MatchRule,
    pub score: f64,
    pub completion_ratio: f64,
}

/// Why a folder name does or does not match, against the full ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchExplanation {
    pub folder_name: String,
    pub normalized: String,
    pub winner: Option<CandidateScore>,
    /// Every candidate any rule fired for, in ledger order
    pub candidates: Vec<CandidateScore>,
}

/// Progress engine over a set of archive sources
pub struct ProgressService {
    folders: Arc<dyn FolderSource>,
    files: Arc<dyn FileSource>,
    ledgers: Arc<dyn LedgerSource>,
    traversal: TraversalConfig,
    totals: TotalsCache,
}

impl ProgressService {
    pub fn new(
        folders: Arc<dyn FolderSource>,
        files: Arc<dyn FileSource>,
        ledgers: Arc<dyn LedgerSource>,
        config: &ProgressConfig,
    ) -> Self {
        Self {
            folders,
            files,
            ledgers,
            traversal: config.traversal.clone(),
            totals: TotalsCache::new(Duration::from_secs(config.cache.totals_ttl_secs)),
        }
    }

    /// Serve every source from one in-memory snapshot
    pub fn from_snapshot(snapshot: ArchiveSnapshot, config: &ProgressConfig) -> Self {
        let snapshot = Arc::new(snapshot);
        Self::new(snapshot.clone(), snapshot.clone(), snapshot, config)
    }

    /// Build the progress tree described by `request`.
    ///
    /// Below a path, the pool starts without every category claimed on the
    /// way down to and including that path. Only ancestors are consulted:
    /// a category claimed in an earlier sibling or cousin subtree is still
    /// available here, so a lazily loaded subtree can credit a category that
    /// a full build would have given away. An unknown path yields an empty
    /// tree.
    pub fn build_tree(&self, request: &TreeRequest) -> Result<TreeReport, ApiError> {
        let depth = self.traversal.effective_depth(request.depth);
        let work_status = self.ledgers.work_status_snapshot()?;
        let metadata = self.ledgers.metadata_snapshot()?;
        info!(
            categories = work_status.len(),
            titles = metadata.len(),
            path = request.path.as_deref().unwrap_or("/"),
            depth,
            "Building progress tree"
        );

        let options = TraversalOptions {
            include_files: request.include_files,
            include_codecs: request.include_codecs,
            filter: FileFilter::new()
                .with_extensions(&request.extensions)
                .with_hidden(request.include_hidden),
            max_children_per_folder: self.traversal.max_children_per_folder,
            max_files_listed: self.traversal.max_files_listed,
        };
        let aggregator = TreeAggregator::new(
            self.folders.as_ref(),
            self.files.as_ref(),
            &work_status,
            &metadata,
            options,
        )
        .with_interrupt(request.interrupt.clone());

        let (starts, excluded) = match &request.path {
            None => {
                let mut roots = self.folders.roots()?;
                crate::aggregate::tree::sort_siblings(&mut roots);
                (roots, ClaimSet::new())
            }
            Some(path) => {
                let excluded = ancestor_claims(self.folders.as_ref(), &work_status, path, true)?;
                if !excluded.is_empty() {
                    debug!(path = %path, claimed = excluded.len(), "Ancestor claims excluded");
                }
                let (children, _) = aggregator.ordered_children(path)?;
                (children, excluded)
            }
        };

        let (tree, claimed) = aggregator.build_siblings(&starts, depth, 0, &excluded)?;
        debug!(claimed = claimed.len(), "Progress tree built");

        Ok(TreeReport {
            tree,
            root_stats: self.archive_totals()?,
            depth,
        })
    }

    /// Detail for one folder: its own match and direct-file summaries, plus
    /// each immediate child's match. `Ok(None)` when the path is unknown.
    ///
    /// Exclusions come from the ancestor walk and from earlier children
    /// only; claims made deeper inside an earlier child are not seen.
    pub fn folder_detail(
        &self,
        path: &str,
        include_files: bool,
    ) -> Result<Option<FolderDetail>, ApiError> {
        let Some(target) = self.folders.by_exact_path(path)? else {
            return Ok(None);
        };
        let work_status = self.ledgers.work_status_snapshot()?;
        let metadata = self.ledgers.metadata_snapshot()?;

        let options = TraversalOptions {
            include_files,
            include_codecs: true,
            filter: FileFilter::new(),
            max_children_per_folder: self.traversal.max_children_per_folder,
            max_files_listed: self.traversal.max_files_listed,
        };
        let aggregator = TreeAggregator::new(
            self.folders.as_ref(),
            self.files.as_ref(),
            &work_status,
            &metadata,
            options,
        );

        let excluded = ancestor_claims(self.folders.as_ref(), &work_status, path, false)?;
        let (folder, own_claims) = aggregator.build(&target, 0, 0, &excluded)?;

        let mut pool = excluded.union(&own_claims);
        let (kids, children_omitted) = aggregator.ordered_children(path)?;
        let mut children = Vec::with_capacity(kids.len());
        for kid in &kids {
            let assessment = aggregator.assess(kid, &pool);
            pool = pool.with_opt(assessment.claim);
            children.push(ChildSummary {
                folder: FolderInfo::from(kid),
                matching_method: assessment.method,
                category: assessment.category,
                work_summary: assessment.work_summary,
            });
        }

        Ok(Some(FolderDetail {
            folder,
            children,
            children_omitted,
        }))
    }

    /// Detail for one file. `Ok(None)` when the path is unknown.
    pub fn file_detail(&self, path: &str) -> Result<Option<FileDetail>, ApiError> {
        let Some(file) = self.files.file_by_path(path)? else {
            return Ok(None);
        };
        let metadata = self.ledgers.metadata_snapshot()?;
        let matcher = FileMatcher::new(&metadata);
        let matched = matcher.match_file(&file.name);
        let rows = matched
            .as_ref()
            .map(|m| metadata.rows_for(m.title).to_vec())
            .unwrap_or_default();
        Ok(Some(FileDetail {
            file: FileProgress::new(&file, matched.as_ref()),
            rows,
        }))
    }

    /// Explain how a folder name scores against every category
    pub fn explain_match(&self, folder_name: &str) -> Result<MatchExplanation, ApiError> {
        let work_status = self.ledgers.work_status_snapshot()?;
        let candidates: Vec<CandidateScore> =
            score_candidates(folder_name, work_status.entries())
                .into_iter()
                .filter_map(|(entry, outcome)| {
                    outcome.map(|(rule, score)| CandidateScore {
                        category_id: entry.id,
                        category: entry.category.clone(),
                        rule,
                        score,
                        completion_ratio: entry.completion_ratio(),
                    })
                })
                .collect();
        let winner = match_category(folder_name, work_status.entries()).and_then(|best| {
            candidates
                .iter()
                .find(|c| c.category_id == best.category_id)
                .cloned()
        });
        Ok(MatchExplanation {
            folder_name: folder_name.to_string(),
            normalized: normalize_folder_name(folder_name),
            winner,
            candidates,
        })
    }

    /// Archive-wide totals, served from cache while fresh
    pub fn archive_totals(&self) -> Result<ArchiveTotals, ApiError> {
        self.totals.get_or_compute(|| {
            let work_status = self.ledgers.work_status_snapshot()?;
            ArchiveTotals::compute(self.folders.as_ref(), &work_status)
        })
    }

    /// Drop cached totals; call after the scanner finishes
    pub fn invalidate_totals(&self) {
        self.totals.invalidate();
    }
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}
