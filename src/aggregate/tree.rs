//! Depth-first progress tree construction.

use crate::aggregate::record::{
    FileProgress, FolderInfo, FolderProgress, MatchedCategory, MatchingMethod, WorkSummary,
};
use crate::aggregate::summary::{CodecHistogram, MetadataTally};
use crate::cancel::Interrupt;
use crate::cascade::{resolve, ClaimSet, ResolvedBy};
use crate::error::ApiError;
use crate::matching::FileMatcher;
use crate::model::{FileRecord, FolderNode, MetadataLedger, WorkStatusLedger};
use crate::progress::validate;
use crate::source::{FileFilter, FileSource, FolderSource};
use crate::types::CategoryId;
use tracing::{debug, warn};

/// Per-traversal switches and bounds
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    pub include_files: bool,
    pub include_codecs: bool,
    pub filter: FileFilter,
    pub max_children_per_folder: usize,
    /// Only bounds the emitted file list; aggregation always sees every file
    pub max_files_listed: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            include_files: false,
            include_codecs: false,
            filter: FileFilter::new(),
            max_children_per_folder: 1000,
            max_files_listed: 200,
        }
    }
}

/// A folder's own category outcome, before any recursion
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub method: MatchingMethod,
    pub category: Option<MatchedCategory>,
    pub work_summary: Option<WorkSummary>,
    /// Category id this folder takes out of the pool, invalid matches included
    pub claim: Option<CategoryId>,
}

/// Direct files of one folder, matched and tallied
pub(crate) struct DirectFiles {
    pub listed: Vec<FileProgress>,
    pub omitted: usize,
    pub tally: MetadataTally,
    pub codecs: CodecHistogram,
}

struct Built {
    record: FolderProgress,
    claims: ClaimSet,
    tally: MetadataTally,
    codecs: CodecHistogram,
}

/// Progress tree builder over one pair of ledger snapshots
pub struct TreeAggregator<'a> {
    folders: &'a dyn FolderSource,
    files: &'a dyn FileSource,
    work_status: &'a WorkStatusLedger,
    matcher: FileMatcher<'a>,
    options: TraversalOptions,
    interrupt: Interrupt,
}

impl<'a> TreeAggregator<'a> {
    pub fn new(
        folders: &'a dyn FolderSource,
        files: &'a dyn FileSource,
        work_status: &'a WorkStatusLedger,
        metadata: &'a MetadataLedger,
        options: TraversalOptions,
    ) -> Self {
        Self {
            folders,
            files,
            work_status,
            matcher: FileMatcher::new(metadata),
            options,
            interrupt: Interrupt::none(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Resolve and validate a folder's own category.
    ///
    /// A match that fails validation loses its work summary but keeps its
    /// claim, so no other folder can pick the same category up.
    pub fn assess(&self, folder: &FolderNode, excluded: &ClaimSet) -> Assessment {
        let Some(resolution) = resolve(folder, self.work_status, excluded) else {
            return Assessment {
                method: MatchingMethod::None,
                category: None,
                work_summary: None,
                claim: None,
            };
        };

        let entry = resolution.entry;
        let category = MatchedCategory::from(&resolution);
        let validation = validate(folder.file_count, entry.total_count, entry.done_count);

        if !validation.valid {
            warn!(
                folder = %folder.path,
                category = %entry.category,
                category_id = entry.id,
                reason = validation.reason.as_deref().unwrap_or_default(),
                "Discarding category match that contradicts the scan"
            );
            return Assessment {
                method: MatchingMethod::Invalidated,
                category: Some(category),
                work_summary: None,
                claim: Some(entry.id),
            };
        }

        let method = match resolution.by {
            ResolvedBy::Override => MatchingMethod::Override,
            ResolvedBy::Fuzzy(_) => MatchingMethod::Fuzzy,
        };
        debug!(
            folder = %folder.path,
            category = %entry.category,
            method = method.as_str(),
            "Folder matched"
        );
        Assessment {
            method,
            category: Some(category),
            work_summary: Some(WorkSummary::new(
                folder.file_count,
                entry.total_count,
                entry.done_count,
                &validation,
            )),
            claim: Some(entry.id),
        }
    }

    /// Build the record for `folder` and its subtree.
    ///
    /// Returns the record together with every category id claimed by the
    /// folder or anything below it; the caller folds those into the pool it
    /// hands the next sibling.
    pub fn build(
        &self,
        folder: &FolderNode,
        depth_budget: u32,
        current_depth: u32,
        excluded: &ClaimSet,
    ) -> Result<(FolderProgress, ClaimSet), ApiError> {
        let built = self.build_folder(folder, depth_budget, current_depth, excluded)?;
        Ok((built.record, built.claims))
    }

    /// Build sibling folders in order, each seeing the claims of the ones before
    pub fn build_siblings(
        &self,
        siblings: &[FolderNode],
        depth_budget: u32,
        current_depth: u32,
        excluded: &ClaimSet,
    ) -> Result<(Vec<FolderProgress>, ClaimSet), ApiError> {
        let mut pool = excluded.clone();
        let mut claimed = ClaimSet::new();
        let mut records = Vec::with_capacity(siblings.len());
        for sibling in siblings {
            let built = self.build_folder(sibling, depth_budget, current_depth, &pool)?;
            pool = pool.union(&built.claims);
            claimed = claimed.union(&built.claims);
            records.push(built.record);
        }
        Ok((records, claimed))
    }

    /// Children of `path` in traversal order, cut at the per-folder bound.
    ///
    /// Returns the kept children and how many were dropped.
    pub fn ordered_children(&self, path: &str) -> Result<(Vec<FolderNode>, usize), ApiError> {
        let mut children = self.folders.children_of(path)?;
        sort_siblings(&mut children);
        let limit = self.options.max_children_per_folder;
        let omitted = children.len().saturating_sub(limit);
        if omitted > 0 {
            warn!(
                folder = %path,
                kept = limit,
                omitted,
                "Folder exceeds the child limit, omitting the rest"
            );
            children.truncate(limit);
        }
        Ok((children, omitted))
    }

    /// Match and tally every direct file of a folder
    pub(crate) fn direct_files(&self, folder_path: &str) -> Result<DirectFiles, ApiError> {
        let files = self.files.files_under(folder_path, &self.options.filter)?;
        let mut out = DirectFiles {
            listed: Vec::new(),
            omitted: 0,
            tally: MetadataTally::default(),
            codecs: CodecHistogram::default(),
        };
        for file in &files {
            let progress = self.file_progress(file);
            out.tally.add_file(&progress);
            if self.options.include_codecs {
                out.codecs.add_file(file);
            }
            if self.options.include_files {
                if out.listed.len() < self.options.max_files_listed {
                    out.listed.push(progress);
                } else {
                    out.omitted += 1;
                }
            }
        }
        if out.omitted > 0 {
            debug!(
                folder = %folder_path,
                listed = out.listed.len(),
                omitted = out.omitted,
                "File listing truncated"
            );
        }
        Ok(out)
    }

    pub fn file_progress(&self, file: &FileRecord) -> FileProgress {
        let matched = self.matcher.match_file(&file.name);
        FileProgress::new(file, matched.as_ref())
    }

    fn build_folder(
        &self,
        folder: &FolderNode,
        depth_budget: u32,
        current_depth: u32,
        excluded: &ClaimSet,
    ) -> Result<Built, ApiError> {
        self.interrupt.check(&folder.path)?;

        let assessment = self.assess(folder, excluded);
        let direct = self.direct_files(&folder.path)?;
        let mut tally = direct.tally;
        let mut codecs = direct.codecs;
        let mut claims = ClaimSet::new().with_opt(assessment.claim);

        let mut children = Vec::new();
        let mut children_omitted = 0;
        if current_depth < depth_budget {
            let (kids, omitted) = self.ordered_children(&folder.path)?;
            children_omitted = omitted;
            let mut pool = excluded.with_opt(assessment.claim);
            for kid in &kids {
                let built = self.build_folder(kid, depth_budget, current_depth + 1, &pool)?;
                pool = pool.union(&built.claims);
                claims = claims.union(&built.claims);
                tally.merge(&built.tally);
                codecs.merge(&built.codecs);
                children.push(built.record);
            }
        }

        let record = FolderProgress {
            folder: FolderInfo::from(folder),
            matching_method: assessment.method,
            category: assessment.category,
            work_summary: assessment.work_summary,
            metadata_summary: tally.summarize(folder.file_count),
            codec_summary: if self.options.include_codecs {
                codecs.summarize(folder.file_count)
            } else {
                None
            },
            files: self.options.include_files.then_some(direct.listed),
            files_omitted: direct.omitted,
            children_omitted,
            children,
        };

        Ok(Built {
            record,
            claims,
            tally,
            codecs,
        })
    }
}

/// Traversal order: largest folders first, then by path
pub fn sort_siblings(folders: &mut [FolderNode]) {
    folders.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then_with(|| a.path.cmp(&b.path))
    });
}
