//! Serializable progress records.

use crate::cascade::{Resolution, ResolvedBy};
use crate::format::{format_duration, format_size, format_timecode};
use crate::matching::{FileMatch, MatchRule};
use crate::model::{FileRecord, FolderNode, MetadataEntry};
use crate::progress::{file_coverage, Validation};
use crate::types::{CategoryId, FileId, FolderId};
use serde::Serialize;

use super::summary::{CodecSummary, MetadataSummary};

/// How a folder's category was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingMethod {
    Override,
    Fuzzy,
    /// A category was found but contradicted the scan
    Invalidated,
    None,
}

impl MatchingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingMethod::Override => "override",
            MatchingMethod::Fuzzy => "fuzzy",
            MatchingMethod::Invalidated => "invalidated",
            MatchingMethod::None => "none",
        }
    }
}

/// Scanner facts about a folder, shared by tree and detail records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderInfo {
    pub id: FolderId,
    pub name: String,
    pub path: String,
    pub depth: u32,
    pub file_count: u64,
    pub folder_count: u64,
    pub size: u64,
    pub size_formatted: String,
    pub duration: f64,
    pub duration_formatted: String,
}

impl From<&FolderNode> for FolderInfo {
    fn from(folder: &FolderNode) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
            path: folder.path.clone(),
            depth: folder.depth,
            file_count: folder.file_count,
            folder_count: folder.folder_count,
            size: folder.total_size,
            size_formatted: format_size(folder.total_size),
            duration: folder.total_duration,
            duration_formatted: format_duration(folder.total_duration),
        }
    }
}

/// The ledger category a folder resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedCategory {
    pub id: CategoryId,
    pub category: String,
    pub total_count: u64,
    pub done_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Fuzzy matches only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
}

impl From<&Resolution<'_>> for MatchedCategory {
    fn from(resolution: &Resolution<'_>) -> Self {
        let entry = resolution.entry;
        let (score, rule) = match &resolution.by {
            ResolvedBy::Override => (None, None),
            ResolvedBy::Fuzzy(candidate) => (Some(candidate.score), Some(candidate.rule)),
        };
        Self {
            id: entry.id,
            category: entry.category.clone(),
            total_count: entry.total_count,
            done_count: entry.done_count,
            pic: entry.pic.clone(),
            status: entry.status.clone(),
            score,
            rule,
        }
    }
}

/// A folder's own validated category match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSummary {
    /// Matched categories; a folder holds at most one
    pub task_count: u32,
    /// Scanned file count, subtree included
    pub total_files: u64,
    pub total_done: u64,
    pub ledger_total: u64,
    pub combined_progress: f64,
    pub actual_progress: f64,
    pub is_complete: bool,
    pub data_source_mismatch: bool,
    pub mismatch_count: i64,
}

impl WorkSummary {
    pub fn new(total_files: u64, ledger_total: u64, ledger_done: u64, v: &Validation) -> Self {
        Self {
            task_count: 1,
            total_files,
            total_done: ledger_done,
            ledger_total,
            combined_progress: v.combined_progress,
            actual_progress: v.actual_progress,
            is_complete: v.is_complete,
            data_source_mismatch: v.data_source_mismatch,
            mismatch_count: v.mismatch_count,
        }
    }
}

/// One scanned file with its metadata-ledger coverage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileProgress {
    pub id: FileId,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub size_formatted: String,
    pub duration: f64,
    pub duration_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    pub matched_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    pub hand_count: u64,
    pub max_timecode_sec: f64,
    pub max_timecode_formatted: String,
    pub progress_percent: f64,
    pub is_complete: bool,
}

impl FileProgress {
    pub fn new(file: &FileRecord, matched: Option<&FileMatch<'_>>) -> Self {
        let duration = file.duration_secs();
        let entry = matched.map(|m| m.entry);
        let coverage = file_coverage(entry, duration);
        let max_timecode_sec = entry.map(|e| e.max_timecode_sec).unwrap_or(0.0);
        Self {
            id: file.id,
            name: file.name.clone(),
            path: file.path.clone(),
            size: file.size,
            size_formatted: format_size(file.size),
            duration,
            duration_formatted: format_duration(duration),
            extension: file.normalized_extension(),
            video_codec: file.video_codec.clone(),
            audio_codec: file.audio_codec.clone(),
            matched_title: matched.map(|m| m.title.to_string()),
            match_score: matched.map(|m| m.score),
            hand_count: entry.map(|e| e.hand_count).unwrap_or(0),
            max_timecode_sec,
            max_timecode_formatted: entry
                .map(MetadataEntry::max_timecode_formatted)
                .unwrap_or_else(|| format_timecode(0.0)),
            progress_percent: coverage.progress_percent,
            is_complete: coverage.is_complete,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_title.is_some()
    }
}

/// Progress record for one folder of a tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderProgress {
    #[serde(flatten)]
    pub folder: FolderInfo,
    pub matching_method: MatchingMethod,
    pub category: Option<MatchedCategory>,
    pub work_summary: Option<WorkSummary>,
    pub metadata_summary: MetadataSummary,
    pub codec_summary: Option<CodecSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileProgress>>,
    /// Direct files left out of `files` by the listing limit
    #[serde(skip_serializing_if = "is_zero")]
    pub files_omitted: usize,
    /// Children left out by the per-folder child limit
    #[serde(skip_serializing_if = "is_zero")]
    pub children_omitted: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FolderProgress>,
}

impl FolderProgress {
    /// This record and every descendant, depth-first
    pub fn walk(&self) -> Vec<&FolderProgress> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// An immediate child in a folder detail: its own match, no recursion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildSummary {
    #[serde(flatten)]
    pub folder: FolderInfo,
    pub matching_method: MatchingMethod,
    pub category: Option<MatchedCategory>,
    pub work_summary: Option<WorkSummary>,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}
