//! Additive metadata and codec accumulators.
//!
//! Tallies carry exact sums so a parent's average is the true mean over
//! every matched file below it, not a mean of child averages.

use crate::format::format_timecode;
use crate::model::FileRecord;
use crate::progress::round1;
use serde::Serialize;
use std::collections::BTreeMap;

use super::record::FileProgress;

/// Running metadata totals for a subtree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTally {
    pub files_matched: u64,
    pub hand_count: u64,
    pub completed_files: u64,
    pub progress_sum: f64,
    pub max_timecode_sec: f64,
}

impl MetadataTally {
    pub fn add_file(&mut self, file: &FileProgress) {
        if !file.is_matched() {
            return;
        }
        self.files_matched += 1;
        self.hand_count += file.hand_count;
        if file.is_complete {
            self.completed_files += 1;
        }
        self.progress_sum += file.progress_percent;
        self.max_timecode_sec = self.max_timecode_sec.max(file.max_timecode_sec);
    }

    pub fn merge(&mut self, other: &MetadataTally) {
        self.files_matched += other.files_matched;
        self.hand_count += other.hand_count;
        self.completed_files += other.completed_files;
        self.progress_sum += other.progress_sum;
        self.max_timecode_sec = self.max_timecode_sec.max(other.max_timecode_sec);
    }

    /// Summary against the folder's scanned file count (subtree included)
    pub fn summarize(&self, total_files: u64) -> MetadataSummary {
        let avg_progress = if self.files_matched > 0 {
            round1(self.progress_sum / self.files_matched as f64)
        } else {
            0.0
        };
        let match_rate = if total_files > 0 {
            round1((self.files_matched as f64 / total_files as f64 * 100.0).min(100.0))
        } else {
            0.0
        };
        MetadataSummary {
            total_files,
            files_matched: self.files_matched,
            hand_count: self.hand_count,
            avg_progress,
            completed_files: self.completed_files,
            match_rate,
            max_timecode_sec: self.max_timecode_sec,
            max_timecode_formatted: format_timecode(self.max_timecode_sec),
        }
    }
}

/// Metadata-ledger coverage of a folder's subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSummary {
    pub total_files: u64,
    pub files_matched: u64,
    pub hand_count: u64,
    pub avg_progress: f64,
    pub completed_files: u64,
    /// files_matched over total_files, in percent
    pub match_rate: f64,
    pub max_timecode_sec: f64,
    pub max_timecode_formatted: String,
}

/// Codec counts for a subtree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodecHistogram {
    video: BTreeMap<String, u64>,
    audio: BTreeMap<String, u64>,
    files_with_codec: u64,
}

impl CodecHistogram {
    pub fn add_file(&mut self, file: &FileRecord) {
        if let Some(codec) = non_blank(&file.video_codec) {
            *self.video.entry(codec.to_string()).or_default() += 1;
            self.files_with_codec += 1;
        }
        if let Some(codec) = non_blank(&file.audio_codec) {
            *self.audio.entry(codec.to_string()).or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: &CodecHistogram) {
        for (codec, count) in &other.video {
            *self.video.entry(codec.clone()).or_default() += count;
        }
        for (codec, count) in &other.audio {
            *self.audio.entry(codec.clone()).or_default() += count;
        }
        self.files_with_codec += other.files_with_codec;
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }

    /// `None` when no file in the subtree carries a codec
    pub fn summarize(&self, total_files: u64) -> Option<CodecSummary> {
        if self.is_empty() {
            return None;
        }
        Some(CodecSummary {
            total_files,
            files_with_codec: self.files_with_codec,
            video_codecs: self.video.clone(),
            audio_codecs: self.audio.clone(),
            top_video_codec: top_codec(&self.video),
            top_audio_codec: top_codec(&self.audio),
        })
    }
}

/// Codec breakdown of a folder's subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodecSummary {
    pub total_files: u64,
    /// Files with a video codec
    pub files_with_codec: u64,
    pub video_codecs: BTreeMap<String, u64>,
    pub audio_codecs: BTreeMap<String, u64>,
    pub top_video_codec: Option<String>,
    pub top_audio_codec: Option<String>,
}

fn non_blank(codec: &Option<String>) -> Option<&str> {
    codec.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

/// Most frequent codec; on equal counts the lexicographically smallest name
fn top_codec(counts: &BTreeMap<String, u64>) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;
    for (codec, count) in counts {
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((codec, *count));
        }
    }
    best.map(|(codec, _)| codec.clone())
}
