//! Work-status and metadata ledger snapshots.
//!
//! Both ledgers are refreshed out-of-band by spreadsheet sync jobs. The
//! engine receives a snapshot per call and keeps its iteration order stable,
//! since matching tie-breaks depend on it.

use crate::format::format_timecode;
use crate::types::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the work-status ledger ("category")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStatusEntry {
    pub id: CategoryId,
    /// Free-text category name, e.g. `WSOP Europe`
    pub category: String,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub done_count: u64,
    /// Person in charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkStatusEntry {
    pub fn new(id: CategoryId, category: &str, total_count: u64, done_count: u64) -> Self {
        Self {
            id,
            category: category.to_string(),
            total_count,
            done_count,
            pic: None,
            status: None,
            notes: None,
        }
    }

    /// done / total, 0 when the ledger has no total
    pub fn completion_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.done_count as f64 / self.total_count as f64
        }
    }
}

/// Immutable snapshot of the work-status ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkStatusLedger {
    entries: Vec<WorkStatusEntry>,
}

impl WorkStatusLedger {
    pub fn new(entries: Vec<WorkStatusEntry>) -> Self {
        Self { entries }
    }

    /// Entries in snapshot order
    pub fn entries(&self) -> &[WorkStatusEntry] {
        &self.entries
    }

    pub fn get(&self, id: CategoryId) -> Option<&WorkStatusEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (sum of total_count, sum of done_count)
    pub fn totals(&self) -> (u64, u64) {
        self.entries.iter().fold((0, 0), |(total, done), e| {
            (total + e.total_count, done + e.done_count)
        })
    }
}

/// One analysis row of the metadata ledger (a single hand/timecode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    /// Ledger title of the analysed video
    pub file_name: String,
    #[serde(default)]
    pub timecode_in_sec: f64,
    #[serde(default)]
    pub timecode_out_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hands: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_worksheet: Option<String>,
}

/// Rows of one ledger title, pre-aggregated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub file_name: String,
    pub hand_count: u64,
    pub max_timecode_sec: f64,
}

impl MetadataEntry {
    pub fn max_timecode_formatted(&self) -> String {
        format_timecode(self.max_timecode_sec)
    }
}

/// Immutable snapshot of the metadata ledger, grouped by title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataLedger {
    entries: Vec<MetadataEntry>,
    rows: BTreeMap<String, Vec<MetadataRow>>,
}

impl MetadataLedger {
    /// Group raw analysis rows per title.
    ///
    /// Rows with a blank title are dropped. Titles come out in lexical
    /// order; rows of a title are sorted by `timecode_out_sec`.
    pub fn from_rows(rows: Vec<MetadataRow>) -> Self {
        let mut grouped: BTreeMap<String, Vec<MetadataRow>> = BTreeMap::new();
        for row in rows {
            if row.file_name.trim().is_empty() {
                continue;
            }
            grouped.entry(row.file_name.clone()).or_default().push(row);
        }

        let mut entries = Vec::with_capacity(grouped.len());
        for (title, title_rows) in grouped.iter_mut() {
            title_rows.sort_by(|a, b| a.timecode_out_sec.total_cmp(&b.timecode_out_sec));
            let max_timecode_sec = title_rows
                .iter()
                .map(|r| r.timecode_out_sec)
                .fold(0.0_f64, f64::max);
            entries.push(MetadataEntry {
                file_name: title.clone(),
                hand_count: title_rows.len() as u64,
                max_timecode_sec,
            });
        }

        Self {
            entries,
            rows: grouped,
        }
    }

    /// Use entries that were already aggregated upstream (no row detail)
    pub fn from_entries(entries: Vec<MetadataEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !e.file_name.trim().is_empty())
            .collect();
        Self {
            entries,
            rows: BTreeMap::new(),
        }
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Analysis rows for a title, empty when only aggregates were loaded
    pub fn rows_for(&self, title: &str) -> &[MetadataRow] {
        self.rows.get(title).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_hands(&self) -> u64 {
        self.entries.iter().map(|e| e.hand_count).sum()
    }
}
