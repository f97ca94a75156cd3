//! Whole-archive totals with a time-boxed cache.
//!
//! Totals do not depend on the requested path, so they are computed once
//! and shared across requests until the TTL lapses or the scanner calls
//! [`TotalsCache::invalidate`].

use crate::error::ApiError;
use crate::format::{format_duration, format_size};
use crate::model::WorkStatusLedger;
use crate::source::FolderSource;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Archive-wide scan and ledger totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveTotals {
    pub total_files: u64,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub total_duration: f64,
    pub total_duration_formatted: String,
    /// Sum of every category's total_count
    pub ledger_total: u64,
    /// Sum of every category's done_count
    pub ledger_done: u64,
    pub computed_at: DateTime<Utc>,
}

impl ArchiveTotals {
    /// Sum the top-level folders, whose counts already include their subtrees
    pub fn compute(
        folders: &dyn FolderSource,
        ledger: &WorkStatusLedger,
    ) -> Result<Self, ApiError> {
        let roots = folders.roots()?;
        let total_files = roots.iter().map(|f| f.file_count).sum();
        let total_size = roots.iter().map(|f| f.total_size).sum();
        let total_duration = roots.iter().map(|f| f.total_duration).sum();
        let (ledger_total, ledger_done) = ledger.totals();
        Ok(Self {
            total_files,
            total_size,
            total_size_formatted: format_size(total_size),
            total_duration,
            total_duration_formatted: format_duration(total_duration),
            ledger_total,
            ledger_done,
            computed_at: Utc::now(),
        })
    }
}

struct CachedTotals {
    stored_at: Instant,
    totals: ArchiveTotals,
}

/// Single-slot TTL cache for [`ArchiveTotals`]
pub struct TotalsCache {
    ttl: Duration,
    slot: RwLock<Option<CachedTotals>>,
}

impl TotalsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Fresh cached totals, if any
    pub fn peek(&self) -> Option<ArchiveTotals> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| cached.totals.clone())
    }

    /// Cached totals, recomputing through `compute` once stale or invalidated
    pub fn get_or_compute<F>(&self, compute: F) -> Result<ArchiveTotals, ApiError>
    where
        F: FnOnce() -> Result<ArchiveTotals, ApiError>,
    {
        if let Some(totals) = self.peek() {
            return Ok(totals);
        }

        let mut slot = self.slot.write();
        // Another caller may have refilled the slot while we waited
        if let Some(cached) = slot.as_ref() {
            if cached.stored_at.elapsed() < self.ttl {
                return Ok(cached.totals.clone());
            }
        }
        let totals = compute()?;
        debug!(total_files = totals.total_files, "Archive totals recomputed");
        *slot = Some(CachedTotals {
            stored_at: Instant::now(),
            totals: totals.clone(),
        });
        Ok(totals)
    }

    /// Drop the cached totals; called after a scan completes
    pub fn invalidate(&self) {
        *self.slot.write() = None;
        debug!("Archive totals invalidated");
    }
}
