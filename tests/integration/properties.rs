use std::collections::HashSet;

use archive_progress::aggregate::MatchingMethod;
use archive_progress::config::ProgressConfig;
use archive_progress::matching::{match_category, score_candidates};
use archive_progress::model::{FolderNode, WorkStatusEntry};
use archive_progress::progress::{snapped_percent, validate};
use archive_progress::service::{ProgressService, TreeRequest};
use archive_progress::source::{ArchiveSnapshot, SnapshotDocument};
use proptest::prelude::*;

const FOLDER_NAMES: &[&str] = &[
    "WSOP",
    "WSOPE",
    "WSOP Europe",
    "WSOP-Europe",
    "WSOP_Europe",
    "2025 WSOP",
    "2025 WSOP-LAS VEGAS",
    "GOG",
    "GOG 2",
    "Cyprus 2023",
    "2023",
    "Misc",
];

const CATEGORY_NAMES: &[&str] = &[
    "WSOP Europe",
    "2025 WSOP",
    "GOG",
    "WSOP Cyprus",
    "Clip 2023",
    "Recap 2023",
];

fn ledger_entries(counts: &[(u64, u64)]) -> Vec<WorkStatusEntry> {
    CATEGORY_NAMES
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (name, (total, done)))| {
            WorkStatusEntry::new(i as i64 + 1, name, *total, (*done).min(*total))
        })
        .collect()
}

/// Folder i hangs under folder `parent % i` when i > 0 and the parent pick is Some
fn archive(
    folders: &[(usize, Option<usize>, u64, u64)],
    counts: &[(u64, u64)],
) -> ProgressService {
    let mut nodes: Vec<FolderNode> = Vec::with_capacity(folders.len());
    for (i, (name_idx, parent, file_count, size)) in folders.iter().enumerate() {
        let parent: Option<(String, u32)> = match parent {
            Some(p) if i > 0 => Some((nodes[p % i].path.clone(), nodes[p % i].depth)),
            _ => None,
        };
        let path = match &parent {
            Some((parent_path, _)) => format!("{}/{}", parent_path, i),
            None => format!("/{}", i),
        };
        let depth = parent.as_ref().map(|(_, d)| d + 1).unwrap_or(0);
        nodes.push(FolderNode {
            id: i as i64,
            name: FOLDER_NAMES[*name_idx].to_string(),
            path,
            parent_path: parent.map(|(parent_path, _)| parent_path),
            depth,
            file_count: *file_count,
            folder_count: 0,
            total_size: *size,
            total_duration: 0.0,
            category_override: None,
        });
    }
    let doc = SnapshotDocument {
        folders: nodes,
        work_status: ledger_entries(counts),
        ..SnapshotDocument::default()
    };
    let snapshot = ArchiveSnapshot::from_document(doc).unwrap();
    ProgressService::from_snapshot(snapshot, &ProgressConfig::default())
}

fn folders_strategy() -> impl Strategy<Value = Vec<(usize, Option<usize>, u64, u64)>> {
    prop::collection::vec(
        (
            0..FOLDER_NAMES.len(),
            prop::option::of(0usize..16),
            0u64..120,
            0u64..10_000,
        ),
        1..10,
    )
}

fn counts_strategy() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((0u64..120, 0u64..120), CATEGORY_NAMES.len())
}

proptest! {
    #[test]
    fn progress_stays_in_bounds(num in 0u64..10_000, den in 0u64..10_000) {
        let p = snapped_percent(num, den);
        prop_assert!((0.0..=100.0).contains(&p));
        if den > 0 && num * 10 > den * 9 {
            prop_assert_eq!(p, 100.0);
        }
    }

    #[test]
    fn progress_is_monotonic_in_done(a in 0u64..5_000, b in 0u64..5_000, den in 1u64..5_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(snapped_percent(lo, den) <= snapped_percent(hi, den));
    }

    #[test]
    fn completion_requires_all_counts_equal(nas in 0u64..200, total in 0u64..200, done in 0u64..200) {
        let v = validate(nas, total, done);
        prop_assert_eq!(v.is_complete, done == total && total == nas);
        if done > nas {
            prop_assert!(!v.valid);
            prop_assert!(v.reason.is_some());
        } else {
            prop_assert!(v.valid);
        }
        prop_assert_eq!(v.mismatch_count, total as i64 - nas as i64);
    }

    #[test]
    fn winner_has_the_top_score(name_idx in 0..FOLDER_NAMES.len(), counts in counts_strategy()) {
        let entries = ledger_entries(&counts);
        let name = FOLDER_NAMES[name_idx];
        let best_score = score_candidates(name, entries.iter())
            .into_iter()
            .filter_map(|(_, outcome)| outcome.map(|(_, score)| score))
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));

        match match_category(name, entries.iter()) {
            Some(winner) => {
                prop_assert_eq!(Some(winner.score), best_score);
                prop_assert!(entries.iter().any(|e| e.id == winner.category_id));
            }
            None => prop_assert!(best_score.is_none()),
        }
    }

    #[test]
    fn blank_names_never_match(blank in "[ \t]{0,6}", counts in counts_strategy()) {
        let mut entries = ledger_entries(&counts);
        entries.push(WorkStatusEntry::new(99, &blank, 3, 1));
        prop_assert!(match_category(&blank, entries.iter()).is_none());
        prop_assert!(match_category("WSOP Europe", entries.iter())
            .map_or(true, |m| m.category_id != 99));
    }

    #[test]
    fn categories_are_claimed_at_most_once(folders in folders_strategy(), counts in counts_strategy()) {
        let service = archive(&folders, &counts);
        let request = TreeRequest { depth: Some(10), ..TreeRequest::default() };
        let report = service.build_tree(&request).unwrap();

        let records: Vec<_> = report.tree.iter().flat_map(|r| r.walk()).collect();
        prop_assert_eq!(records.len(), folders.len());

        let mut seen = HashSet::new();
        for record in &records {
            if record.matching_method == MatchingMethod::None {
                prop_assert!(record.category.is_none());
                continue;
            }
            let id = record.category.as_ref().map(|c| c.id);
            prop_assert!(id.is_some());
            prop_assert!(seen.insert(id), "category {:?} credited twice", id);
            if record.matching_method == MatchingMethod::Invalidated {
                prop_assert!(record.work_summary.is_none());
            } else {
                prop_assert!(record.work_summary.is_some());
            }
        }

        let again = service.build_tree(&request).unwrap();
        prop_assert_eq!(report.tree, again.tree);
    }
}
