use archive_progress::aggregate::MatchingMethod;
use archive_progress::matching::MatchRule;

use crate::integration::support::{wsop_archive, ArchiveBuilder};

#[test]
fn detail_reports_own_match_and_children() {
    let service = wsop_archive().service();
    let detail = service.folder_detail("/WSOP", true).unwrap().unwrap();

    assert_eq!(detail.folder.matching_method, MatchingMethod::None);
    assert!(detail.folder.work_summary.is_none());
    assert!(detail.folder.children.is_empty());
    assert_eq!(detail.folder.files.as_deref().map(|f| f.len()), Some(0));

    let names: Vec<_> = detail
        .children
        .iter()
        .map(|c| c.folder.name.as_str())
        .collect();
    assert_eq!(names, vec!["WSOP-Europe", "2025 WSOP-LAS VEGAS", "WSOPE"]);
    let methods: Vec<_> = detail.children.iter().map(|c| c.matching_method).collect();
    assert_eq!(
        methods,
        vec![
            MatchingMethod::Fuzzy,
            MatchingMethod::Fuzzy,
            MatchingMethod::None
        ]
    );
    assert_eq!(
        detail.children[0].work_summary.as_ref().unwrap().combined_progress,
        53.7
    );
    assert_eq!(detail.children_omitted, 0);
}

#[test]
fn detail_of_leaf_lists_files_and_codecs() {
    let service = wsop_archive().service();
    let detail = service
        .folder_detail("/WSOP/WSOP-Europe", true)
        .unwrap()
        .unwrap();

    let folder = &detail.folder;
    assert_eq!(folder.matching_method, MatchingMethod::Fuzzy);
    assert_eq!(
        folder.category.as_ref().and_then(|c| c.rule),
        Some(MatchRule::ExactNormalized)
    );
    assert_eq!(folder.files.as_ref().unwrap().len(), 3);
    assert_eq!(folder.metadata_summary.files_matched, 2);
    assert!(folder.codec_summary.is_some());
    assert!(detail.children.is_empty());

    let without_files = service
        .folder_detail("/WSOP/WSOP-Europe", false)
        .unwrap()
        .unwrap();
    assert!(without_files.folder.files.is_none());
    assert_eq!(without_files.folder.metadata_summary.files_matched, 2);
}

#[test]
fn detail_honors_ancestor_claims() {
    let service = ArchiveBuilder::new()
        .category(1, "WSOP Europe", 50, 10)
        .folder("/WSOP Europe", 50, 1000)
        .folder("/WSOP Europe/WSOP-Europe", 20, 500)
        .service();

    let nested = service
        .folder_detail("/WSOP Europe/WSOP-Europe", false)
        .unwrap()
        .unwrap();
    assert_eq!(nested.folder.matching_method, MatchingMethod::None);

    // The target's own claim is also withheld from its children
    let parent = service.folder_detail("/WSOP Europe", false).unwrap().unwrap();
    assert_eq!(parent.folder.matching_method, MatchingMethod::Fuzzy);
    assert_eq!(parent.children[0].matching_method, MatchingMethod::None);
}

#[test]
fn detail_children_thread_sibling_claims() {
    let service = ArchiveBuilder::new()
        .category(1, "WSOP Europe", 20, 10)
        .folder("/Parent", 40, 1000)
        .folder("/Parent/WSOP-Europe", 20, 900)
        .folder("/Parent/WSOP Europe 2", 20, 100)
        .service();

    let detail = service.folder_detail("/Parent", false).unwrap().unwrap();
    assert_eq!(detail.children[0].matching_method, MatchingMethod::Fuzzy);
    assert_eq!(detail.children[1].matching_method, MatchingMethod::None);
}

#[test]
fn unknown_folder_is_none() {
    let service = wsop_archive().service();
    assert!(service.folder_detail("/Missing", true).unwrap().is_none());
}

#[test]
fn file_detail_returns_rows_in_timecode_order() {
    let service = wsop_archive().service();
    let detail = service
        .file_detail("/WSOP/WSOP-Europe/WSOPE 2011 Day 1.mp4")
        .unwrap()
        .unwrap();

    assert_eq!(detail.file.matched_title.as_deref(), Some("WSOPE 2011 Day 1"));
    assert_eq!(detail.file.hand_count, 2);
    assert_eq!(detail.file.progress_percent, 50.0);
    assert!(!detail.file.is_complete);
    let outs: Vec<_> = detail.rows.iter().map(|r| r.timecode_out_sec).collect();
    assert_eq!(outs, vec![600.0, 3600.0]);
}

#[test]
fn unmatched_file_has_no_rows() {
    let service = wsop_archive().service();
    let detail = service
        .file_detail("/WSOP/WSOP-Europe/Unrelated Clip.mp4")
        .unwrap()
        .unwrap();
    assert!(detail.file.matched_title.is_none());
    assert!(detail.rows.is_empty());
    assert_eq!(detail.file.progress_percent, 0.0);

    assert!(service.file_detail("/WSOP/none.mp4").unwrap().is_none());
}

#[test]
fn explain_match_lists_firing_candidates() {
    let service = wsop_archive().service();

    let europe = service.explain_match("WSOP-Europe").unwrap();
    assert_eq!(europe.normalized, "wsop europe");
    let winner = europe.winner.unwrap();
    assert_eq!(winner.category_id, 1);
    assert_eq!(winner.rule, MatchRule::ExactNormalized);
    assert_eq!(europe.candidates.len(), 1);

    let wsope = service.explain_match("WSOPE").unwrap();
    assert!(wsope.winner.is_none());
    assert!(wsope.candidates.is_empty());
}

#[test]
fn totals_are_cached_until_invalidated() {
    let service = wsop_archive().service();
    let first = service.archive_totals().unwrap();
    let second = service.archive_totals().unwrap();
    assert_eq!(first.computed_at, second.computed_at);
    assert_eq!(first.total_duration_formatted, "0h");

    service.invalidate_totals();
    let third = service.archive_totals().unwrap();
    assert!(third.computed_at >= first.computed_at);
    assert_eq!(third.total_files, first.total_files);
}
