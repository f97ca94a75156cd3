use std::fs;

use archive_progress::config::{ConfigLoader, MergeService};
use archive_progress::error::ApiError;
use archive_progress::service::{ProgressService, TreeRequest};
use archive_progress::source::{ArchiveSnapshot, FolderSource, LedgerSource};
use tempfile::TempDir;

use crate::integration::support::{wsop_archive, write_json, write_yaml};

#[test]
fn json_and_yaml_snapshots_load_identically() {
    let temp_dir = TempDir::new().unwrap();
    let doc = wsop_archive().document();
    let json_path = write_json(temp_dir.path(), "archive.json", &doc);
    let yaml_path = write_yaml(temp_dir.path(), "archive.yml", &doc);

    let from_json = ArchiveSnapshot::load(&json_path).unwrap();
    let from_yaml = ArchiveSnapshot::load(&yaml_path).unwrap();

    assert_eq!(from_json.folders(), from_yaml.folders());
    assert_eq!(from_json.files(), from_yaml.files());
    assert_eq!(from_json.roots().unwrap().len(), 1);
    assert_eq!(
        from_yaml.work_status_snapshot().unwrap().len(),
        doc.work_status.len()
    );
    assert_eq!(from_yaml.metadata_snapshot().unwrap().total_hands(), 3);
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("archive.csv");
    fs::write(&path, "folders,files").unwrap();

    let err = ArchiveSnapshot::load(&path).unwrap_err();
    assert!(matches!(err, ApiError::SnapshotError(_)));
    assert!(err.to_string().contains("Unsupported snapshot format"));
}

#[test]
fn missing_and_malformed_snapshots_fail() {
    let temp_dir = TempDir::new().unwrap();
    let missing = ArchiveSnapshot::load(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ApiError::SnapshotError(_)));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        ArchiveSnapshot::load(&broken),
        Err(ApiError::Json(_))
    ));
}

#[test]
fn duplicate_folder_paths_are_rejected() {
    let mut doc = wsop_archive().document();
    let duplicate = doc.folders[0].clone();
    doc.folders.push(duplicate);

    let err = ArchiveSnapshot::from_document(doc).unwrap_err();
    assert!(err.to_string().contains("Duplicate folder path: /WSOP"));
}

#[test]
fn aggregated_metadata_entries_are_accepted() {
    let yaml = r#"
folders:
  - id: 1
    name: Finals
    path: /Finals
    depth: 0
    file_count: 1
files:
  - id: 10
    name: Final Table.mp4
    path: /Finals/Final Table.mp4
    folder_path: /Finals
    duration: 1000.0
metadata_entries:
  - file_name: Final Table
    hand_count: 12
    max_timecode_sec: 950.0
"#;
    let snapshot = ArchiveSnapshot::from_yaml_str(yaml).unwrap();
    let service = ProgressService::from_snapshot(snapshot, &ConfigLoader::default());
    let report = service.build_tree(&TreeRequest::default()).unwrap();

    let summary = &report.tree[0].metadata_summary;
    assert_eq!(summary.files_matched, 1);
    assert_eq!(summary.hand_count, 12);
    assert_eq!(summary.completed_files, 1);
    assert_eq!(summary.avg_progress, 95.0);
}

#[test]
fn config_file_layers_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = write_json(temp_dir.path(), "archive.json", &wsop_archive().document());
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[traversal]
default_depth = 1
max_files_listed = 5

[snapshot]
path = "{}"

[logging]
level = "debug"
format = "json"
"#,
            snapshot_path.display()
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(config.traversal.default_depth, 1);
    assert_eq!(config.traversal.max_files_listed, 5);
    assert_eq!(config.traversal.max_children_per_folder, 1000);
    assert_eq!(config.snapshot.path.as_deref(), Some(snapshot_path.as_path()));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
    config.validate().unwrap();

    let snapshot = ArchiveSnapshot::load(config.snapshot.path.as_deref().unwrap()).unwrap();
    let service = ProgressService::from_snapshot(snapshot, &config);
    let report = service.build_tree(&TreeRequest::default()).unwrap();
    assert_eq!(report.depth, 1);
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = MergeService::load(Some(&temp_dir.path().join("nope.toml")));
    assert!(result.is_err());
}

#[test]
fn environment_overrides_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[cache]\ntotals_ttl_secs = 60\n").unwrap();

    std::env::set_var("ARCHIVE_PROGRESS_CACHE__TOTALS_TTL_SECS", "42");
    let config = MergeService::load(Some(&config_path));
    std::env::remove_var("ARCHIVE_PROGRESS_CACHE__TOTALS_TTL_SECS");

    assert_eq!(config.unwrap().cache.totals_ttl_secs, 42);
}

#[test]
fn invalid_traversal_bounds_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[traversal]\ndefault_depth = 8\nmax_depth = 3\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    assert!(matches!(config.validate(), Err(ApiError::ConfigError(_))));
}
