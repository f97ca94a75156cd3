use archive_progress::config::ProgressConfig;
use archive_progress::error::ApiError;
use archive_progress::tooling::cli::{Cli, CliContext, Commands, ConfigCommands};
use clap::Parser;
use tempfile::TempDir;

use crate::integration::support::{wsop_archive, write_json};

fn context(temp_dir: &TempDir) -> CliContext {
    let path = write_json(temp_dir.path(), "archive.json", &wsop_archive().document());
    CliContext::from_config(ProgressConfig::default(), Some(path)).unwrap()
}

fn tree(format: &str) -> Commands {
    Commands::Tree {
        path: None,
        depth: None,
        files: false,
        codecs: false,
        extensions: Vec::new(),
        hidden: false,
        timeout_secs: None,
        format: format.to_string(),
    }
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["archive-progress", "tree"],
        vec!["archive-progress", "tree", "--path", "/WSOP", "--depth", "3"],
        vec![
            "archive-progress",
            "tree",
            "--files",
            "--codecs",
            "--extensions",
            "mp4,mov",
            "--hidden",
            "--timeout-secs",
            "30",
            "--format",
            "json",
        ],
        vec!["archive-progress", "folder", "/WSOP/WSOP-Europe", "--no-files"],
        vec!["archive-progress", "file", "/WSOP/a.mp4", "--format", "json"],
        vec!["archive-progress", "totals"],
        vec!["archive-progress", "match", "WSOP-Europe"],
        vec!["archive-progress", "config", "show", "--format", "json"],
        vec![
            "archive-progress",
            "--snapshot",
            "archive.yaml",
            "--config",
            "config.toml",
            "--log-level",
            "debug",
            "totals",
        ],
    ];

    for args in cases {
        assert!(
            Cli::try_parse_from(args.clone()).is_ok(),
            "failed to parse {:?}",
            args
        );
    }
}

#[test]
fn parse_rejects_invalid_invocations() {
    assert!(Cli::try_parse_from(["archive-progress"]).is_err());
    assert!(Cli::try_parse_from(["archive-progress", "folder"]).is_err());
    assert!(Cli::try_parse_from(["archive-progress", "tree", "--depth", "deep"]).is_err());
    assert!(Cli::try_parse_from(["archive-progress", "config"]).is_err());
}

#[test]
fn tree_extensions_split_on_commas() {
    let cli = Cli::try_parse_from(["archive-progress", "tree", "--extensions", "mp4,.MOV"]).unwrap();
    match cli.command {
        Commands::Tree { extensions, .. } => assert_eq!(extensions, vec!["mp4", ".MOV"]),
        _ => panic!("expected tree command"),
    }
}

#[test]
fn tree_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli.execute(&tree("json")).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let root = &parsed["tree"][0];
    assert_eq!(root["name"].as_str(), Some("WSOP"));
    assert_eq!(root["matching_method"].as_str(), Some("none"));
    assert!(root["work_summary"].is_null());
    assert!(root.get("metadata_summary").and_then(|v| v.as_object()).is_some());

    let europe = &root["children"][0];
    assert_eq!(europe["matching_method"].as_str(), Some("fuzzy"));
    assert_eq!(europe["category"]["rule"].as_str(), Some("exact-normalized"));
    assert_eq!(
        europe["work_summary"]["combined_progress"].as_f64(),
        Some(53.7)
    );

    let stats = &parsed["root_stats"];
    assert_eq!(stats["total_files"].as_u64(), Some(90));
    assert!(stats.get("total_size_formatted").and_then(|v| v.as_str()).is_some());
    assert_eq!(parsed["depth"].as_u64(), Some(2));
}

#[test]
fn tree_text_renders_table_and_totals() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli.execute(&tree("text")).unwrap();

    assert!(output.contains("Progress Tree"));
    assert!(output.contains("WSOP-Europe"));
    assert!(output.contains("53.7%"));
    assert!(output.contains("Files: 90"));
}

#[test]
fn folder_and_file_json_contracts() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);

    let folder = cli
        .execute(&Commands::Folder {
            path: "/WSOP".to_string(),
            no_files: false,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&folder).unwrap();
    assert_eq!(parsed["folder"]["path"].as_str(), Some("/WSOP"));
    assert_eq!(parsed["children"].as_array().map(|c| c.len()), Some(3));

    let file = cli
        .execute(&Commands::File {
            path: "/WSOP/WSOP-Europe/WSOPE 2011 Day 2.mp4".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&file).unwrap();
    assert_eq!(
        parsed["file"]["matched_title"].as_str(),
        Some("WSOPE 2011 Day 2")
    );
    assert_eq!(parsed["file"]["is_complete"].as_bool(), Some(true));
    assert_eq!(parsed["rows"].as_array().map(|r| r.len()), Some(1));
}

#[test]
fn unknown_paths_are_not_found_errors() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);

    let err = cli
        .execute(&Commands::Folder {
            path: "/Missing".to_string(),
            no_files: false,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = cli
        .execute(&Commands::File {
            path: "/Missing.mp4".to_string(),
            format: "json".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn match_and_totals_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);

    let text = cli
        .execute(&Commands::Match {
            name: "2025 WSOP-LAS VEGAS".to_string(),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("2025 wsop las vegas"));
    assert!(text.contains("subset"));

    let json = cli
        .execute(&Commands::Totals {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["ledger_total"].as_u64(), Some(90));
    assert_eq!(parsed["ledger_done"].as_u64(), Some(34));
    assert!(parsed.get("computed_at").and_then(|v| v.as_str()).is_some());
}

#[test]
fn invalid_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let err = cli.execute(&tree("xml")).unwrap_err();
    assert!(err
        .to_string()
        .contains("Invalid format: 'xml'. Must be 'text' or 'json'."));
}

#[test]
fn config_show_json_reflects_snapshot_override() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli
        .execute(&Commands::Config {
            command: ConfigCommands::Show {
                format: "json".to_string(),
            },
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["traversal"]["max_depth"].as_u64(), Some(10));
    assert!(parsed["snapshot"]["path"]
        .as_str()
        .unwrap()
        .ends_with("archive.json"));
}

#[test]
fn missing_snapshot_file_fails_context_creation() {
    let temp_dir = TempDir::new().unwrap();
    let result = CliContext::from_config(
        ProgressConfig::default(),
        Some(temp_dir.path().join("absent.json")),
    );
    assert!(matches!(result, Err(ApiError::SnapshotError(_))));
}
