//! CLI Tooling
//!
//! Command-line interface over the progress service. Every command renders
//! either human-readable text or pretty JSON; commands are read-only.

use crate::cancel::Interrupt;
use crate::config::{ConfigLoader, ProgressConfig};
use crate::error::ApiError;
use crate::format::{
    format_file_detail_text, format_folder_detail_text, format_match_text, format_totals_text,
    format_tree_text,
};
use crate::logging::LoggingConfig;
use crate::service::{ProgressService, TreeRequest};
use crate::source::ArchiveSnapshot;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Archive Progress CLI - media archive progress reporting
#[derive(Parser)]
#[command(name = "archive-progress")]
#[command(about = "Reconcile archive scans with work-status and metadata ledgers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Snapshot document to read (overrides snapshot.path)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags over the configured logging section
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the progress tree from the top-level folders or below a path
    Tree {
        /// Start below this folder instead of at the top level
        #[arg(long)]
        path: Option<String>,
        /// Levels of children to include (clamped to traversal.max_depth)
        #[arg(long)]
        depth: Option<u32>,
        /// List each folder's direct files
        #[arg(long)]
        files: bool,
        /// Include codec histograms
        #[arg(long)]
        codecs: bool,
        /// Only count files with these extensions (comma separated)
        #[arg(long, value_delimiter = ',')]
        extensions: Vec<String>,
        /// Count hidden files too
        #[arg(long)]
        hidden: bool,
        /// Abort the traversal after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one folder with its immediate children
    Folder {
        /// Folder path
        path: String,
        /// Omit the direct file listing
        #[arg(long)]
        no_files: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one file with its metadata ledger rows
    File {
        /// File path
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show archive-wide totals
    Totals {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Explain how a folder name matches the work-status ledger
    Match {
        /// Folder name as it appears in the archive
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output format (text renders TOML, or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid format: '{}'. Must be 'text' or 'json'.",
            other
        ))),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// CLI context holding the effective configuration and the loaded snapshot
pub struct CliContext {
    config: ProgressConfig,
    service: Option<ProgressService>,
}

impl CliContext {
    /// Load configuration, from an explicit file when given
    pub fn load_config(config_path: Option<&Path>) -> Result<ProgressConfig, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(config)
    }

    /// Create a context from an already loaded configuration.
    ///
    /// The snapshot is read up front when one is configured; commands that
    /// need it fail without one.
    pub fn from_config(
        mut config: ProgressConfig,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        if let Some(path) = snapshot_path {
            config.snapshot.path = Some(path);
        }
        config.validate()?;

        let service = match &config.snapshot.path {
            Some(path) => {
                let snapshot = ArchiveSnapshot::load(path)?;
                info!(
                    path = %path.display(),
                    folders = snapshot.folders().len(),
                    files = snapshot.files().len(),
                    "Snapshot loaded"
                );
                Some(ProgressService::from_snapshot(snapshot, &config))
            }
            None => None,
        };

        Ok(Self { config, service })
    }

    fn service(&self) -> Result<&ProgressService, ApiError> {
        self.service.as_ref().ok_or_else(|| {
            ApiError::ConfigError(
                "No snapshot configured: pass --snapshot or set snapshot.path".to_string(),
            )
        })
    }

    /// Execute a command, returning the rendered output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                path,
                depth,
                files,
                codecs,
                extensions,
                hidden,
                timeout_secs,
                format,
            } => {
                let format = parse_format(format)?;
                let interrupt = match timeout_secs {
                    Some(secs) => Interrupt::none().with_timeout(Duration::from_secs(*secs)),
                    None => Interrupt::none(),
                };
                let request = TreeRequest {
                    path: path.clone(),
                    depth: *depth,
                    include_files: *files,
                    include_codecs: *codecs,
                    extensions: extensions.clone(),
                    include_hidden: *hidden,
                    interrupt,
                };
                let report = self.service()?.build_tree(&request)?;
                match format {
                    OutputFormat::Json => to_json(&report),
                    OutputFormat::Text => Ok(format_tree_text(&report)),
                }
            }
            Commands::Folder {
                path,
                no_files,
                format,
            } => {
                let format = parse_format(format)?;
                let detail = self
                    .service()?
                    .folder_detail(path, !*no_files)?
                    .ok_or_else(|| ApiError::NotFound(format!("folder {}", path)))?;
                match format {
                    OutputFormat::Json => to_json(&detail),
                    OutputFormat::Text => Ok(format_folder_detail_text(&detail)),
                }
            }
            Commands::File { path, format } => {
                let format = parse_format(format)?;
                let detail = self
                    .service()?
                    .file_detail(path)?
                    .ok_or_else(|| ApiError::NotFound(format!("file {}", path)))?;
                match format {
                    OutputFormat::Json => to_json(&detail),
                    OutputFormat::Text => Ok(format_file_detail_text(&detail)),
                }
            }
            Commands::Totals { format } => {
                let format = parse_format(format)?;
                let totals = self.service()?.archive_totals()?;
                match format {
                    OutputFormat::Json => to_json(&totals),
                    OutputFormat::Text => Ok(format_totals_text(&totals)),
                }
            }
            Commands::Match { name, format } => {
                let format = parse_format(format)?;
                let explanation = self.service()?.explain_match(name)?;
                match format {
                    OutputFormat::Json => to_json(&explanation),
                    OutputFormat::Text => Ok(format_match_text(&explanation)),
                }
            }
            Commands::Config { command } => match command {
                ConfigCommands::Show { format } => match parse_format(format)? {
                    OutputFormat::Json => to_json(&self.config),
                    OutputFormat::Text => toml::to_string_pretty(&self.config).map_err(|e| {
                        ApiError::ConfigError(format!("Failed to render config: {}", e))
                    }),
                },
            },
        }
    }
}
