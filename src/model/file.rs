//! Scanned file record.

use crate::types::FileId;
use serde::{Deserialize, Serialize};

const SYSTEM_FILE_NAMES: &[&str] = &[
    "thumbs.db",
    "desktop.ini",
    ".ds_store",
    ".gitignore",
    ".gitkeep",
];

/// A file as recorded by the archive scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    pub path: String,
    /// Path of the folder that directly contains this file
    pub folder_path: String,
    #[serde(default)]
    pub size: u64,
    /// Seconds; absent for non-media files
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub audio_codec: Option<String>,
    /// Scanner verdict; derived from the name when absent
    #[serde(default)]
    pub is_hidden: Option<bool>,
}

impl FileRecord {
    pub fn hidden(&self) -> bool {
        self.is_hidden.unwrap_or_else(|| {
            let lower = self.name.to_lowercase();
            lower.starts_with('.') || SYSTEM_FILE_NAMES.contains(&lower.as_str())
        })
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Extension in filter form (`.mp4`), from the record or the file name
    pub fn normalized_extension(&self) -> Option<String> {
        match &self.extension {
            Some(ext) if !ext.trim().is_empty() => Some(normalize_extension(ext)),
            _ => self
                .name
                .rsplit_once('.')
                .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
                .map(|(_, ext)| normalize_extension(ext)),
        }
    }
}

/// Lowercase an extension and give it exactly one leading dot: `MP4` -> `.mp4`
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim().trim_start_matches('.').to_lowercase())
}
