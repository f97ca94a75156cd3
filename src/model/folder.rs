//! Scanned folder node.

use crate::types::{CategoryId, FolderId};
use serde::{Deserialize, Serialize};

/// A folder as recorded by the archive scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: FolderId,
    pub name: String,
    /// Globally unique, `/`-separated
    pub path: String,
    #[serde(default)]
    pub parent_path: Option<String>,
    #[serde(default)]
    pub depth: u32,
    /// Files in this folder and every descendant
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub folder_count: u64,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub total_duration: f64,
    /// Explicit link to a work-status category; beats fuzzy matching
    #[serde(default)]
    pub category_override: Option<CategoryId>,
}

impl FolderNode {
    /// Path prefixes from the archive root down to (and including) this path.
    ///
    /// `/mnt/nas/WSOP` yields `/mnt`, `/mnt/nas`, `/mnt/nas/WSOP`.
    pub fn path_prefixes(path: &str) -> Vec<String> {
        let mut prefixes = Vec::new();
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push('/');
            current.push_str(part);
            prefixes.push(current.clone());
        }
        prefixes
    }
}
