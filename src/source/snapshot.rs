//! In-memory archive snapshot loaded from a JSON or YAML document.

use crate::error::ApiError;
use crate::model::{
    FileRecord, FolderNode, MetadataEntry, MetadataLedger, MetadataRow, WorkStatusEntry,
    WorkStatusLedger,
};
use crate::source::{FileFilter, FileSource, FolderSource, LedgerSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// On-disk layout of a snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotDocument {
    pub folders: Vec<FolderNode>,
    pub files: Vec<FileRecord>,
    pub work_status: Vec<WorkStatusEntry>,
    /// Raw analysis rows
    pub metadata: Vec<MetadataRow>,
    /// Pre-aggregated titles; only read when `metadata` is empty
    pub metadata_entries: Vec<MetadataEntry>,
}

/// Every source the engine needs, held in memory with path indexes
#[derive(Debug, Clone)]
pub struct ArchiveSnapshot {
    folders: Vec<FolderNode>,
    files: Vec<FileRecord>,
    folder_by_path: HashMap<String, usize>,
    children_by_parent: HashMap<String, Vec<usize>>,
    files_by_folder: HashMap<String, Vec<usize>>,
    file_by_path: HashMap<String, usize>,
    work_status: WorkStatusLedger,
    metadata: MetadataLedger,
}

impl ArchiveSnapshot {
    /// Load a snapshot file, choosing the format from its extension
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ApiError::SnapshotError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let document: SnapshotDocument = match extension.as_deref() {
            Some("json") => serde_json::from_str(&contents)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => {
                return Err(ApiError::SnapshotError(format!(
                    "Unsupported snapshot format: {} (expected .json, .yaml or .yml)",
                    path.display()
                )))
            }
        };
        let snapshot = Self::from_document(document)?;
        info!(
            path = %path.display(),
            folders = snapshot.folders.len(),
            files = snapshot.files.len(),
            categories = snapshot.work_status.len(),
            titles = snapshot.metadata.len(),
            "Loaded archive snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ApiError> {
        Self::from_document(serde_json::from_str(contents)?)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ApiError> {
        Self::from_document(serde_yaml::from_str(contents)?)
    }

    /// Index a document. Folder and file paths must be unique.
    pub fn from_document(document: SnapshotDocument) -> Result<Self, ApiError> {
        let SnapshotDocument {
            folders,
            files,
            work_status,
            metadata,
            metadata_entries,
        } = document;

        let mut folder_by_path = HashMap::with_capacity(folders.len());
        let mut children_by_parent: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, folder) in folders.iter().enumerate() {
            if folder_by_path.insert(folder.path.clone(), idx).is_some() {
                return Err(ApiError::SnapshotError(format!(
                    "Duplicate folder path: {}",
                    folder.path
                )));
            }
            if let Some(parent) = &folder.parent_path {
                children_by_parent
                    .entry(parent.clone())
                    .or_default()
                    .push(idx);
            }
        }

        let mut file_by_path = HashMap::with_capacity(files.len());
        let mut files_by_folder: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, file) in files.iter().enumerate() {
            if file_by_path.insert(file.path.clone(), idx).is_some() {
                return Err(ApiError::SnapshotError(format!(
                    "Duplicate file path: {}",
                    file.path
                )));
            }
            files_by_folder
                .entry(file.folder_path.clone())
                .or_default()
                .push(idx);
        }
        for indexes in files_by_folder.values_mut() {
            indexes.sort_by(|a, b| files[*a].name.cmp(&files[*b].name));
        }

        let metadata = if metadata.is_empty() {
            MetadataLedger::from_entries(metadata_entries)
        } else {
            MetadataLedger::from_rows(metadata)
        };
        debug!(
            folders = folders.len(),
            files = files.len(),
            "Indexed archive snapshot"
        );

        Ok(Self {
            folders,
            files,
            folder_by_path,
            children_by_parent,
            files_by_folder,
            file_by_path,
            work_status: WorkStatusLedger::new(work_status),
            metadata,
        })
    }

    pub fn folders(&self) -> &[FolderNode] {
        &self.folders
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }
}

impl FolderSource for ArchiveSnapshot {
    fn roots(&self) -> Result<Vec<FolderNode>, ApiError> {
        Ok(self
            .folders
            .iter()
            .filter(|f| f.depth == 0)
            .cloned()
            .collect())
    }

    fn children_of(&self, path: &str) -> Result<Vec<FolderNode>, ApiError> {
        Ok(self
            .children_by_parent
            .get(path)
            .map(|idxs| idxs.iter().map(|i| self.folders[*i].clone()).collect())
            .unwrap_or_default())
    }

    fn by_exact_path(&self, path: &str) -> Result<Option<FolderNode>, ApiError> {
        Ok(self
            .folder_by_path
            .get(path)
            .map(|i| self.folders[*i].clone()))
    }
}

impl FileSource for ArchiveSnapshot {
    fn files_under(
        &self,
        folder_path: &str,
        filter: &FileFilter,
    ) -> Result<Vec<FileRecord>, ApiError> {
        Ok(self
            .files_by_folder
            .get(folder_path)
            .map(|idxs| {
                idxs.iter()
                    .map(|i| &self.files[*i])
                    .filter(|f| filter.accepts(f))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn file_by_path(&self, path: &str) -> Result<Option<FileRecord>, ApiError> {
        Ok(self.file_by_path.get(path).map(|i| self.files[*i].clone()))
    }
}

impl LedgerSource for ArchiveSnapshot {
    fn work_status_snapshot(&self) -> Result<WorkStatusLedger, ApiError> {
        Ok(self.work_status.clone())
    }

    fn metadata_snapshot(&self) -> Result<MetadataLedger, ApiError> {
        Ok(self.metadata.clone())
    }
}
