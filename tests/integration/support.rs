//! Snapshot fixtures shared by the integration tests

use archive_progress::config::ProgressConfig;
use archive_progress::model::{FileRecord, FolderNode, MetadataRow, WorkStatusEntry};
use archive_progress::service::ProgressService;
use archive_progress::source::{ArchiveSnapshot, SnapshotDocument};
use archive_progress::types::CategoryId;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds a snapshot document folder by folder
#[derive(Default)]
pub struct ArchiveBuilder {
    doc: SnapshotDocument,
    next_id: i64,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn category(mut self, id: CategoryId, name: &str, total: u64, done: u64) -> Self {
        self.doc
            .work_status
            .push(WorkStatusEntry::new(id, name, total, done));
        self
    }

    /// Add a folder; name, parent and depth come from the `/`-separated path
    pub fn folder(self, path: &str, file_count: u64, size: u64) -> Self {
        self.folder_node(path, file_count, size, None)
    }

    pub fn folder_with_override(
        self,
        path: &str,
        file_count: u64,
        size: u64,
        category: CategoryId,
    ) -> Self {
        self.folder_node(path, file_count, size, Some(category))
    }

    fn folder_node(
        mut self,
        path: &str,
        file_count: u64,
        size: u64,
        category_override: Option<CategoryId>,
    ) -> Self {
        let (parent, name) = path.rsplit_once('/').unwrap();
        let depth = path.matches('/').count() as u32 - 1;
        let id = self.id();
        self.doc.folders.push(FolderNode {
            id,
            name: name.to_string(),
            path: path.to_string(),
            parent_path: (!parent.is_empty()).then(|| parent.to_string()),
            depth,
            file_count,
            folder_count: 0,
            total_size: size,
            total_duration: 0.0,
            category_override,
        });
        self
    }

    pub fn file(mut self, folder_path: &str, name: &str, duration: f64) -> Self {
        let id = self.id();
        self.doc.files.push(FileRecord {
            id,
            name: name.to_string(),
            path: format!("{}/{}", folder_path, name),
            folder_path: folder_path.to_string(),
            size: 1024 * 1024,
            duration: Some(duration),
            extension: None,
            video_codec: Some("h264".to_string()),
            audio_codec: Some("aac".to_string()),
            is_hidden: None,
        });
        self
    }

    pub fn metadata(mut self, title: &str, timecode_out_sec: f64) -> Self {
        self.doc.metadata.push(MetadataRow {
            file_name: title.to_string(),
            timecode_in_sec: (timecode_out_sec - 60.0).max(0.0),
            timecode_out_sec,
            hand_grade: Some("A".to_string()),
            winner: None,
            hands: None,
            source_worksheet: None,
        });
        self
    }

    pub fn document(&self) -> SnapshotDocument {
        self.doc.clone()
    }

    pub fn snapshot(self) -> ArchiveSnapshot {
        ArchiveSnapshot::from_document(self.doc).unwrap()
    }

    pub fn service(self) -> ProgressService {
        ProgressService::from_snapshot(self.snapshot(), &ProgressConfig::default())
    }
}

/// The WSOP corner of the archive used by most scenarios
pub fn wsop_archive() -> ArchiveBuilder {
    ArchiveBuilder::new()
        .category(1, "WSOP Europe", 41, 22)
        .category(2, "2025 WSOP", 43, 6)
        .category(3, "WSOP Cyprus", 6, 6)
        .folder("/WSOP", 90, 9000)
        .folder("/WSOP/WSOP-Europe", 41, 5000)
        .folder("/WSOP/2025 WSOP-LAS VEGAS", 43, 3000)
        .folder("/WSOP/WSOPE", 6, 1000)
        .file("/WSOP/WSOP-Europe", "WSOPE 2011 Day 1.mp4", 7200.0)
        .file("/WSOP/WSOP-Europe", "WSOPE 2011 Day 2.mp4", 3600.0)
        .file("/WSOP/WSOP-Europe", "Unrelated Clip.mp4", 600.0)
        .metadata("WSOPE 2011 Day 1", 600.0)
        .metadata("WSOPE 2011 Day 1", 3600.0)
        .metadata("WSOPE 2011 Day 2", 3500.0)
}

pub fn write_json(dir: &Path, name: &str, doc: &SnapshotDocument) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

pub fn write_yaml(dir: &Path, name: &str, doc: &SnapshotDocument) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_yaml::to_string(doc).unwrap()).unwrap();
    path
}
