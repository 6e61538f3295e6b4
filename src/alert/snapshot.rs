use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{ImageFormat, RgbImage};

use crate::error::AlertError;
use crate::intrusion::{AlertEvent, Transition};

/// Destination for frame snapshots taken when an alert fires.
pub trait SnapshotStore {
    /// Persist `frame` for `event` and return where it went.
    fn save(&mut self, frame: &RgbImage, event: &AlertEvent) -> Result<PathBuf, AlertError>;
}

/// File name for an event's snapshot, e.g.
/// `intrusion_obj_3_20240501_123000_0-7.jpg`.
///
/// Ends with the session id and sequence, so two events for the same
/// object within one second get distinct files.
pub fn snapshot_file_name(event: &AlertEvent) -> String {
    let prefix = match event.kind {
        Transition::Enter => "intrusion",
        Transition::Exit => "exit",
    };
    format!(
        "{prefix}_obj_{}_{}_{}-{}.jpg",
        event.object_id,
        event.timestamp.with_timezone(&Local).format("%Y%m%d_%H%M%S"),
        event.session_id,
        event.sequence
    )
}

/// Writes JPEG snapshots into one directory, created on first use.
#[derive(Debug, Clone)]
pub struct DirectorySnapshotStore {
    dir: PathBuf,
}

impl DirectorySnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotStore for DirectorySnapshotStore {
    fn save(&mut self, frame: &RgbImage, event: &AlertEvent) -> Result<PathBuf, AlertError> {
        fs::create_dir_all(&self.dir).map_err(|source| AlertError::SnapshotDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(snapshot_file_name(event));
        frame
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|source| AlertError::Snapshot {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
