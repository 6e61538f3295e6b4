//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::intrusion::AlertEvent;
use crate::session::FrameReport;

/// Errors loading or validating a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("debounce_frames must be at least 1")]
    ZeroDebounce,
    #[error("frame_stride must be at least 1")]
    ZeroFrameStride,
    #[error("max_distance must be positive and finite, got {0}")]
    InvalidMaxDistance(f64),
}

/// Errors persisting an alert.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("failed to open alert log {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write alert log: {0}")]
    WriteLog(#[source] io::Error),
    #[error("failed to create snapshot directory {path}: {source}")]
    SnapshotDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to save snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// An event the dispatcher could not persist.
#[derive(Debug)]
pub struct AlertFailure {
    pub event: AlertEvent,
    pub error: AlertError,
}

/// Errors from [`IntrusionPipeline`](crate::integration::IntrusionPipeline).
#[derive(Debug, Error)]
pub enum PipelineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("detection failed: {0}")]
    Detection(#[source] E),
    /// The frame was processed and every event dispatched, but some could not
    /// be recorded. They can be handed to the dispatcher again.
    #[error(
        "{} of {} alerts in frame {} not recorded",
        .failures.len(),
        .report.events.len(),
        .report.frame_index
    )]
    Alert {
        report: Box<FrameReport>,
        failures: Vec<AlertFailure>,
    },
}

/// Errors replaying a recorded detection stream.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read detections: {0}")]
    Read(#[source] io::Error),
    #[error("line {line}: expected an array of [x1, y1, x2, y2]: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Alert(#[from] AlertError),
}
