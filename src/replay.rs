//! Offline replay of recorded detections through a session.
//!
//! The input holds one JSON array of `[min_x, min_y, max_x, max_y]` boxes per
//! line, one line per frame. `[]` is a frame without detections and blank
//! lines are skipped.

use std::io::BufRead;

use serde::Serialize;
use tracing::debug;

use crate::alert::AlertDispatcher;
use crate::config::SessionConfig;
use crate::error::ReplayError;
use crate::integration::IntoDetections;
use crate::session::{Session, SessionStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Frame lines in the input, skipped ones included
    pub frames_read: u64,
    pub session: SessionStats,
    /// Events written to the alert log
    pub alerts_recorded: u64,
}

/// Run every frame of `input` through a session built from `config`.
///
/// Only frames whose 1-based index is a multiple of the frame stride reach
/// the tracker. Events accepted by the alert policy are appended to the
/// alert log; no snapshots are taken since there are no pixels.
pub fn replay<R: BufRead>(input: R, config: &SessionConfig) -> Result<ReplaySummary, ReplayError> {
    let mut dispatcher = AlertDispatcher::from_config(&config.alert)?;
    let mut session = Session::from_config(config);
    let stride = u64::from(config.frame_stride.max(1));

    let mut frames_read = 0u64;
    for (line_no, line) in input.lines().enumerate() {
        let line = line.map_err(ReplayError::Read)?;
        if line.trim().is_empty() {
            continue;
        }
        frames_read += 1;
        if frames_read % stride != 0 {
            continue;
        }

        let boxes: Vec<[f32; 4]> =
            serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                line: line_no + 1,
                source,
            })?;
        let report = session.process(&boxes.into_detections());
        debug!(
            frame_index = report.frame_index,
            objects = report.objects.len(),
            "replayed frame"
        );

        for event in &report.events {
            dispatcher.on_alert_event(event, None)?;
        }
    }

    Ok(ReplaySummary {
        frames_read,
        session: session.stats(),
        alerts_recorded: dispatcher.stats().alerts_recorded,
    })
}
