//! IntrusionPipeline for combining detection, tracking and alerting.

use image::RgbImage;
use tracing::warn;

use crate::alert::{AlertDispatcher, DirectorySnapshotStore, SnapshotStore};
use crate::config::SessionConfig;
use crate::error::{AlertError, AlertFailure, PipelineError};
use crate::session::{FrameReport, Session};

use super::DetectionSource;

/// End-to-end frame processing.
///
/// Each processed frame runs the detector, advances the session and hands
/// every confirmed crossing, together with the frame, to the dispatcher. One
/// frame is fully handled before the call returns, and a failed event does
/// not keep later events of the same frame from being dispatched.
pub struct IntrusionPipeline<D: DetectionSource, S: SnapshotStore = DirectorySnapshotStore> {
    detector: D,
    session: Session,
    dispatcher: AlertDispatcher<S>,
    frame_stride: u32,
    frames_seen: u64,
}

impl<D: DetectionSource> IntrusionPipeline<D, DirectorySnapshotStore> {
    /// Build the session and the file based alert outputs from `config`.
    pub fn from_config(detector: D, config: &SessionConfig) -> Result<Self, AlertError> {
        Ok(Self::new(
            detector,
            Session::from_config(config),
            AlertDispatcher::from_config(&config.alert)?,
            config.frame_stride,
        ))
    }
}

impl<D: DetectionSource, S: SnapshotStore> IntrusionPipeline<D, S> {
    /// `frame_stride` below 1 is treated as 1.
    pub fn new(detector: D, session: Session, dispatcher: AlertDispatcher<S>, frame_stride: u32) -> Self {
        Self {
            detector,
            session,
            dispatcher,
            frame_stride: frame_stride.max(1),
            frames_seen: 0,
        }
    }
}

impl<D, S> IntrusionPipeline<D, S>
where
    D: DetectionSource,
    D::Error: std::error::Error + 'static,
    S: SnapshotStore,
{
    /// Process a single frame.
    ///
    /// Returns `None` for frames skipped by the stride; those frames do not
    /// touch the tracker. If any event could not be recorded the error
    /// carries the frame's report and the failed events.
    pub fn process_frame(
        &mut self,
        frame: &RgbImage,
    ) -> Result<Option<FrameReport>, PipelineError<D::Error>> {
        self.frames_seen += 1;
        if self.frames_seen % u64::from(self.frame_stride) != 0 {
            return Ok(None);
        }

        let detections = self
            .detector
            .detect(frame.as_raw(), frame.width(), frame.height())
            .map_err(PipelineError::Detection)?;
        let report = self.session.process(&detections);

        let mut failures = Vec::new();
        for event in &report.events {
            if let Err(error) = self.dispatcher.on_alert_event(event, Some(frame)) {
                warn!(
                    object_id = event.object_id,
                    sequence = event.sequence,
                    %error,
                    "alert not recorded"
                );
                failures.push(AlertFailure {
                    event: event.clone(),
                    error,
                });
            }
        }

        if failures.is_empty() {
            Ok(Some(report))
        } else {
            Err(PipelineError::Alert {
                report: Box::new(report),
                failures,
            })
        }
    }
}

impl<D: DetectionSource, S: SnapshotStore> IntrusionPipeline<D, S> {
    /// Frames handed to [`process_frame`](Self::process_frame), skipped ones
    /// included.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access, e.g. to redefine the perimeter between frames.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn dispatcher(&self) -> &AlertDispatcher<S> {
        &self.dispatcher
    }

    /// Mutable access, e.g. to hand failed events back for another attempt.
    pub fn dispatcher_mut(&mut self) -> &mut AlertDispatcher<S> {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertOutcome;
    use crate::geometry::Point;
    use crate::tracker::Detection;
    use std::collections::VecDeque;

    struct ScriptedDetector {
        frames: VecDeque<Vec<Detection>>,
    }

    impl DetectionSource for ScriptedDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, Self::Error> {
            Ok(self.frames.pop_front().unwrap_or_default())
        }
    }

    fn config(dir: &std::path::Path, frame_stride: u32) -> SessionConfig {
        let mut config = SessionConfig {
            perimeter: vec![
                Point::new(100, 0),
                Point::new(200, 0),
                Point::new(200, 200),
                Point::new(100, 200),
            ]
            .into(),
            frame_stride,
            ..Default::default()
        };
        config.alert.log_path = dir.join("alerts_log.txt");
        config.alert.snapshot_dir = dir.join("snapshots");
        config
    }

    #[test]
    fn test_pipeline_alerts_with_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let detector = ScriptedDetector {
            frames: VecDeque::from(vec![
                vec![Detection::new(0.0, 0.0, 40.0, 100.0)],
                vec![Detection::new(60.0, 0.0, 100.0, 100.0)],
                vec![Detection::new(120.0, 0.0, 160.0, 100.0)],
            ]),
        };
        let mut pipeline = IntrusionPipeline::from_config(detector, &config(dir.path(), 1)).unwrap();
        let frame = RgbImage::new(320, 240);

        let mut events = Vec::new();
        for _ in 0..3 {
            let report = pipeline.process_frame(&frame).unwrap().unwrap();
            events.extend(report.events);
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].object_id, 0);
        assert_eq!(events[0].frame_index, 3);
        assert_eq!(pipeline.dispatcher().stats().snapshots_saved, 1);
        let log = std::fs::read_to_string(dir.path().join("alerts_log.txt")).unwrap();
        assert!(log.starts_with("[ALERT] Object 0 ENTERED perimeter at "));
    }

    #[test]
    fn test_frame_stride_skips_frames() {
        let dir = tempfile::tempdir().unwrap();
        let detector = ScriptedDetector {
            frames: VecDeque::new(),
        };
        let mut pipeline = IntrusionPipeline::from_config(detector, &config(dir.path(), 3)).unwrap();
        let frame = RgbImage::new(8, 8);

        let processed: Vec<bool> = (0..6)
            .map(|_| pipeline.process_frame(&frame).unwrap().is_some())
            .collect();
        assert_eq!(processed, vec![false, false, true, false, false, true]);
        assert_eq!(pipeline.session().stats().frames_processed, 2);
        assert_eq!(pipeline.frames_seen(), 6);
    }

    #[test]
    fn test_log_failure_keeps_every_event() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 1);
        let two_inside = vec![
            Detection::new(110.0, 0.0, 150.0, 100.0),
            Detection::new(160.0, 0.0, 190.0, 100.0),
        ];
        let detector = ScriptedDetector {
            frames: VecDeque::from(vec![two_inside.clone(), two_inside]),
        };
        let mut pipeline = IntrusionPipeline::from_config(detector, &config).unwrap();
        let frame = RgbImage::new(8, 8);

        std::fs::remove_file(&config.alert.log_path).unwrap();
        std::fs::create_dir(&config.alert.log_path).unwrap();

        let Err(PipelineError::Alert { report, failures }) = pipeline.process_frame(&frame) else {
            panic!("expected the alert log to fail");
        };
        assert_eq!(report.events.len(), 2);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].event, report.events[0]);
        assert_eq!(failures[1].event, report.events[1]);
        assert_eq!(pipeline.session().stats().enter_events, 2);

        // Both objects stay inside: nothing new in the next frame.
        let next = pipeline.process_frame(&frame).unwrap().unwrap();
        assert!(next.events.is_empty());

        std::fs::remove_dir(&config.alert.log_path).unwrap();
        for failure in &failures {
            let outcome = pipeline
                .dispatcher_mut()
                .on_alert_event(&failure.event, Some(&frame))
                .unwrap();
            assert!(matches!(outcome, AlertOutcome::Recorded { snapshot: Some(_), .. }));
        }
        let log = std::fs::read_to_string(&config.alert.log_path).unwrap();
        assert_eq!(log.lines().count(), 2);
        assert_eq!(pipeline.dispatcher().stats().snapshots_saved, 2);
    }
}
