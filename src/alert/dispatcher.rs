use std::collections::HashSet;
use std::path::PathBuf;

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alert::{AlertConfig, AlertLog, AlertPolicy, DirectorySnapshotStore, SnapshotStore};
use crate::error::AlertError;
use crate::intrusion::{AlertEvent, SessionId};

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Filtered by policy or already handled.
    Ignored,
    Recorded {
        line: String,
        /// `None` when no frame was supplied or saving failed
        snapshot: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    pub alerts_recorded: u64,
    pub snapshots_saved: u64,
    pub snapshots_failed: u64,
}

/// Turns confirmed crossings into log lines and snapshots.
///
/// Events are handled at most once, keyed by session id and sequence. An
/// event whose log line could not be written stays unhandled and may be
/// delivered again.
pub struct AlertDispatcher<S: SnapshotStore = DirectorySnapshotStore> {
    log: AlertLog,
    snapshots: S,
    policy: AlertPolicy,
    handled: HashSet<(SessionId, u64)>,
    stats: AlertStats,
}

impl AlertDispatcher<DirectorySnapshotStore> {
    pub fn from_config(config: &AlertConfig) -> Result<Self, AlertError> {
        Ok(Self::new(
            AlertLog::open(&config.log_path)?,
            DirectorySnapshotStore::new(&config.snapshot_dir),
            config.policy,
        ))
    }
}

impl<S: SnapshotStore> AlertDispatcher<S> {
    pub fn new(log: AlertLog, snapshots: S, policy: AlertPolicy) -> Self {
        Self {
            log,
            snapshots,
            policy,
            handled: HashSet::new(),
            stats: AlertStats::default(),
        }
    }

    /// Persist one event.
    ///
    /// A failed snapshot is logged and reported as `snapshot: None`; only a
    /// failure to write the log line is an error.
    pub fn on_alert_event(
        &mut self,
        event: &AlertEvent,
        frame: Option<&RgbImage>,
    ) -> Result<AlertOutcome, AlertError> {
        if self.handled.contains(&event.key()) {
            debug!(
                session_id = event.session_id,
                sequence = event.sequence,
                "alert event already handled"
            );
            return Ok(AlertOutcome::Ignored);
        }
        if !self.policy.accepts(event.kind) {
            return Ok(AlertOutcome::Ignored);
        }

        let line = self.log.record(event)?;
        self.handled.insert(event.key());
        self.stats.alerts_recorded += 1;

        let snapshot = match frame {
            Some(frame) => match self.snapshots.save(frame, event) {
                Ok(path) => {
                    info!(path = %path.display(), "saved snapshot");
                    self.stats.snapshots_saved += 1;
                    Some(path)
                }
                Err(err) => {
                    warn!(object_id = event.object_id, error = %err, "snapshot not saved");
                    self.stats.snapshots_failed += 1;
                    None
                }
            },
            None => None,
        };

        Ok(AlertOutcome::Recorded { line, snapshot })
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    pub fn log(&self) -> &AlertLog {
        &self.log
    }

    pub fn stats(&self) -> AlertStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::intrusion::Transition;
    use chrono::Utc;
    use std::fs;
    use std::path::Path;

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn save(&mut self, _frame: &RgbImage, _event: &AlertEvent) -> Result<PathBuf, AlertError> {
            Err(AlertError::WriteLog(std::io::Error::other("disk full")))
        }
    }

    fn event(sequence: u64, object_id: u64, kind: Transition) -> AlertEvent {
        AlertEvent {
            session_id: 0,
            sequence,
            object_id,
            kind,
            centroid: Point::new(0, 0),
            frame_index: sequence + 1,
            timestamp: Utc::now(),
        }
    }

    fn log_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_enter_is_logged_and_snapshotted_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = AlertConfig {
            log_path: dir.path().join("alerts_log.txt"),
            snapshot_dir: dir.path().join("snapshots"),
            policy: AlertPolicy::EnterOnly,
        };
        let mut dispatcher = AlertDispatcher::from_config(&config).unwrap();
        let frame = RgbImage::new(8, 8);
        let enter = event(0, 4, Transition::Enter);

        let outcome = dispatcher.on_alert_event(&enter, Some(&frame)).unwrap();
        let AlertOutcome::Recorded { line, snapshot } = outcome else {
            panic!("expected a recorded alert");
        };
        assert!(line.starts_with("[ALERT] Object 4 ENTERED"));
        assert!(snapshot.is_some_and(|p| p.exists()));

        // Redelivery of the same event is a no-op.
        assert_eq!(
            dispatcher.on_alert_event(&enter, Some(&frame)).unwrap(),
            AlertOutcome::Ignored
        );
        assert_eq!(log_lines(&config.log_path).len(), 1);
        assert_eq!(fs::read_dir(&config.snapshot_dir).unwrap().count(), 1);
        assert_eq!(dispatcher.stats().alerts_recorded, 1);
        assert_eq!(dispatcher.stats().snapshots_saved, 1);
    }

    #[test]
    fn test_exit_follows_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.txt");

        let mut enter_only =
            AlertDispatcher::new(AlertLog::open(&path).unwrap(), FailingStore, AlertPolicy::EnterOnly);
        assert_eq!(
            enter_only.on_alert_event(&event(0, 1, Transition::Exit), None).unwrap(),
            AlertOutcome::Ignored
        );
        assert!(log_lines(&path).is_empty());

        let mut both = AlertDispatcher::new(
            AlertLog::open(&path).unwrap(),
            FailingStore,
            AlertPolicy::EnterAndExit,
        );
        both.on_alert_event(&event(0, 1, Transition::Exit), None).unwrap();
        let lines = log_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Object 1 EXITED perimeter"));
    }

    #[test]
    fn test_snapshot_failure_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.txt");
        let mut dispatcher =
            AlertDispatcher::new(AlertLog::open(&path).unwrap(), FailingStore, AlertPolicy::EnterOnly);
        let frame = RgbImage::new(4, 4);

        for seq in 0..3 {
            let outcome = dispatcher
                .on_alert_event(&event(seq, seq, Transition::Enter), Some(&frame))
                .unwrap();
            assert!(matches!(outcome, AlertOutcome::Recorded { snapshot: None, .. }));
        }

        assert_eq!(log_lines(&path).len(), 3);
        assert_eq!(dispatcher.stats().snapshots_failed, 3);
        assert_eq!(dispatcher.stats().snapshots_saved, 0);
    }

    #[test]
    fn test_reused_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.txt");
        let mut dispatcher =
            AlertDispatcher::new(AlertLog::open(&path).unwrap(), FailingStore, AlertPolicy::EnterOnly);

        // Every session numbers its events from 0.
        for session_id in [7, 8] {
            let enter = AlertEvent {
                session_id,
                ..event(0, 1, Transition::Enter)
            };
            assert!(matches!(
                dispatcher.on_alert_event(&enter, None).unwrap(),
                AlertOutcome::Recorded { .. }
            ));
        }
        assert_eq!(log_lines(&path).len(), 2);
    }

    #[test]
    fn test_failed_event_is_retried_after_later_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.txt");
        let mut dispatcher =
            AlertDispatcher::new(AlertLog::open(&path).unwrap(), FailingStore, AlertPolicy::EnterOnly);
        let first = event(0, 1, Transition::Enter);
        let second = event(1, 2, Transition::Enter);

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert!(dispatcher.on_alert_event(&first, None).is_err());
        fs::remove_dir(&path).unwrap();

        assert!(matches!(
            dispatcher.on_alert_event(&second, None).unwrap(),
            AlertOutcome::Recorded { .. }
        ));
        assert!(matches!(
            dispatcher.on_alert_event(&first, None).unwrap(),
            AlertOutcome::Recorded { .. }
        ));
        assert_eq!(
            dispatcher.on_alert_event(&first, None).unwrap(),
            AlertOutcome::Ignored
        );

        let lines = log_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Object 2 ENTERED"));
        assert!(lines[1].contains("Object 1 ENTERED"));
        assert_eq!(dispatcher.stats().alerts_recorded, 2);
    }
}
