//! One tracking session: a tracker and a perimeter monitor advanced together.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::geometry::{Point, Polygon};
use crate::intrusion::{AlertEvent, IntrusionConfig, IntrusionMonitor, SessionId, Transition};
use crate::tracker::{CentroidTracker, Detection, ObjectId, TrackerConfig, ZoneState};

/// Per-object state handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub centroid: Point,
    pub state: ZoneState,
}

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// 1-based index among processed frames
    pub frame_index: u64,
    /// Live objects in registration order
    pub objects: Vec<ObjectSnapshot>,
    /// Crossings confirmed in this frame
    pub events: Vec<AlertEvent>,
}

impl FrameReport {
    /// Centroid of every live object, keyed by id.
    pub fn centroids(&self) -> BTreeMap<ObjectId, Point> {
        self.objects.iter().map(|o| (o.id, o.centroid)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub objects_registered: u64,
    pub enter_events: u64,
    pub exit_events: u64,
}

pub struct Session {
    tracker: CentroidTracker,
    monitor: IntrusionMonitor,
    stats: SessionStats,
}

impl Session {
    pub fn new(perimeter: Polygon, tracker: TrackerConfig, intrusion: IntrusionConfig) -> Self {
        Self {
            tracker: CentroidTracker::new(tracker),
            monitor: IntrusionMonitor::new(perimeter, intrusion),
            stats: SessionStats::default(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.perimeter.clone(),
            config.tracker.clone(),
            config.intrusion.clone(),
        )
    }

    /// Process one frame's detections, stamping events with the current time.
    pub fn process(&mut self, detections: &[Detection]) -> FrameReport {
        self.process_at(detections, Utc::now())
    }

    /// Process one frame's detections with an explicit event timestamp.
    pub fn process_at(&mut self, detections: &[Detection], timestamp: DateTime<Utc>) -> FrameReport {
        self.stats.frames_processed += 1;
        let frame_index = self.stats.frames_processed;

        self.tracker.update(detections);
        let events = self.monitor.evaluate(&mut self.tracker, frame_index, timestamp);

        self.stats.objects_registered = self.tracker.next_object_id();
        for event in &events {
            match event.kind {
                Transition::Enter => self.stats.enter_events += 1,
                Transition::Exit => self.stats.exit_events += 1,
            }
        }

        FrameReport {
            frame_index,
            objects: self.objects(),
            events,
        }
    }

    /// Current live objects in registration order.
    pub fn objects(&self) -> Vec<ObjectSnapshot> {
        self.tracker
            .objects()
            .map(|o| ObjectSnapshot {
                id: o.id,
                centroid: o.centroid,
                state: o.state(),
            })
            .collect()
    }

    /// Swap the perimeter between frames. Every object restarts OUTSIDE.
    pub fn set_perimeter(&mut self, perimeter: Polygon) {
        self.monitor.set_perimeter(perimeter, &mut self.tracker);
    }

    pub fn perimeter(&self) -> &Polygon {
        self.monitor.perimeter()
    }

    /// Stamped on every event of this session.
    pub fn id(&self) -> SessionId {
        self.monitor.session_id()
    }

    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
