//! Evaluates every tracked object against the perimeter once per frame.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::geometry::Polygon;
use crate::intrusion::{AlertEvent, SessionId};
use crate::tracker::{CentroidTracker, ZoneState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrusionConfig {
    /// Consecutive frames a new zone state must hold before it is confirmed.
    /// Values below 1 are treated as 1.
    pub debounce_frames: u32,
}

impl Default for IntrusionConfig {
    fn default() -> Self {
        Self { debounce_frames: 1 }
    }
}

static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct IntrusionMonitor {
    session_id: SessionId,
    perimeter: Polygon,
    config: IntrusionConfig,
    next_sequence: u64,
}

impl IntrusionMonitor {
    pub fn new(perimeter: Polygon, mut config: IntrusionConfig) -> Self {
        config.debounce_frames = config.debounce_frames.max(1);
        if !perimeter.is_valid() {
            warn!(
                vertices = perimeter.len(),
                "perimeter not set, every object stays OUTSIDE"
            );
        }
        Self {
            session_id: SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            perimeter,
            config,
            next_sequence: 0,
        }
    }

    /// Stamped on every event this monitor emits.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn perimeter(&self) -> &Polygon {
        &self.perimeter
    }

    pub fn config(&self) -> &IntrusionConfig {
        &self.config
    }

    /// Number of events emitted so far.
    pub fn events_emitted(&self) -> u64 {
        self.next_sequence
    }

    /// Replace the perimeter and put every tracked object back OUTSIDE.
    pub fn set_perimeter(&mut self, perimeter: Polygon, tracker: &mut CentroidTracker) {
        if !perimeter.is_valid() {
            warn!(
                vertices = perimeter.len(),
                "perimeter not set, every object stays OUTSIDE"
            );
        }
        self.perimeter = perimeter;
        for object in tracker.objects_mut() {
            object.intrusion.reset();
        }
    }

    /// Advance the state machine of every tracked object by one frame.
    ///
    /// Returns the confirmed crossings in object registration order.
    pub fn evaluate(
        &mut self,
        tracker: &mut CentroidTracker,
        frame_index: u64,
        timestamp: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        if !self.perimeter.is_valid() {
            for object in tracker.objects_mut() {
                object.intrusion.force_outside();
            }
            return events;
        }

        for object in tracker.objects_mut() {
            let observed = ZoneState::from_containment(self.perimeter.contains(object.centroid));
            let transition = object
                .intrusion
                .observe(observed, self.config.debounce_frames);

            debug!(
                object_id = object.id,
                x = object.centroid.x,
                y = object.centroid.y,
                %observed,
                state = %object.state(),
                frames_since_change = object.frames_since_state_change(),
                "evaluated object"
            );

            if let Some(kind) = transition {
                let event = AlertEvent {
                    session_id: self.session_id,
                    sequence: self.next_sequence,
                    object_id: object.id,
                    kind,
                    centroid: object.centroid,
                    frame_index,
                    timestamp,
                };
                self.next_sequence += 1;
                info!(object_id = object.id, %kind, frame_index, "perimeter crossing confirmed");
                events.push(event);
            }
        }

        events
    }
}
