//! Single tracked object with its perimeter state.

use crate::geometry::Point;
use crate::intrusion::IntrusionState;
use crate::tracker::zone_state::ZoneState;

/// Object identifier. Allocated in increasing order and never reused within
/// one tracker.
pub type ObjectId = u64;

/// Single tracked object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedObject {
    /// Unique object identifier
    pub id: ObjectId,
    /// Latest matched centroid
    pub centroid: Point,
    /// Consecutive updates without a matching detection
    pub disappeared_count: u32,
    /// Debounced inside/outside state
    pub intrusion: IntrusionState,
}

impl TrackedObject {
    /// Create a new object outside the perimeter.
    pub fn new(id: ObjectId, centroid: Point) -> Self {
        Self {
            id,
            centroid,
            disappeared_count: 0,
            intrusion: IntrusionState::default(),
        }
    }

    /// Confirmed zone state.
    pub fn state(&self) -> ZoneState {
        self.intrusion.state()
    }

    pub fn frames_since_state_change(&self) -> u32 {
        self.intrusion.frames_since_state_change()
    }

    /// Record a successful match in the current frame.
    pub fn mark_seen(&mut self, centroid: Point) {
        self.centroid = centroid;
        self.disappeared_count = 0;
    }

    /// Record a frame without a match and return the new disappeared count.
    pub fn mark_missed(&mut self) -> u32 {
        self.disappeared_count = self.disappeared_count.saturating_add(1);
        self.disappeared_count
    }
}
