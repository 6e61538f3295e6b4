use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::tracker::{ObjectId, ZoneState};

/// Direction of a confirmed perimeter crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    /// OUTSIDE to INSIDE
    Enter,
    /// INSIDE to OUTSIDE
    Exit,
}

impl Transition {
    /// The crossing that ends in `to`.
    pub fn into_state(to: ZoneState) -> Self {
        match to {
            ZoneState::Inside => Self::Enter,
            ZoneState::Outside => Self::Exit,
        }
    }

    /// Past tense used in alert records.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Enter => "ENTERED",
            Self::Exit => "EXITED",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enter => f.write_str("ENTER"),
            Self::Exit => f.write_str("EXIT"),
        }
    }
}

/// Identifies the monitor that emitted an event, unique within the process.
pub type SessionId = u64;

/// A confirmed crossing of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub session_id: SessionId,
    /// Per-session counter, increasing in emission order
    pub sequence: u64,
    pub object_id: ObjectId,
    pub kind: Transition,
    /// Centroid of the object in the frame that confirmed the crossing
    pub centroid: Point,
    /// 1-based index of that frame
    pub frame_index: u64,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    /// Identity of the event across sessions.
    pub fn key(&self) -> (SessionId, u64) {
        (self.session_id, self.sequence)
    }
}
