mod centroid_tracker;
mod matching;
mod rect;
mod tracked_object;
mod zone_state;

pub use centroid_tracker::{CentroidTracker, TrackerConfig};
pub use matching::{
    AssignmentResult, AssignmentStrategy, Detection, assign, distance_matrix, greedy_assignment,
    linear_assignment,
};
pub use rect::{CENTROID_BIAS, Rect, tlbr_centroid};
pub use tracked_object::{ObjectId, TrackedObject};
pub use zone_state::ZoneState;
