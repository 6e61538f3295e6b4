//! Virtual tripwire: raise an alert when a tracked object crosses into a
//! user-drawn polygon.
//!
//! Per frame, an external detector supplies bounding boxes. The
//! [`CentroidTracker`] turns them into stable object ids, the
//! [`IntrusionMonitor`] runs a debounced inside/outside state machine per
//! object against the perimeter [`Polygon`], and confirmed crossings come out
//! as [`AlertEvent`]s for the [`AlertDispatcher`] to log and snapshot.
//!
//! ```
//! use tripwire_rs::{Detection, IntrusionConfig, Point, Polygon, Session, TrackerConfig, Transition};
//!
//! let perimeter: Polygon = vec![
//!     Point::new(100, 0),
//!     Point::new(300, 0),
//!     Point::new(300, 300),
//!     Point::new(100, 300),
//! ]
//! .into();
//! let mut session = Session::new(perimeter, TrackerConfig::default(), IntrusionConfig::default());
//!
//! let outside = session.process(&[Detection::new(0.0, 0.0, 40.0, 100.0)]);
//! assert!(outside.events.is_empty());
//!
//! let inside = session.process(&[Detection::new(90.0, 0.0, 130.0, 100.0)]);
//! assert_eq!(inside.events[0].kind, Transition::Enter);
//! ```

pub mod alert;
pub mod config;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod intrusion;
pub mod replay;
pub mod session;
pub mod tracker;

pub use alert::{AlertConfig, AlertDispatcher, AlertPolicy};
pub use config::SessionConfig;
pub use error::{AlertError, AlertFailure, ConfigError, PipelineError, ReplayError};
pub use geometry::{Point, Polygon, point_in_polygon};
pub use integration::{DetectionBuilder, DetectionSource, IntoDetections, IntrusionPipeline};
pub use intrusion::{AlertEvent, IntrusionConfig, IntrusionMonitor, Transition};
pub use replay::{ReplaySummary, replay};
pub use session::{FrameReport, ObjectSnapshot, Session, SessionStats};
pub use tracker::{CentroidTracker, Detection, ObjectId, TrackerConfig, ZoneState};
