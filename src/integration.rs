//! Integration module for connecting object detection backends with the
//! tripwire session and its alert outputs.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::IntrusionPipeline;
