//! Session configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alert::AlertConfig;
use crate::error::ConfigError;
use crate::geometry::Polygon;
use crate::intrusion::IntrusionConfig;
use crate::tracker::TrackerConfig;

/// Everything needed to run one session.
///
/// Missing fields take their defaults, so `{}` is a valid (if perimeter-less)
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Perimeter vertices as `[x, y]` pairs in drawing order
    pub perimeter: Polygon,
    pub tracker: TrackerConfig,
    pub intrusion: IntrusionConfig,
    pub alert: AlertConfig,
    /// Only every `frame_stride`-th frame is processed
    pub frame_stride: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            perimeter: Polygon::default(),
            tracker: TrackerConfig::default(),
            intrusion: IntrusionConfig::default(),
            alert: AlertConfig::default(),
            frame_stride: 1,
        }
    }
}

impl SessionConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intrusion.debounce_frames == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.frame_stride == 0 {
            return Err(ConfigError::ZeroFrameStride);
        }
        if let Some(d) = self.tracker.max_distance {
            if !d.is_finite() || d <= 0.0 {
                return Err(ConfigError::InvalidMaxDistance(d));
            }
        }
        Ok(())
    }
}
