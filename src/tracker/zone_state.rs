use serde::{Deserialize, Serialize};

/// Position of a tracked object relative to the perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneState {
    /// Outside the perimeter, the state every object is registered with
    #[default]
    Outside,
    /// Inside the perimeter or on its boundary
    Inside,
}

impl ZoneState {
    pub fn from_containment(is_inside: bool) -> Self {
        if is_inside { Self::Inside } else { Self::Outside }
    }

    pub fn is_inside(self) -> bool {
        self == Self::Inside
    }
}

impl std::fmt::Display for ZoneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outside => f.write_str("OUTSIDE"),
            Self::Inside => f.write_str("INSIDE"),
        }
    }
}
