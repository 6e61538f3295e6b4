use crate::geometry::Point;

/// Share of the box height the centroid is pushed down by.
///
/// Moves the reference point from the torso towards the feet, which is what
/// actually crosses a ground-level perimeter.
pub const CENTROID_BIAS: f64 = 0.2;

/// Axis-aligned bounding box representation with format conversion utilities.
///
/// Supports two common bounding box formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (min x, min y, max x, max y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the geometric center of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether every coordinate is finite and the extent is not negative.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Tracking reference point of the box, see [`tlbr_centroid`].
    ///
    /// # Panics
    /// If the box is not [well formed](Rect::is_well_formed).
    pub fn centroid(&self) -> Point {
        assert!(self.is_well_formed(), "malformed detection box: {self:?}");
        tlbr_centroid(self.to_tlbr())
    }
}

/// Tracking reference point of a `[min x, min y, max x, max y]` box.
///
/// Horizontally centered, vertically the center plus [`CENTROID_BIAS`] of
/// the height. Both coordinates are truncated towards zero.
///
/// # Panics
/// If a coordinate is not finite or a max is below its min.
pub fn tlbr_centroid(tlbr: [f32; 4]) -> Point {
    let [x1, y1, x2, y2] = tlbr.map(f64::from);
    assert!(
        tlbr.iter().all(|v| v.is_finite()) && x1 <= x2 && y1 <= y2,
        "malformed detection box: {tlbr:?}"
    );

    let cx = (x1 + x2) / 2.0;
    let cy = (y1 + y2) / 2.0 + (y2 - y1) * CENTROID_BIAS;
    Point::new(cx.trunc() as i32, cy.trunc() as i32)
}
