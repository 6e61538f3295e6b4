//! Planar geometry for perimeter containment.
//!
//! Coordinates are integer pixel positions, so the containment test is
//! evaluated with exact integer arithmetic and boundary hits are reliable.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point as a floating point `nalgebra` point.
    #[inline]
    pub fn to_point2(self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        nalgebra::distance(&self.to_point2(), &other.to_point2())
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Closed polygon given by its vertices in drawing order.
///
/// The last vertex connects back to the first. Fewer than three vertices
/// describe no area and contain nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the polygon has enough vertices to enclose anything.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Boundary-inclusive containment, see [`point_in_polygon`].
    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, self)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Self::new(vertices)
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Test whether `point` lies inside `polygon` or on its boundary.
///
/// Uses ray casting (crossing number) after an explicit on-edge check.
/// Polygons with fewer than three vertices always return `false`.
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return false;
    }

    let (px, py) = (point.x as i64, point.y as i64);
    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if on_segment(point, a, b) {
            return true;
        }

        let (ax, ay) = (a.x as i64, a.y as i64);
        let (bx, by) = (b.x as i64, b.y as i64);
        if (ay > py) != (by > py) {
            // px < ax + (bx - ax) * (py - ay) / (by - ay), without the division
            let lhs = (px - ax) * (by - ay);
            let rhs = (bx - ax) * (py - ay);
            let crosses = if by > ay { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let (px, py) = (p.x as i64, p.y as i64);
    let (ax, ay) = (a.x as i64, a.y as i64);
    let (bx, by) = (b.x as i64, b.y as i64);

    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    cross == 0 && px >= ax.min(bx) && px <= ax.max(bx) && py >= ay.min(by) && py <= ay.max(by)
}
