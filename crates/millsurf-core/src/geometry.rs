//! Geometry primitives for toolpath simulation
//!
//! All coordinates are millimetres in the machine's work coordinate system.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D point in millimetres
pub type Point3 = DVec3;

/// How a segment was commanded
///
/// Rapid and linear moves are rasterized identically; the distinction is kept
/// for statistics and logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionKind {
    /// Positioning move (G0)
    Rapid,
    /// Cutting move at feed rate (G1)
    Linear,
}

/// Straight tool motion between two fully resolved positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSegment {
    pub start: Point3,
    pub end: Point3,
    pub kind: MotionKind,
}

impl MotionSegment {
    pub fn new(start: Point3, end: Point3, kind: MotionKind) -> Self {
        Self { start, end, kind }
    }

    /// Euclidean length in 3D
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Lowest tool-tip Z reached along the segment
    pub fn min_z(&self) -> f64 {
        self.start.z.min(self.end.z)
    }

    /// Position at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Point3 {
        self.start.lerp(self.end, t)
    }
}

/// One discretized tool-tip position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for SamplePoint {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// Bounding box accumulator used while sizing the height map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
            min_z: f64::MAX,
            max_z: f64::MIN,
        }
    }

    /// Degenerate box holding only the origin
    pub fn origin() -> Self {
        let mut bounds = Self::new();
        bounds.update(Point3::ZERO);
        bounds
    }

    /// Bounds of every endpoint of the given segments, or `None` when empty
    pub fn from_segments<'a, I>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a MotionSegment>,
    {
        let mut bounds = Self::new();
        for segment in segments {
            bounds.update(segment.start);
            bounds.update(segment.end);
        }
        bounds.is_valid().then_some(bounds)
    }

    pub fn update(&mut self, p: Point3) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
        self.min_z = self.min_z.min(p.z);
        self.max_z = self.max_z.max(p.z);
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
            // A single plane (min_z == max_z) is valid
            && self.min_z <= self.max_z
    }

    /// Grow the XY extent by `margin` on every side; Z is unchanged
    pub fn padded_xy(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
            ..*self
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
