//! Line segment curve.

use kw_core::{KwError, Result};
use kw_math::{Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A line segment from `start` to `end`, parameterized over `[0, 1]`.
///
/// The same value doubles as an infinite line through both points wherever
/// a query takes a `use_infinite` flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// `end - start`, not normalized.
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.start.distance(self.end) <= tolerance
    }

    /// Parameter of the projection of `point`, clamped to `[0, 1]` unless
    /// `infinite`. A zero-length line projects everything onto its start.
    pub fn closest_parameter(&self, point: Point3, infinite: bool) -> f64 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        let t = (point - self.start).dot(dir) / len_sq;
        if infinite {
            t
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    pub fn closest_point_on(&self, point: Point3, infinite: bool) -> Point3 {
        self.point_at(self.closest_parameter(point, infinite))
    }
}

impl Curve for Line {
    fn point_at(&self, t: f64) -> Point3 {
        self.start + t * (self.end - self.start)
    }

    fn tangent_at(&self, _t: f64) -> Vector3 {
        self.end - self.start
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    fn point_at_length(&self, length: f64) -> Result<Point3> {
        let total = self.length();
        if !(0.0..=total).contains(&length) {
            return Err(KwError::ParameterOutOfRange {
                parameter: length,
                min: 0.0,
                max: total,
            });
        }
        if total == 0.0 {
            return Ok(self.start);
        }
        Ok(self.point_at(length / total))
    }

    fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_corners(self.start, self.end)
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        self.closest_point_on(point, false)
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        let d0 = plane.signed_offset(self.start);
        let d1 = plane.signed_offset(self.end);
        match (d0.abs() <= tolerance, d1.abs() <= tolerance) {
            // Lying in the plane is not a crossing
            (true, true) => Vec::new(),
            (true, false) => vec![self.start],
            (false, true) => vec![self.end],
            (false, false) if (d0 > 0.0) != (d1 > 0.0) => {
                vec![self.point_at(d0 / (d0 - d1))]
            }
            (false, false) => Vec::new(),
        }
    }
}
