//! Polyline curve.

use kw_core::{KwError, Result};
use kw_math::{Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::numeric::push_unique;
use super::{Curve, Line};

/// Connected straight segments through `points`, parameterized over
/// `[0, points.len() - 1]` with one unit of parameter per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3>,
}

impl Polyline {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// Segment index and local `[0, 1]` parameter for a global parameter.
    fn locate(&self, t: f64) -> (usize, f64) {
        let last = self.segment_count().saturating_sub(1);
        let index = (t.max(0.0).floor() as usize).min(last);
        (index, t - index as f64)
    }
}

impl Curve for Polyline {
    fn point_at(&self, t: f64) -> Point3 {
        match self.points.len() {
            0 => Point3::NAN,
            1 => self.points[0],
            _ => {
                let (i, local) = self.locate(t);
                self.points[i].lerp(self.points[i + 1], local)
            }
        }
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        if self.points.len() < 2 {
            return Vector3::ZERO;
        }
        let (i, _) = self.locate(t);
        self.points[i + 1] - self.points[i]
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.segment_count() as f64)
    }

    fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
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
        let mut remaining = length;
        for segment in self.segments() {
            let l = segment.length();
            if remaining <= l {
                return segment.point_at_length(remaining);
            }
            remaining -= l;
        }
        // Rounding left a sliver past the last segment
        Ok(self.end_point())
    }

    fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.points).unwrap_or_else(|| Aabb3::new(Point3::NAN, Point3::NAN))
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        if self.points.len() == 1 {
            return self.points[0];
        }
        self.segments()
            .map(|s| s.closest_point(point))
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
            .unwrap_or(Point3::NAN)
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let mut points = Vec::new();
        for segment in self.segments() {
            for p in segment.plane_intersections(plane, tolerance) {
                push_unique(&mut points, p, tolerance);
            }
        }
        points
    }
}
