//! Circular arc curve.

use std::f64::consts::TAU;

use kw_core::{KwError, Result, Validate};
use kw_math::predicates::is_collinear;
use kw_math::{orthonormal_frame, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::conic::{angle_in_frame, plane_crossing_angles};
use super::numeric::push_unique;
use super::Curve;

/// A circular arc, parameterized by angle over `[start_angle, end_angle]`.
///
/// Angles are measured counter-clockwise about `normal` in the same frame
/// a [`super::Circle`] with this center and normal uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub normal: Vector3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point3, normal: Vector3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Arc from `start` through `mid` to `end`. `None` when the three points
    /// are collinear within `tolerance`.
    pub fn from_three_points(start: Point3, mid: Point3, end: Point3, tolerance: f64) -> Option<Self> {
        if is_collinear(&[start, mid, end], tolerance) {
            return None;
        }
        let ab = mid - start;
        let ac = end - start;
        let n = ab.cross(ac);
        let n_sq = n.length_squared();
        if n_sq == 0.0 {
            return None;
        }
        let center = start + (ac.length_squared() * n.cross(ab) + ab.length_squared() * ac.cross(n)) / (2.0 * n_sq);
        let radius = start.distance(center);

        // ab × ac orients the sweep start -> mid -> end counter-clockwise
        let normal = n / n_sq.sqrt();
        let (u, v) = orthonormal_frame(normal);
        let start_angle = angle_in_frame(start - center, u, v);
        let sweep = (angle_in_frame(end - center, u, v) - start_angle).rem_euclid(TAU);
        Some(Self::new(center, normal, radius, start_angle, start_angle + sweep))
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn local_frame(&self) -> (Vector3, Vector3) {
        orthonormal_frame(self.normal)
    }

    /// Parameter of the arc matching angle `theta`, if the arc covers it
    /// within `angular_slack` radians.
    fn parameter_of_angle(&self, theta: f64, angular_slack: f64) -> Option<f64> {
        let offset = (theta - self.start_angle).rem_euclid(TAU);
        if offset <= self.sweep() + angular_slack {
            Some(self.start_angle + offset.min(self.sweep()))
        } else if TAU - offset <= angular_slack {
            Some(self.start_angle)
        } else {
            None
        }
    }
}

impl Validate for Arc {
    fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0) {
            return Err(KwError::Geometry(format!("arc radius must be positive, got {}", self.radius)));
        }
        if !self.normal.is_finite() {
            return Err(KwError::Geometry("arc normal is degenerate".into()));
        }
        let sweep = self.sweep();
        if !(sweep > 0.0 && sweep <= TAU) {
            return Err(KwError::Geometry(format!("arc sweep must be in (0, 2π], got {}", sweep)));
        }
        Ok(())
    }
}

impl Curve for Arc {
    fn point_at(&self, t: f64) -> Point3 {
        let (u, v) = self.local_frame();
        self.center + self.radius * (t.cos() * u + t.sin() * v)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let (u, v) = self.local_frame();
        self.radius * (-t.sin() * u + t.cos() * v)
    }

    fn domain(&self) -> (f64, f64) {
        (self.start_angle, self.end_angle)
    }

    fn is_closed(&self) -> bool {
        self.sweep() >= TAU
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep()
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
        Ok(self.point_at(self.start_angle + length / self.radius))
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        let (u, v) = self.local_frame();
        let radial = point - self.center;
        let in_plane = radial - self.normal * self.normal.dot(radial);
        if in_plane.length_squared() > 0.0 {
            if let Some(t) = self.parameter_of_angle(angle_in_frame(in_plane, u, v), 0.0) {
                return self.point_at(t);
            }
        }
        let (start, end) = (self.start_point(), self.end_point());
        if start.distance_squared(point) <= end.distance_squared(point) {
            start
        } else {
            end
        }
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        let (u, v) = self.local_frame();
        let slack = tolerance / self.radius;
        let mut params: Vec<f64> = plane_crossing_angles(self.center, self.radius * u, self.radius * v, &plane, tolerance)
            .into_iter()
            .filter_map(|theta| self.parameter_of_angle(theta, slack))
            .collect();
        params.sort_by(f64::total_cmp);

        let mut points = Vec::new();
        for t in params {
            push_unique(&mut points, self.point_at(t), tolerance);
        }
        points
    }
}
