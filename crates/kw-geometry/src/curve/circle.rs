//! Circle curve.

use std::f64::consts::{PI, TAU};

use kw_core::{KwError, Result};
use kw_math::{orthonormal_frame, Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::conic::{angle_in_frame, plane_crossing_angles};
use super::numeric::push_unique;
use super::Curve;

/// A circle in 3D space, parameterized over `[0, 2*PI]`.
///
/// The circle lies in the plane defined by `center` and `normal`,
/// with the reference direction for `t=0` computed from the normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point3,
    pub normal: Vector3,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point3, normal: Vector3, radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            radius,
        }
    }

    /// Orthonormal frame `(u, v)` in the circle plane; `t = 0` lies along `u`.
    pub fn local_frame(&self) -> (Vector3, Vector3) {
        orthonormal_frame(self.normal)
    }

    /// Parameter of the point on the circle nearest to `point`'s direction.
    /// A point on the axis has no direction and maps to `0`.
    pub(crate) fn angle_of(&self, point: Point3) -> f64 {
        let (u, v) = self.local_frame();
        let radial = point - self.center;
        let in_plane = radial - self.normal * self.normal.dot(radial);
        if in_plane.length_squared() == 0.0 {
            return 0.0;
        }
        angle_in_frame(in_plane, u, v)
    }
}

impl Curve for Circle {
    fn point_at(&self, t: f64) -> Point3 {
        let (u, v) = self.local_frame();
        self.center + self.radius * (t.cos() * u + t.sin() * v)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let (u, v) = self.local_frame();
        self.radius * (-t.sin() * u + t.cos() * v)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn length(&self) -> f64 {
        TAU * self.radius
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
        Ok(self.point_at(length / self.radius))
    }

    fn bounding_box(&self) -> Aabb3 {
        // Half-extent along axis i is r * sqrt(1 - n_i^2)
        let n = self.normal;
        let half = self.radius * (Vector3::ONE - n * n).max(Vector3::ZERO).powf(0.5);
        Aabb3::new(self.center - half, self.center + half)
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        self.point_at(self.angle_of(point))
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        let (u, v) = self.local_frame();
        let mut points = Vec::new();
        for t in plane_crossing_angles(self.center, self.radius * u, self.radius * v, &plane, tolerance) {
            push_unique(&mut points, self.point_at(t), tolerance);
        }
        points
    }
}
