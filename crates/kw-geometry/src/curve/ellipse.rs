//! Ellipse curve.

use std::f64::consts::TAU;

use kw_math::{Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::conic::plane_crossing_angles;
use super::numeric::push_unique;
use super::Curve;

/// An ellipse in 3D space, parameterized over `[0, 2*PI]`.
///
/// Defined by center, normal, major axis direction, and minor radius.
/// The major radius is the length of `major_axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point3,
    pub normal: Vector3,
    pub major_axis: Vector3,
    pub minor_radius: f64,
}

impl Ellipse {
    pub fn new(center: Point3, normal: Vector3, major_axis: Vector3, minor_radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            major_axis,
            minor_radius,
        }
    }

    /// Major radius (length of major_axis).
    pub fn major_radius(&self) -> f64 {
        self.major_axis.length()
    }

    /// Minor axis direction (perpendicular to both normal and major axis).
    fn minor_axis(&self) -> Vector3 {
        self.normal.cross(self.major_axis).normalize()
    }
}

impl Curve for Ellipse {
    fn point_at(&self, t: f64) -> Point3 {
        let u = self.major_axis;
        let v = self.minor_axis() * self.minor_radius;
        self.center + t.cos() * u + t.sin() * v
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let u = self.major_axis;
        let v = self.minor_axis() * self.minor_radius;
        -t.sin() * u + t.cos() * v
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        let v = self.minor_axis() * self.minor_radius;
        let mut points = Vec::new();
        for t in plane_crossing_angles(self.center, self.major_axis, v, &plane, tolerance) {
            push_unique(&mut points, self.point_at(t), tolerance);
        }
        points
    }
}
