use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and normal.
///
/// The normal is stored as given. Queries that need a unit normal call
/// [`Plane::unitized`] and handle the `None` case themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self { origin, normal }
    }

    pub fn xy() -> Self {
        Self::new(Point3::ZERO, Vector3::Z)
    }

    pub fn xz() -> Self {
        Self::new(Point3::ZERO, Vector3::Y)
    }

    pub fn yz() -> Self {
        Self::new(Point3::ZERO, Vector3::X)
    }

    /// Same plane with a unit-length normal, or `None` for a zero normal.
    pub fn unitized(&self) -> Option<Self> {
        Some(Self::new(self.origin, self.normal.try_normalize()?))
    }

    /// The `d` of the implicit form `n · p + d = 0`.
    pub fn d(&self) -> f64 {
        -self.normal.dot(self.origin)
    }

    /// `n · (p - origin)`: the signed distance when the normal is unit length,
    /// a scaled proxy of it otherwise.
    pub fn signed_offset(&self, point: Point3) -> f64 {
        self.normal.dot(point - self.origin)
    }

    /// Plane moved by `distance` along its unit normal.
    pub fn translated(&self, distance: f64) -> Option<Self> {
        let unit = self.normal.try_normalize()?;
        Some(Self::new(self.origin + unit * distance, self.normal))
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Option<Point3> {
        let unit = self.normal.try_normalize()?;
        Some(point - unit * unit.dot(point - self.origin))
    }

    /// Orthonormal pair `(u, v)` spanning the plane, with `u × v` along the normal.
    pub fn basis(&self) -> Option<(Vector3, Vector3)> {
        let n = self.normal.try_normalize()?;
        Some(orthonormal_frame(n))
    }
}

/// In-plane frame for a unit normal `n`.
pub fn orthonormal_frame(n: Vector3) -> (Vector3, Vector3) {
    // Pick the helper axis farthest from the normal
    let helper = if n.x.abs() < 0.9 { Vector3::X } else { Vector3::Y };
    let v = n.cross(helper).normalize();
    let u = v.cross(n);
    (u, v)
}
