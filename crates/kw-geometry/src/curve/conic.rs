//! Shared closed forms for curves of the shape `c + cos t · u + sin t · v`.

use std::f64::consts::TAU;

use kw_math::{Plane, Point3, Vector3};

/// Angles in `[0, 2π)` where `center + cos t · u + sin t · v` meets `plane`.
///
/// `plane` must have a unit normal. A conic lying parallel to the plane
/// yields nothing, coplanar or not. Tangential contact yields both
/// (coincident) roots; callers deduplicate at the point level.
pub(crate) fn plane_crossing_angles(center: Point3, u: Vector3, v: Vector3, plane: &Plane, tolerance: f64) -> Vec<f64> {
    // offset(t) = d0 + a cos t + b sin t = d0 + r cos(t - phi)
    let d0 = plane.signed_offset(center);
    let a = plane.normal.dot(u);
    let b = plane.normal.dot(v);
    let r = a.hypot(b);
    if r <= tolerance {
        return Vec::new();
    }
    let c = -d0 / r;
    if c.abs() > 1.0 + tolerance / r {
        return Vec::new();
    }
    let phi = b.atan2(a);
    let delta = c.clamp(-1.0, 1.0).acos();
    vec![(phi - delta).rem_euclid(TAU), (phi + delta).rem_euclid(TAU)]
}

/// Angle of `direction` in the frame `(u, v)`, in `[0, 2π)`.
pub(crate) fn angle_in_frame(direction: Vector3, u: Vector3, v: Vector3) -> f64 {
    direction.dot(v).atan2(direction.dot(u)).rem_euclid(TAU)
}
