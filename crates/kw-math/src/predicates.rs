//! Degeneracy and orientation predicates for point and vector configurations.
//!
//! Boundary cases always resolve to the least committal answer: points
//! within tolerance of a plane are `Side::On` and never count as being on
//! the same side as anything.

use serde::{Deserialize, Serialize};

use crate::linalg::{count_non_zero_rows, matrix_from_rows, row_echelon_form};
use crate::{Plane, Point3, Vector3};

/// Relative direction of two parallel vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Parallelism {
    Opposite = -1,
    NotParallel = 0,
    Same = 1,
}

impl Parallelism {
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn is_parallel(self) -> bool {
        self != Parallelism::NotParallel
    }
}

/// Half-space classification of a point against a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Side {
    Negative = -1,
    On = 0,
    Positive = 1,
}

impl Side {
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    fn classify(offset: f64, tolerance: f64) -> Self {
        if offset > tolerance {
            Side::Positive
        } else if offset < -tolerance {
            Side::Negative
        } else {
            Side::On
        }
    }
}

/// Rank of the vectors from `points[0]` to every other point.
fn spread_rank(points: &[Point3], tolerance: f64) -> usize {
    let origin = points[0];
    let rows: Vec<Vector3> = points[1..].iter().map(|&p| p - origin).collect();
    let reduced = row_echelon_form(&matrix_from_rows(&rows), false, tolerance);
    count_non_zero_rows(&reduced, tolerance)
}

/// True when all points lie on one line. Fewer than three points always are.
pub fn is_collinear(points: &[Point3], tolerance: f64) -> bool {
    if points.len() < 3 {
        return true;
    }
    spread_rank(points, tolerance) < 2
}

/// True when all points lie in one plane. Fewer than four points always do.
pub fn is_coplanar(points: &[Point3], tolerance: f64) -> bool {
    if points.len() < 4 {
        return true;
    }
    spread_rank(points, tolerance) < 3
}

/// Parallelism test on `1 - |cos θ| <= angular_tolerance`.
///
/// Returns `None` when either vector has zero length, since no direction
/// can be compared.
pub fn is_parallel(v1: Vector3, v2: Vector3, angular_tolerance: f64) -> Option<Parallelism> {
    let a = v1.try_normalize()?;
    let b = v2.try_normalize()?;
    let dot = a.dot(b);
    if 1.0 - dot.abs() > angular_tolerance {
        return Some(Parallelism::NotParallel);
    }
    Some(if dot > 0.0 {
        Parallelism::Same
    } else {
        Parallelism::Opposite
    })
}

/// Angle between two vectors in `[0, π]`, `None` for a zero-length vector.
pub fn angle(v1: Vector3, v2: Vector3) -> Option<f64> {
    let a = v1.try_normalize()?;
    let b = v2.try_normalize()?;
    // Clamp so rounding can't push acos out of its domain
    Some(a.dot(b).clamp(-1.0, 1.0).acos())
}

/// True when both points lie strictly on the same side of `plane`.
pub fn same_side(point: Point3, plane: &Plane, other: Point3, tolerance: f64) -> bool {
    let a = Side::classify(plane.signed_offset(point), tolerance);
    let b = Side::classify(plane.signed_offset(other), tolerance);
    a != Side::On && a == b
}

/// True when every point lies strictly on the same side of `plane`.
///
/// Fewer than two points are vacuously on the same side, even if the one
/// point sits on the plane.
pub fn same_side_all(points: &[Point3], plane: &Plane, tolerance: f64) -> bool {
    let Some((&first, rest)) = points.split_first() else {
        return true;
    };
    rest.iter().all(|&p| same_side(first, plane, p, tolerance))
}

/// Classify each point as above, on, or below `plane` using `n · p + d`.
pub fn side(plane: &Plane, points: &[Point3], tolerance: f64) -> Vec<Side> {
    let d = plane.d();
    points
        .iter()
        .map(|&p| Side::classify(plane.normal.dot(p) + d, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_collinear_small_inputs() {
        assert!(is_collinear(&[], TOL));
        assert!(is_collinear(&[dvec3(1.0, 2.0, 3.0)], TOL));
        assert!(is_collinear(&[dvec3(1.0, 2.0, 3.0), dvec3(-4.0, 0.0, 9.0)], TOL));
    }

    #[test]
    fn test_collinear_points_on_parametrized_line() {
        let a = dvec3(1.0, -2.0, 0.5);
        let d = dvec3(0.3, 0.7, -1.1);
        let points: Vec<Point3> = [-3.0, 0.0, 0.25, 1.0, 8.0].iter().map(|&t| a + t * d).collect();
        assert!(is_collinear(&points, TOL));
    }

    #[test]
    fn test_not_collinear() {
        let points = [dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0), dvec3(0.0, 1.0, 0.0)];
        assert!(!is_collinear(&points, TOL));
    }

    #[test]
    fn test_coincident_points_are_collinear_and_coplanar() {
        let p = dvec3(2.0, 2.0, 2.0);
        assert!(is_collinear(&[p, p, p, p], TOL));
        assert!(is_coplanar(&[p, p, p, p, p], TOL));
    }

    #[test]
    fn test_coplanar_affine_combination() {
        let a = dvec3(0.0, 0.0, 1.0);
        let b = dvec3(2.0, 1.0, 0.0);
        let c = dvec3(-1.0, 3.0, 2.0);
        let d = a + 0.4 * (b - a) - 1.7 * (c - a);
        assert!(is_coplanar(&[a, b, c, d], TOL));
        assert!(is_coplanar(&[a, b, c], TOL));
    }

    #[test]
    fn test_not_coplanar() {
        let points = [Point3::ZERO, Vector3::X, Vector3::Y, Vector3::Z];
        assert!(!is_coplanar(&points, TOL));
    }

    #[test]
    fn test_is_parallel() {
        let v = dvec3(1.0, 2.0, 3.0);
        assert_eq!(is_parallel(v, v, TOL), Some(Parallelism::Same));
        assert_eq!(is_parallel(v, 5.0 * v, TOL), Some(Parallelism::Same));
        assert_eq!(is_parallel(v, -v, TOL), Some(Parallelism::Opposite));
        assert_eq!(is_parallel(v, v.any_orthogonal_vector(), TOL), Some(Parallelism::NotParallel));
        assert_eq!(is_parallel(v, -v, TOL).map(Parallelism::as_i8), Some(-1));
    }

    #[test]
    fn test_is_parallel_rejects_zero_vector() {
        assert_eq!(is_parallel(Vector3::ZERO, Vector3::X, TOL), None);
        assert_eq!(is_parallel(Vector3::X, Vector3::ZERO, TOL), None);
    }

    #[test]
    fn test_angle() {
        let v = dvec3(-2.0, 0.5, 1.0);
        assert_relative_eq!(angle(v, v).unwrap(), 0.0, epsilon = 1e-7);
        assert_relative_eq!(angle(v, -v).unwrap(), PI, epsilon = 1e-7);
        assert_relative_eq!(angle(Vector3::X, Vector3::Y).unwrap(), PI / 2.0, epsilon = 1e-12);
        assert!(angle(v, Vector3::ZERO).is_none());
    }

    #[test]
    fn test_same_side() {
        let plane = Plane::xy();
        assert!(same_side(dvec3(1.0, 1.0, 1.0), &plane, dvec3(-5.0, 0.0, 0.2), TOL));
        assert!(same_side(dvec3(1.0, 1.0, -1.0), &plane, dvec3(-5.0, 0.0, -0.2), TOL));
        assert!(!same_side(dvec3(1.0, 1.0, 1.0), &plane, dvec3(0.0, 0.0, -1.0), TOL));
        // On-plane points never share a side
        assert!(!same_side(dvec3(1.0, 1.0, 0.0), &plane, dvec3(0.0, 0.0, 1.0), TOL));
        assert!(!same_side(dvec3(1.0, 1.0, 1e-9), &plane, dvec3(0.0, 0.0, 1e-9), TOL));
    }

    #[test]
    fn test_same_side_all() {
        let plane = Plane::new(dvec3(0.0, 0.0, 1.0), Vector3::Z);
        assert!(same_side_all(&[], &plane, TOL));
        assert!(same_side_all(&[dvec3(0.0, 0.0, 1.0)], &plane, TOL));
        assert!(same_side_all(&[dvec3(0.0, 0.0, 2.0), dvec3(3.0, 1.0, 1.5)], &plane, TOL));
        assert!(!same_side_all(&[dvec3(0.0, 0.0, 2.0), dvec3(3.0, 1.0, 0.5)], &plane, TOL));
        assert!(!same_side_all(&[dvec3(0.0, 0.0, 2.0), dvec3(3.0, 1.0, 1.0)], &plane, TOL));
    }

    #[test]
    fn test_side_classification() {
        let plane = Plane::new(dvec3(0.0, 0.0, 1.0), Vector3::Z);
        let sides = side(
            &plane,
            &[dvec3(0.0, 0.0, 3.0), dvec3(1.0, 1.0, 1.0), dvec3(0.0, 0.0, -2.0), dvec3(0.0, 0.0, 1.0 + 1e-8)],
            TOL,
        );
        assert_eq!(sides, vec![Side::Positive, Side::On, Side::Negative, Side::On]);
        let signs: Vec<i8> = sides.into_iter().map(Side::as_i8).collect();
        assert_eq!(signs, vec![1, 0, -1, 0]);
    }
}
