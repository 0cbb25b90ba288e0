//! Curve traits and implementations.

mod arc;
mod circle;
mod conic;
mod ellipse;
mod kind;
mod line;
mod nurbs;
pub(crate) mod numeric;
mod polycurve;
mod polyline;

use kw_core::{KwError, Result};
use kw_math::{Aabb3, Plane, Point3, Vector3};

use crate::sample;

pub use arc::Arc;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use kind::CurveKind;
pub use line::Line;
pub use nurbs::NurbsCurve;
pub use polycurve::PolyCurve;
pub use polyline::Polyline;

/// Trait for parametric curves in 3D space.
///
/// Only evaluation and the domain are required. The provided query methods
/// fall back to sampling, and every kind with a closed form overrides them.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        false
    }

    fn start_point(&self) -> Point3 {
        self.point_at(self.domain().0)
    }

    fn end_point(&self) -> Point3 {
        self.point_at(self.domain().1)
    }

    /// Like [`Curve::point_at`], but rejects parameters outside the domain.
    fn point_at_checked(&self, t: f64) -> Result<Point3> {
        let (min, max) = self.domain();
        if !(min..=max).contains(&t) {
            return Err(KwError::ParameterOutOfRange {
                parameter: t,
                min,
                max,
            });
        }
        Ok(self.point_at(t))
    }

    /// Arc length of the whole curve.
    fn length(&self) -> f64 {
        sample::polyline_length(&sample::curve_to_polyline(self, sample::LENGTH_CHORD_TOLERANCE))
    }

    /// Point at arc length `length` from the start.
    fn point_at_length(&self, length: f64) -> Result<Point3> {
        Ok(self.point_at(sample::length_to_parameter(self, length)?))
    }

    fn bounding_box(&self) -> Aabb3 {
        let points = sample::curve_to_polyline(self, sample::BOUNDS_CHORD_TOLERANCE);
        let start = self.start_point();
        Aabb3::from_points(&points)
            .unwrap_or_else(|| Aabb3::new(start, start))
            .expand(sample::BOUNDS_CHORD_TOLERANCE)
    }

    /// Closest point on the curve to `point`.
    fn closest_point(&self, point: Point3) -> Point3 {
        numeric::sampled_closest_point(self, point, numeric::DEFAULT_SAMPLES)
    }

    /// Points where the curve meets `plane`, in parameter order.
    ///
    /// Crossings are found where the signed offset changes sign between
    /// samples or lies within `tolerance`. A plane with a zero normal meets
    /// nothing.
    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        numeric::sampled_plane_crossings(self, &plane, tolerance, numeric::DEFAULT_SAMPLES)
    }
}
