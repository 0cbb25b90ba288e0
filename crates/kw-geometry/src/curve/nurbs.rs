//! NURBS curve.

use kw_core::{KwError, Result, Validate};
use kw_math::{Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::numeric::{sampled_closest_point, sampled_plane_crossings};
use super::Curve;
use crate::nurbs::{eval, KnotVector};

/// A NURBS (Non-Uniform Rational B-Spline) curve on a clamped knot vector.
///
/// The degree is implied by the lengths: `knots.len() == control_points.len() + degree + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NurbsCurveFields")]
pub struct NurbsCurve {
    pub control_points: Vec<Point3>,
    pub weights: Vec<f64>,
    pub knots: KnotVector,
}

/// Unchecked serialized form; every load goes through [`NurbsCurve::new`].
#[derive(Deserialize)]
struct NurbsCurveFields {
    control_points: Vec<Point3>,
    weights: Vec<f64>,
    knots: KnotVector,
}

impl TryFrom<NurbsCurveFields> for NurbsCurve {
    type Error = KwError;

    fn try_from(fields: NurbsCurveFields) -> Result<Self> {
        Self::new(fields.control_points, fields.weights, fields.knots)
    }
}

impl NurbsCurve {
    pub fn new(control_points: Vec<Point3>, weights: Vec<f64>, knots: KnotVector) -> Result<Self> {
        let curve = Self {
            control_points,
            weights,
            knots,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// All weights 1.
    pub fn non_rational(control_points: Vec<Point3>, knots: KnotVector) -> Result<Self> {
        let weights = vec![1.0; control_points.len()];
        Self::new(control_points, weights, knots)
    }

    /// Non-rational curve on a clamped uniform knot vector.
    pub fn clamped(degree: usize, control_points: Vec<Point3>) -> Result<Self> {
        let knots = KnotVector::clamped_uniform(degree, control_points.len())?;
        Self::non_rational(control_points, knots)
    }

    pub fn degree(&self) -> usize {
        self.knots.len().saturating_sub(self.control_points.len() + 1)
    }

    pub fn is_rational(&self) -> bool {
        self.weights.windows(2).any(|w| w[0] != w[1])
    }

    fn samples(&self) -> usize {
        8 * self.control_points.len().max(8)
    }

    fn clamp_parameter(&self, t: f64) -> f64 {
        let (min, max) = self.domain();
        t.clamp(min, max)
    }
}

impl Validate for NurbsCurve {
    fn validate(&self) -> Result<()> {
        let cps = self.control_points.len();
        if self.knots.len() <= cps + 1 {
            return Err(KwError::Geometry(format!(
                "knot vector length must be control points + degree + 1 with degree >= 1, got {} knots for {} control points",
                self.knots.len(),
                cps
            )));
        }
        let degree = self.degree();
        if cps <= degree {
            return Err(KwError::Geometry(format!(
                "a degree {} curve needs at least {} control points, got {}",
                degree,
                degree + 1,
                cps
            )));
        }
        if self.weights.len() != cps {
            return Err(KwError::InvalidArgument(format!(
                "expected {} weights, got {}",
                cps,
                self.weights.len()
            )));
        }
        if let Some(bad) = self.weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(KwError::Geometry(format!(
                "weight {} must be positive and finite, got {}",
                bad, self.weights[bad]
            )));
        }
        let knots = self.knots.as_slice();
        let clamped_start = knots[..=degree].iter().all(|&k| k == knots[0]);
        let clamped_end = knots[knots.len() - degree - 1..].iter().all(|&k| k == knots[knots.len() - 1]);
        if !(clamped_start && clamped_end) {
            return Err(KwError::Geometry(format!(
                "knot vector is not clamped for degree {}",
                degree
            )));
        }
        let (min, max) = self.domain();
        if !(max > min) {
            return Err(KwError::Geometry("knot vector has an empty domain".into()));
        }
        Ok(())
    }
}

impl Curve for NurbsCurve {
    fn point_at(&self, t: f64) -> Point3 {
        eval::curve_point(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            self.clamp_parameter(t),
        )
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        eval::curve_tangent(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            self.clamp_parameter(t),
        )
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.degree())
    }

    fn is_closed(&self) -> bool {
        match (self.control_points.first(), self.control_points.last()) {
            (Some(first), Some(last)) => self.control_points.len() > 2 && first == last,
            _ => false,
        }
    }

    /// Control hull box. Positive weights keep the curve inside it.
    fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.control_points).unwrap_or_else(|| Aabb3::new(Point3::ZERO, Point3::ZERO))
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        sampled_closest_point(self, point, self.samples())
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let Some(plane) = plane.unitized() else {
            return Vec::new();
        };
        sampled_plane_crossings(self, &plane, tolerance, self.samples())
    }
}
