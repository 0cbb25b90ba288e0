//! Composite curve made of consecutive sub-curves.

use kw_core::{KwError, Result};
use kw_math::{Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::numeric::push_unique;
use super::{Curve, CurveKind};

/// Ordered sub-curves, parameterized over `[0, curves.len()]`: sub-curve
/// `k` covers `[k, k + 1]`, mapped linearly onto its own domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyCurve {
    pub curves: Vec<CurveKind>,
}

impl PolyCurve {
    pub fn new(curves: Vec<CurveKind>) -> Self {
        Self { curves }
    }

    /// Sub-curve, its local parameter and `d(local)/d(t)` for global `t`.
    fn locate(&self, t: f64) -> Option<(&CurveKind, f64, f64)> {
        let last = self.curves.len().checked_sub(1)?;
        let index = (t.max(0.0).floor() as usize).min(last);
        let curve = &self.curves[index];
        let (min, max) = curve.domain();
        let scale = max - min;
        Some((curve, min + (t - index as f64) * scale, scale))
    }
}

impl Curve for PolyCurve {
    fn point_at(&self, t: f64) -> Point3 {
        match self.locate(t) {
            Some((curve, local, _)) => curve.point_at(local),
            None => Point3::NAN,
        }
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        match self.locate(t) {
            Some((curve, local, scale)) => curve.tangent_at(local) * scale,
            None => Vector3::ZERO,
        }
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.curves.len() as f64)
    }

    fn is_closed(&self) -> bool {
        match (self.curves.first(), self.curves.last()) {
            (Some(first), Some(last)) => first.start_point().distance(last.end_point()) <= f64::EPSILON,
            _ => false,
        }
    }

    fn length(&self) -> f64 {
        self.curves.iter().map(|c| c.length()).sum()
    }

    fn point_at_length(&self, length: f64) -> Result<Point3> {
        let lengths: Vec<f64> = self.curves.iter().map(|c| c.length()).collect();
        let total: f64 = lengths.iter().sum();
        if !(0.0..=total).contains(&length) {
            return Err(KwError::ParameterOutOfRange {
                parameter: length,
                min: 0.0,
                max: total,
            });
        }
        let mut remaining = length;
        for (curve, l) in self.curves.iter().zip(lengths) {
            if remaining <= l {
                return curve.point_at_length(remaining.min(curve.length()));
            }
            remaining -= l;
        }
        Ok(self.end_point())
    }

    fn bounding_box(&self) -> Aabb3 {
        self.curves
            .iter()
            .map(|c| c.bounding_box())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Aabb3::new(Point3::NAN, Point3::NAN))
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        self.curves
            .iter()
            .map(|c| c.closest_point(point))
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
            .unwrap_or(Point3::NAN)
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        let mut points = Vec::new();
        for curve in &self.curves {
            for p in curve.plane_intersections(plane, tolerance) {
                push_unique(&mut points, p, tolerance);
            }
        }
        points
    }
}
