//! Rational B-spline (NURBS) curve evaluation on top of the Cox–de Boor basis.
//!
//! All functions assume a clamped knot vector with
//! `knots.len() == control_points.len() + degree + 1` and matching weights.

use kw_math::{Point3, Vector3};

use super::basis::BasisEvaluator;
use super::knot::find_span;

/// Evaluate a NURBS curve point at parameter `t`.
///
/// The half-open basis vanishes at the last knot, so the domain end is
/// answered by the interpolated last control point.
pub fn curve_point(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    t: f64,
) -> Point3 {
    let last = control_points.len() - 1;
    if t >= knots[last + 1] {
        return control_points[last];
    }

    let span = find_span(degree, knots, t);
    let mut eval = BasisEvaluator::new(knots, t);

    let mut point = Vector3::ZERO;
    let mut w = 0.0;
    for i in span - degree..=span {
        let bw = eval.basis(i, degree) * weights[i];
        point += bw * control_points[i];
        w += bw;
    }

    if w.abs() < 1e-15 {
        point
    } else {
        point / w
    }
}

/// Evaluate the first derivative of a NURBS curve at parameter `t`.
pub fn curve_tangent(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    t: f64,
) -> Vector3 {
    let last = control_points.len() - 1;
    if t >= knots[last + 1] {
        return end_tangent(degree, knots, control_points, weights);
    }

    let span = find_span(degree, knots, t);
    let mut eval = BasisEvaluator::new(knots, t);

    let mut a = Vector3::ZERO;
    let mut da = Vector3::ZERO;
    let mut w = 0.0;
    let mut dw = 0.0;
    for i in span - degree..=span {
        let bw = eval.basis(i, degree) * weights[i];
        let dbw = eval.derivative(i, degree) * weights[i];
        a += bw * control_points[i];
        da += dbw * control_points[i];
        w += bw;
        dw += dbw;
    }

    if w.abs() < 1e-15 {
        da
    } else {
        let c = a / w;
        (da - dw * c) / w
    }
}

/// Left-hand derivative at the end of a clamped curve:
/// `p / Δ · (w[n-1] / w[n]) · (P[n] - P[n-1])`.
fn end_tangent(degree: usize, knots: &[f64], control_points: &[Point3], weights: &[f64]) -> Vector3 {
    let n = control_points.len() - 1;
    if n == 0 || degree == 0 {
        return Vector3::ZERO;
    }
    let span = knots[n + degree] - knots[n];
    if span <= 0.0 {
        return Vector3::ZERO;
    }
    degree as f64 / span * (weights[n - 1] / weights[n]) * (control_points[n] - control_points[n - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use kw_math::dvec3;

    #[test]
    fn test_curve_point_linear() {
        let knots = vec![0.0, 0.0, 1.0, 2.0, 2.0];
        let cps = vec![dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0), dvec3(1.0, 1.0, 0.0)];
        let w = vec![1.0; 3];

        let p = curve_point(1, &knots, &cps, &w, 0.5);
        assert!((p - dvec3(0.5, 0.0, 0.0)).length() < 1e-10);

        let p = curve_point(1, &knots, &cps, &w, 1.5);
        assert!((p - dvec3(1.0, 0.5, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_curve_point_interpolates_ends() {
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let cps = vec![dvec3(0.0, 0.0, 0.0), dvec3(0.5, 1.0, 0.0), dvec3(1.0, 0.0, 0.0)];
        let w = vec![1.0, 2.0, 1.0];

        assert!((curve_point(2, &knots, &cps, &w, 0.0) - cps[0]).length() < 1e-12);
        assert!((curve_point(2, &knots, &cps, &w, 1.0) - cps[2]).length() < 1e-12);
    }

    #[test]
    fn test_quadratic_bezier_midpoint() {
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let cps = vec![dvec3(0.0, 0.0, 0.0), dvec3(0.5, 1.0, 0.0), dvec3(1.0, 0.0, 0.0)];
        let p = curve_point(2, &knots, &cps, &[1.0; 3], 0.5);
        assert!((p - dvec3(0.5, 0.5, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let knots = vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let cps = vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 2.0, 0.0),
            dvec3(2.0, -1.0, 1.0),
            dvec3(3.0, 0.0, 0.0),
        ];
        let w = vec![1.0, 0.7, 1.3, 1.0];
        let h = 1e-6;
        for &t in &[0.1, 0.3, 0.7, 0.95] {
            let numeric = (curve_point(2, &knots, &cps, &w, t + h) - curve_point(2, &knots, &cps, &w, t - h)) / (2.0 * h);
            let analytic = curve_tangent(2, &knots, &cps, &w, t);
            assert!((numeric - analytic).length() < 1e-5, "t={t}: {numeric} vs {analytic}");
        }
    }

    #[test]
    fn test_end_tangent_is_left_limit() {
        let knots = vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let cps = vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 2.0, 0.0),
            dvec3(2.0, -1.0, 1.0),
            dvec3(3.0, 0.0, 0.0),
        ];
        let w = vec![1.0, 0.7, 1.3, 1.0];
        let at_end = curve_tangent(2, &knots, &cps, &w, 1.0);
        let near_end = curve_tangent(2, &knots, &cps, &w, 1.0 - 1e-9);
        assert!((at_end - near_end).length() < 1e-6);
    }
}
