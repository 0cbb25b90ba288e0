//! Curve–curve intersection.
//!
//! Curve–plane intersection lives on [`Curve::plane_intersections`]; this
//! module handles pairs of curves.

use kw_core::{KwError, Result, Tolerance};
use kw_math::predicates::is_parallel;
use kw_math::Point3;

use crate::curve::{Curve, CurveKind, Line};

/// Intersection point of two lines, if they meet within `tolerance.linear`.
///
/// With `use_infinite` both lines extend past their end points; otherwise
/// each closest-approach parameter must fall in `[0, 1]` (with slack of
/// `tolerance.linear` measured along the segment). Degenerate and parallel
/// lines, including collinear overlaps, return `None`. The returned point is
/// the midpoint of the closest-approach segment.
pub fn line_line(a: &Line, b: &Line, use_infinite: bool, tolerance: &Tolerance) -> Option<Point3> {
    if a.is_degenerate(tolerance.linear) || b.is_degenerate(tolerance.linear) {
        return None;
    }
    let d1 = a.direction();
    let d2 = b.direction();
    if is_parallel(d1, d2, tolerance.angular)?.is_parallel() {
        return None;
    }

    let r = a.start - b.start;
    let aa = d1.dot(d1);
    let ee = d2.dot(d2);
    let bb = d1.dot(d2);
    let cc = d1.dot(r);
    let ff = d2.dot(r);
    let denom = aa * ee - bb * bb;
    if denom <= 0.0 {
        return None;
    }
    let s = (bb * ff - cc * ee) / denom;
    let t = (aa * ff - bb * cc) / denom;

    if !use_infinite {
        let slack_a = tolerance.linear / aa.sqrt();
        let slack_b = tolerance.linear / ee.sqrt();
        if s < -slack_a || s > 1.0 + slack_a || t < -slack_b || t > 1.0 + slack_b {
            return None;
        }
    }

    let pa = a.point_at(s);
    let pb = b.point_at(t);
    if pa.distance(pb) > tolerance.linear {
        return None;
    }
    Some((pa + pb) * 0.5)
}

/// Single intersection point of two curves.
///
/// Only line–line pairs are implemented; every other combination is
/// [`KwError::Unsupported`] rather than a silent miss.
pub fn curve_curve(a: &CurveKind, b: &CurveKind, tolerance: &Tolerance) -> Result<Option<Point3>> {
    match (a, b) {
        (CurveKind::Line(a), CurveKind::Line(b)) => Ok(line_line(a, b, false, tolerance)),
        _ => Err(KwError::Unsupported(format!(
            "intersection of {} and {}",
            a.kind_name(),
            b.kind_name()
        ))),
    }
}
