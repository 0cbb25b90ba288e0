//! Sampling-based fall-backs for curves without closed-form queries.

use kw_math::{Plane, Point3};

use super::Curve;

pub(crate) const DEFAULT_SAMPLES: usize = 64;

const GOLDEN_ITERATIONS: usize = 80;
const BISECTION_ITERATIONS: usize = 64;

/// `count + 1` evenly spaced parameters covering `domain`.
pub(crate) fn uniform_parameters((min, max): (f64, f64), count: usize) -> Vec<f64> {
    let count = count.max(1);
    (0..=count)
        .map(|k| if k == count { max } else { min + (max - min) * k as f64 / count as f64 })
        .collect()
}

/// Append `p` unless an existing point is already within `tolerance`.
pub(crate) fn push_unique(points: &mut Vec<Point3>, p: Point3, tolerance: f64) {
    if !points.iter().any(|q| q.distance(p) <= tolerance) {
        points.push(p);
    }
}

/// Nearest sample, then a golden-section search on the neighbouring interval.
pub(crate) fn sampled_closest_point<C: Curve + ?Sized>(curve: &C, point: Point3, samples: usize) -> Point3 {
    let params = uniform_parameters(curve.domain(), samples);
    let distance_sq = |t: f64| curve.point_at(t).distance_squared(point);

    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (k, &t) in params.iter().enumerate() {
        let d = distance_sq(t);
        if d < best_d {
            best = k;
            best_d = d;
        }
    }

    let mut lo = params[best.saturating_sub(1)];
    let mut hi = params[(best + 1).min(params.len() - 1)];
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut a = hi - ratio * (hi - lo);
    let mut b = lo + ratio * (hi - lo);
    let mut fa = distance_sq(a);
    let mut fb = distance_sq(b);
    for _ in 0..GOLDEN_ITERATIONS {
        if fa < fb {
            hi = b;
            b = a;
            fb = fa;
            a = hi - ratio * (hi - lo);
            fa = distance_sq(a);
        } else {
            lo = a;
            a = b;
            fa = fb;
            b = lo + ratio * (hi - lo);
            fb = distance_sq(b);
        }
    }

    let refined = 0.5 * (lo + hi);
    if distance_sq(refined) < best_d {
        curve.point_at(refined)
    } else {
        curve.point_at(params[best])
    }
}

/// Plane crossings from sign changes of the signed offset between samples,
/// refined by bisection. `plane` must have a unit normal.
///
/// A sample within `tolerance` of the plane counts only where the curve
/// arrives from or leaves to one side; samples in the middle of a run that
/// lies in the plane are skipped, matching [`super::Line`] with both ends on
/// the plane.
pub(crate) fn sampled_plane_crossings<C: Curve + ?Sized>(
    curve: &C,
    plane: &Plane,
    tolerance: f64,
    samples: usize,
) -> Vec<Point3> {
    let params = uniform_parameters(curve.domain(), samples);
    let offsets: Vec<f64> = params
        .iter()
        .map(|&t| plane.signed_offset(curve.point_at(t)))
        .collect();
    let on_plane = |k: usize| offsets[k].abs() <= tolerance;

    let mut points = Vec::new();
    for k in 0..params.len() {
        if on_plane(k) {
            let off_before = k > 0 && !on_plane(k - 1);
            let off_after = k + 1 < params.len() && !on_plane(k + 1);
            if off_before || off_after || params.len() == 1 {
                push_unique(&mut points, curve.point_at(params[k]), tolerance);
            }
        }
        let Some(&next) = offsets.get(k + 1) else {
            break;
        };
        let here = offsets[k];
        let crosses = (here > tolerance && next < -tolerance) || (here < -tolerance && next > tolerance);
        if crosses {
            let t = bisect(curve, plane, params[k], params[k + 1], here);
            push_unique(&mut points, curve.point_at(t), tolerance);
        }
    }
    points
}

fn bisect<C: Curve + ?Sized>(curve: &C, plane: &Plane, mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    let mut mid = 0.5 * (lo + hi);
    for _ in 0..BISECTION_ITERATIONS {
        mid = 0.5 * (lo + hi);
        let f_mid = plane.signed_offset(curve.point_at(mid));
        if f_mid == 0.0 {
            break;
        }
        if (f_mid > 0.0) == (f_lo > 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    mid
}
