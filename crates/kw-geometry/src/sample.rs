//! Sampling utilities: adaptive polylines, arc-length lookup and curve division.

use kw_core::{KwError, Result};
use kw_math::Point3;

use crate::curve::Curve;

/// Chord deviation used when a curve's length has no closed form.
pub const LENGTH_CHORD_TOLERANCE: f64 = 1e-7;

/// Chord deviation used for sampled bounding boxes. Boxes are grown by the
/// same amount so the curve stays inside.
pub const BOUNDS_CHORD_TOLERANCE: f64 = 1e-4;

/// Uniform segments laid down before adaptive refinement starts, so that a
/// midpoint that happens to sit on its chord cannot hide a whole wiggle.
const MIN_SEGMENTS: usize = 16;

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Convert a curve to a polyline using adaptive subdivision.
///
/// The algorithm recursively subdivides segments where the midpoint deviation
/// from the chord exceeds the given `tolerance`.
pub fn curve_to_polyline<C: Curve + ?Sized>(curve: &C, tolerance: f64) -> Vec<Point3> {
    parametrized_polyline(curve, tolerance)
        .into_iter()
        .map(|(_, p)| p)
        .collect()
}

/// Like [`curve_to_polyline`], keeping the parameter of every vertex.
pub fn parametrized_polyline<C: Curve + ?Sized>(curve: &C, tolerance: f64) -> Vec<(f64, Point3)> {
    let (t_min, t_max) = curve.domain();
    let mut points = vec![(t_min, curve.point_at(t_min))];
    if t_max <= t_min {
        return points;
    }
    let step = (t_max - t_min) / MIN_SEGMENTS as f64;
    for k in 0..MIN_SEGMENTS {
        let t0 = t_min + step * k as f64;
        let t1 = if k + 1 == MIN_SEGMENTS { t_max } else { t0 + step };
        subdivide_curve(curve, t0, t1, tolerance, &mut points, 0);
    }
    points
}

fn subdivide_curve<C: Curve + ?Sized>(
    curve: &C,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<(f64, Point3)>,
    depth: u32,
) {
    if depth >= MAX_DEPTH {
        tracing::trace!(t0, t1, "chord refinement hit the depth limit");
        points.push((t1, curve.point_at(t1)));
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let p0 = curve.point_at(t0);
    let p1 = curve.point_at(t1);
    let p_mid = curve.point_at(t_mid);

    // Chord midpoint
    let chord_mid = (p0 + p1) * 0.5;
    let deviation = (p_mid - chord_mid).length();

    if deviation > tolerance {
        subdivide_curve(curve, t0, t_mid, tolerance, points, depth + 1);
        subdivide_curve(curve, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push((t1, p1));
    }
}

/// Sum of segment lengths.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Parameter at arc length `length` from the start, interpolated on the
/// adaptive polyline.
pub fn length_to_parameter<C: Curve + ?Sized>(curve: &C, length: f64) -> Result<f64> {
    let polyline = parametrized_polyline(curve, LENGTH_CHORD_TOLERANCE);
    let total: f64 = polyline.windows(2).map(|w| w[0].1.distance(w[1].1)).sum();
    if !(0.0..=total + LENGTH_CHORD_TOLERANCE).contains(&length) {
        return Err(KwError::ParameterOutOfRange {
            parameter: length,
            min: 0.0,
            max: total,
        });
    }

    let mut walked = 0.0;
    for w in polyline.windows(2) {
        let (t0, p0) = w[0];
        let (t1, p1) = w[1];
        let segment = p0.distance(p1);
        if walked + segment >= length {
            if segment == 0.0 {
                return Ok(t0);
            }
            return Ok(t0 + (t1 - t0) * ((length - walked) / segment).clamp(0.0, 1.0));
        }
        walked += segment;
    }
    Ok(curve.domain().1)
}

/// `segments + 1` points spaced evenly by arc length, both ends included.
pub fn divide_by_count<C: Curve + ?Sized>(curve: &C, segments: usize) -> Result<Vec<Point3>> {
    if segments == 0 {
        return Err(KwError::InvalidArgument("segment count must be at least 1".into()));
    }
    let total = curve.length();
    (0..=segments)
        .map(|k| {
            if k == segments {
                Ok(curve.end_point())
            } else {
                curve.point_at_length((total * k as f64 / segments as f64).min(total))
            }
        })
        .collect()
}

/// Points every `step` of arc length from the start, plus the end point when
/// the last step falls short of it.
pub fn divide_by_length<C: Curve + ?Sized>(curve: &C, step: f64) -> Result<Vec<Point3>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(KwError::InvalidArgument(format!(
            "division step must be positive and finite, got {}",
            step
        )));
    }
    let total = curve.length();
    let mut points = Vec::new();
    let mut k = 0usize;
    loop {
        let at = step * k as f64;
        if at >= total - LENGTH_CHORD_TOLERANCE {
            break;
        }
        points.push(curve.point_at_length(at)?);
        k += 1;
    }
    points.push(curve.end_point());
    Ok(points)
}
