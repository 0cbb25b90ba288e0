//! Section slicing: 1-D cross-sections of edge sets and area integration.

use kw_core::{KwError, Result};
use kw_geometry::curve::Curve;
use kw_math::{Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One cut through a set of edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Strip width this slice stands for when integrating.
    pub width: f64,
    /// Total covered length: the sum of every `(entry, exit)` crossing pair.
    pub length: f64,
    /// Offset of the cutting plane from the reference plane.
    pub location: f64,
    /// Crossing coordinates along the slice axis, ascending.
    pub coordinates: Vec<f64>,
}

/// How crossing points are reduced to a coordinate along the cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceAxis {
    /// World Y when the normal has a positive X component, world X otherwise.
    /// Only meaningful for cutting planes whose normal is not mostly Z.
    Legacy,
    /// Whichever in-plane basis direction spans the crossings more widely.
    #[default]
    LargestSpan,
}

impl SliceAxis {
    fn coordinates(self, points: &[Point3], plane: &Plane) -> Vec<f64> {
        match self {
            SliceAxis::Legacy => {
                let use_y = plane.normal.x > 0.0;
                points.iter().map(|p| if use_y { p.y } else { p.x }).collect()
            }
            SliceAxis::LargestSpan => {
                let Some((u, v)) = plane.basis() else {
                    return Vec::new();
                };
                let along = |axis: Vector3| -> Vec<f64> { points.iter().map(|p| (*p - plane.origin).dot(axis)).collect() };
                let (cu, cv) = (along(u), along(v));
                if span(&cv) > span(&cu) {
                    cv
                } else {
                    cu
                }
            }
        }
    }
}

fn span(values: &[f64]) -> f64 {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    if max >= min {
        max - min
    } else {
        0.0
    }
}

/// Cut `edges` with `plane` moved `location` along its normal.
///
/// Crossings are projected to one coordinate per `axis`, sorted, and paired
/// off as `(entry, exit)`. An odd count means a vertex was reported by both
/// of its edges, so one of every coincident adjacent pair is dropped before
/// pairing. A plane with a zero normal yields `None`.
pub fn slice_at<C: Curve>(
    edges: &[C],
    location: f64,
    width: f64,
    plane: &Plane,
    axis: SliceAxis,
    tolerance: f64,
) -> Option<Slice> {
    let cut = plane.unitized()?.translated(location)?;
    let points: Vec<Point3> = edges
        .iter()
        .flat_map(|edge| edge.plane_intersections(&cut, tolerance))
        .collect();

    let mut coordinates = axis.coordinates(&points, &cut);
    coordinates.sort_by(f64::total_cmp);

    if coordinates.len() % 2 == 1 {
        let before = coordinates.len();
        coordinates = drop_coincident_pairs(&coordinates, tolerance);
        tracing::debug!(location, before, after = coordinates.len(), "odd crossing count corrected");
    }

    let length = coordinates.chunks_exact(2).map(|pair| pair[1] - pair[0]).sum();
    Some(Slice {
        width,
        length,
        location,
        coordinates,
    })
}

fn drop_coincident_pairs(sorted: &[f64], tolerance: f64) -> Vec<f64> {
    let mut kept = Vec::with_capacity(sorted.len());
    let mut k = 0;
    while k < sorted.len() {
        kept.push(sorted[k]);
        if k + 1 < sorted.len() && (sorted[k + 1] - sorted[k]).abs() <= tolerance {
            k += 2;
        } else {
            k += 1;
        }
    }
    kept
}

/// Slices every `step` across the extent of `edges` along the plane normal,
/// each sampled at its strip's midpoint. The last strip absorbs the
/// remainder so the strips tile the extent exactly.
pub fn sweep_slices<C: Curve>(
    edges: &[C],
    plane: &Plane,
    step: f64,
    axis: SliceAxis,
    tolerance: f64,
) -> Result<Vec<Slice>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(KwError::InvalidArgument(format!(
            "slice step must be positive and finite, got {}",
            step
        )));
    }
    let reference = plane
        .unitized()
        .ok_or_else(|| KwError::InvalidArgument("cutting plane normal has zero length".into()))?;

    let (min, max) = edges
        .iter()
        .flat_map(|edge| edge.bounding_box().corners())
        .map(|corner| reference.signed_offset(corner))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
    if !(max > min) {
        return Ok(Vec::new());
    }

    let strips = ((max - min) / step).ceil().max(1.0) as usize;
    let width = (max - min) / strips as f64;
    let slices: Vec<Slice> = (0..strips)
        .filter_map(|k| slice_at(edges, min + (k as f64 + 0.5) * width, width, &reference, axis, tolerance))
        .collect();
    tracing::debug!(strips, width, "section sweep");
    Ok(slices)
}

/// Area enclosed by closed `edges`, integrated as `Σ length · width` over
/// slices perpendicular to `plane`'s normal.
pub fn integrate_area<C: Curve>(edges: &[C], plane: &Plane, step: f64, tolerance: f64) -> Result<f64> {
    let slices = sweep_slices(edges, plane, step, SliceAxis::default(), tolerance)?;
    Ok(slices.iter().map(|s| s.length * s.width).sum())
}
