//! Proximity queries: closest distances, skew-line closest approach and
//! pairwise line intersection search.

use kw_core::Tolerance;
use kw_geometry::curve::{Curve, CurveKind, Line};
use kw_geometry::intersect::line_line;
use kw_math::predicates::is_parallel;
use kw_math::Point3;
use rayon::prelude::*;

use crate::pruning::{all_pairs, AabbSweep, CandidatePairs};

/// Below this many queries or pairs the search stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

/// A set of geometry that can report its point closest to a query point.
pub trait ClosestPointSet: Sync {
    /// `None` when the set is empty.
    fn closest_point_to(&self, point: Point3) -> Option<Point3>;
}

impl ClosestPointSet for [Point3] {
    fn closest_point_to(&self, point: Point3) -> Option<Point3> {
        self.iter()
            .copied()
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }
}

impl ClosestPointSet for [CurveKind] {
    fn closest_point_to(&self, point: Point3) -> Option<Point3> {
        self.iter()
            .map(|c| c.closest_point(point))
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }
}

impl ClosestPointSet for [Line] {
    fn closest_point_to(&self, point: Point3) -> Option<Point3> {
        self.iter()
            .map(|l| l.closest_point(point))
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }
}

/// Smallest distance from any of `points` to the set `target`.
///
/// Returns as soon as some point lies within `tolerance` of the set, with
/// that pair's exact distance. Otherwise the minimum over all points.
/// `None` when either side is empty. Large inputs are searched in parallel,
/// in which case the early exit may report any pair within tolerance.
pub fn closest_distance<S>(target: &S, points: &[Point3], tolerance: f64) -> Option<f64>
where
    S: ClosestPointSet + ?Sized,
{
    let tolerance_sq = tolerance * tolerance;
    let distance_sq = |p: &Point3| target.closest_point_to(*p).map(|q| q.distance_squared(*p));

    if points.len() < PARALLEL_THRESHOLD {
        let mut best = f64::INFINITY;
        for p in points {
            let d = distance_sq(p)?;
            if d <= tolerance_sq {
                return Some(d.sqrt());
            }
            best = best.min(d);
        }
        return best.is_finite().then(|| best.sqrt());
    }

    // Err carries a hit within tolerance and short-circuits the reduction
    let found = points
        .par_iter()
        .filter_map(distance_sq)
        .map(|d| if d <= tolerance_sq { Err(d) } else { Ok(d) })
        .try_reduce(|| f64::INFINITY, |a, b| Ok(a.min(b)));
    match found {
        Err(hit) => Some(hit.sqrt()),
        Ok(best) if best.is_finite() => Some(best.sqrt()),
        Ok(_) => None,
    }
}

/// Parameters `(t1, t2)` at which two infinite lines come closest.
///
/// `None` when either line is degenerate or the two are parallel within
/// `angular_tolerance`; use [`line_distance`] for those. Parameters are on
/// the lines' own `[0, 1]` scale and may fall outside it.
pub fn skew_line_proximity(l1: &Line, l2: &Line, angular_tolerance: f64) -> Option<(f64, f64)> {
    let v1 = l1.direction();
    let v2 = l2.direction();
    if is_parallel(v1, v2, angular_tolerance)?.is_parallel() {
        return None;
    }

    let cross = v1.cross(v2);
    let n1 = v1.cross(-cross);
    let n2 = v2.cross(cross);
    let t1 = (l2.start - l1.start).dot(n2) / v1.dot(n2);
    let t2 = (l1.start - l2.start).dot(n1) / v2.dot(n1);
    Some((t1, t2))
}

/// Distance between two infinite lines.
///
/// Skew lines go through [`skew_line_proximity`]. Parallel lines fall back
/// to the distance from one line's start to the other line, and a
/// degenerate line is treated as its start point.
pub fn line_distance(l1: &Line, l2: &Line, tolerance: &Tolerance) -> f64 {
    if let Some((t1, t2)) = skew_line_proximity(l1, l2, tolerance.angular) {
        return l1.point_at(t1).distance(l2.point_at(t2));
    }
    match (l1.is_degenerate(tolerance.linear), l2.is_degenerate(tolerance.linear)) {
        (true, true) => l1.start.distance(l2.start),
        (true, false) => l2.closest_point_on(l1.start, true).distance(l1.start),
        (false, _) => l1.closest_point_on(l2.start, true).distance(l2.start),
    }
}

/// All pairwise intersection points of `lines`, pruned by bounding boxes.
///
/// The result is a set; its order carries no meaning.
pub fn line_intersections(lines: &[Line], use_infinite: bool, tolerance: &Tolerance) -> Vec<Point3> {
    line_intersections_with(lines, use_infinite, tolerance, &AabbSweep)
}

/// [`line_intersections`] with a caller-chosen pruning strategy. Infinite
/// lines are not pruned at all.
pub fn line_intersections_with<P>(lines: &[Line], use_infinite: bool, tolerance: &Tolerance, pruning: &P) -> Vec<Point3>
where
    P: CandidatePairs + ?Sized,
{
    let n = lines.len();
    let pairs = if use_infinite {
        all_pairs(n)
    } else {
        let boxes: Vec<_> = lines.iter().map(|l| l.bounding_box()).collect();
        pruning.candidate_pairs(&boxes, tolerance.linear)
    };

    let intersect = |&(i, j): &(usize, usize)| line_line(&lines[i], &lines[j], use_infinite, tolerance);
    let points: Vec<Point3> = if pairs.len() < PARALLEL_THRESHOLD {
        pairs.iter().filter_map(intersect).collect()
    } else {
        pairs.par_iter().filter_map(intersect).collect()
    };

    tracing::debug!(
        lines = n,
        candidates = pairs.len(),
        total_pairs = n * n.saturating_sub(1) / 2,
        hits = points.len(),
        "pairwise line intersection"
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pruning::UniformGrid;
    use approx::assert_relative_eq;
    use kw_geometry::curve::Circle;
    use kw_math::{dvec3, Vector3};

    #[test]
    fn test_skew_line_proximity() {
        let a = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let b = Line::new(dvec3(0.0, 1.0, 1.0), dvec3(0.0, 1.0, -1.0));
        let (t1, t2) = skew_line_proximity(&a, &b, 1e-6).unwrap();
        assert_relative_eq!(t1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(t2, 0.5, epsilon = 1e-12);
        assert_relative_eq!(a.point_at(t1).distance(b.point_at(t2)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_skew_line_proximity_general_position() {
        let a = Line::new(dvec3(1.0, 2.0, 3.0), dvec3(4.0, -1.0, 2.0));
        let b = Line::new(dvec3(-2.0, 0.0, 1.0), dvec3(0.0, 3.0, -1.0));
        let (t1, t2) = skew_line_proximity(&a, &b, 1e-6).unwrap();
        // The connecting segment is perpendicular to both lines
        let gap = b.point_at(t2) - a.point_at(t1);
        assert_relative_eq!(gap.dot(a.direction()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(gap.dot(b.direction()), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_skew_line_proximity_rejects_parallel_and_degenerate() {
        let a = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let b = Line::new(dvec3(0.0, 1.0, 0.0), dvec3(-3.0, 1.0, 0.0));
        assert!(skew_line_proximity(&a, &b, 1e-6).is_none());
        let point = Line::new(dvec3(0.0, 1.0, 0.0), dvec3(0.0, 1.0, 0.0));
        assert!(skew_line_proximity(&a, &point, 1e-6).is_none());
    }

    #[test]
    fn test_line_distance_fallbacks() {
        let tol = Tolerance::default();
        let a = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let parallel = Line::new(dvec3(5.0, 3.0, 4.0), dvec3(7.0, 3.0, 4.0));
        assert_relative_eq!(line_distance(&a, &parallel, &tol), 5.0, epsilon = 1e-12);

        let point = Line::new(dvec3(9.0, 0.0, 2.0), dvec3(9.0, 0.0, 2.0));
        assert_relative_eq!(line_distance(&point, &a, &tol), 2.0, epsilon = 1e-12);

        let skew = Line::new(dvec3(0.0, 1.0, 1.0), dvec3(0.0, 1.0, -1.0));
        assert_relative_eq!(line_distance(&a, &skew, &tol), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_distance_points() {
        let target = [dvec3(0.0, 0.0, 0.0), dvec3(10.0, 0.0, 0.0)];
        let points = [dvec3(3.0, 4.0, 0.0), dvec3(10.0, 0.0, 2.0)];
        assert_relative_eq!(closest_distance(&target[..], &points, 1e-6).unwrap(), 2.0, epsilon = 1e-12);
        assert!(closest_distance(&target[..], &[], 1e-6).is_none());
        let empty: [Point3; 0] = [];
        assert!(closest_distance(&empty[..], &points, 1e-6).is_none());
    }

    #[test]
    fn test_closest_distance_early_exit_is_exact() {
        let target = [dvec3(0.0, 0.0, 0.0)];
        let points = [dvec3(0.05, 0.0, 0.0), dvec3(0.0, 0.0, 0.0)];
        // The first point is already within tolerance; its distance is reported as is
        let d = closest_distance(&target[..], &points, 0.1).unwrap();
        assert_relative_eq!(d, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_distance_curves() {
        let curves: Vec<CurveKind> = vec![
            Circle::new(Point3::ZERO, Vector3::Z, 1.0).into(),
            Line::new(dvec3(5.0, -1.0, 0.0), dvec3(5.0, 1.0, 0.0)).into(),
        ];
        let points = [dvec3(3.0, 0.0, 0.0), dvec3(0.0, 0.0, 1.0)];
        let d = closest_distance(curves.as_slice(), &points, 1e-6).unwrap();
        assert_relative_eq!(d, 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_closest_distance_parallel_path() {
        let target: Vec<Point3> = (0..10).map(|i| dvec3(i as f64, 0.0, 0.0)).collect();
        let points: Vec<Point3> = (0..500).map(|i| dvec3(i as f64 * 0.01, 3.0, 0.0)).collect();
        let d = closest_distance(target.as_slice(), &points, 1e-6).unwrap();
        assert_relative_eq!(d, 3.0, epsilon = 1e-12);
        // Any point may end the search early, but the reported value is its exact distance
        let d = closest_distance(target.as_slice(), &points, 3.5).unwrap();
        assert!(d <= 3.5);
        let exact: Vec<f64> = points
            .iter()
            .map(|p| target.iter().map(|q| q.distance(*p)).fold(f64::INFINITY, f64::min))
            .collect();
        assert!(exact.iter().any(|&e| (e - d).abs() < 1e-12), "{} is not a pair distance", d);
        assert!(d > 3.0 - 1e-12);
    }

    fn grid(count: usize) -> Vec<Line> {
        let span = (count - 1) as f64;
        let mut lines = Vec::new();
        for k in 0..count {
            let c = k as f64;
            lines.push(Line::new(dvec3(0.0, c, 0.0), dvec3(span, c, 0.0)));
            lines.push(Line::new(dvec3(c, 0.0, 0.0), dvec3(c, span, 0.0)));
        }
        lines
    }

    #[test]
    fn test_line_intersections_grid() {
        let lines = vec![
            Line::new(dvec3(-0.5, 0.0, 0.0), dvec3(1.5, 0.0, 0.0)),
            Line::new(dvec3(-0.5, 1.0, 0.0), dvec3(1.5, 1.0, 0.0)),
            Line::new(dvec3(0.0, -0.5, 0.0), dvec3(0.0, 1.5, 0.0)),
            Line::new(dvec3(1.0, -0.5, 0.0), dvec3(1.0, 1.5, 0.0)),
        ];
        let mut points = line_intersections(&lines, false, &Tolerance::default());
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        let expected = [
            dvec3(0.0, 0.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
        ];
        assert_eq!(points.len(), 4);
        for (p, q) in points.iter().zip(expected) {
            assert_relative_eq!(p.distance(q), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_infinite_lines_skip_pruning() {
        let lines = vec![
            Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)),
            Line::new(dvec3(5.0, 1.0, 0.0), dvec3(5.0, 2.0, 0.0)),
        ];
        assert!(line_intersections(&lines, false, &Tolerance::default()).is_empty());
        let hits = line_intersections(&lines, true, &Tolerance::default());
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].distance(dvec3(5.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pruning_strategies_agree() {
        let lines = grid(12);
        let tol = Tolerance::default();
        let sweep = line_intersections(&lines, false, &tol);
        let hashed = line_intersections_with(&lines, false, &tol, &UniformGrid::default());
        assert_eq!(sweep.len(), 144);
        assert_eq!(hashed.len(), 144);
        let key = |p: &Point3| ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64);
        let mut a: Vec<_> = sweep.iter().map(key).collect();
        let mut b: Vec<_> = hashed.iter().map(key).collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}
