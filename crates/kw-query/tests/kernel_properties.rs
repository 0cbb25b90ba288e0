use approx::assert_relative_eq;
use kw_core::Tolerance;
use kw_geometry::curve::{Curve, CurveKind, Line, NurbsCurve};
use kw_geometry::nurbs::{basis_function, degree, KnotVector};
use kw_math::predicates::{angle, is_collinear, is_coplanar, is_parallel, side};
use kw_math::{dvec3, Parallelism, Plane, Point3, Side, Vector3};
use kw_query::{closest_distance, integrate_area, line_intersections, skew_line_proximity, slice_at, SliceAxis, UniformGrid};

fn unit_square() -> Vec<Line> {
    let c = [
        dvec3(0.0, 0.0, 0.0),
        dvec3(1.0, 0.0, 0.0),
        dvec3(1.0, 1.0, 0.0),
        dvec3(0.0, 1.0, 0.0),
    ];
    (0..4).map(|i| Line::new(c[i], c[(i + 1) % 4])).collect()
}

#[test]
fn test_angle_of_vector_with_itself_and_opposite() {
    for v in [dvec3(1.0, 2.0, 3.0), dvec3(-0.1, 0.0, 7.0), dvec3(0.0, 0.0, 1e-3)] {
        assert_relative_eq!(angle(v, v).unwrap(), 0.0, epsilon = 1e-7);
        assert_relative_eq!(angle(v, -v).unwrap(), std::f64::consts::PI, epsilon = 1e-7);
    }
    assert!(angle(Vector3::ZERO, Vector3::X).is_none());
}

#[test]
fn test_partition_of_unity_on_clamped_cubic() {
    let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.5, 2.0, 3.0, 3.0, 3.0, 3.0]).unwrap();
    let n = 3;
    let count = knots.len() - n - 1;
    for k in 0..30 {
        let t = 0.05 + k as f64 * 0.098;
        let sum: f64 = (0..count).map(|i| basis_function(knots.as_slice(), i, n, t)).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_degree_round_trip() {
    let knots = KnotVector::clamped_uniform(3, 7).unwrap();
    assert_eq!(degree(knots.as_slice()), 3);
    assert_eq!(knots.degree(), 3);

    let curve = NurbsCurve::clamped(3, (0..7).map(|i| dvec3(i as f64, (i % 2) as f64, 0.0)).collect()).unwrap();
    assert_eq!(curve.degree(), 3);
    assert_eq!(curve.start_point(), dvec3(0.0, 0.0, 0.0));
    assert_eq!(curve.end_point(), dvec3(6.0, 0.0, 0.0));
}

#[test]
fn test_collinear_and_coplanar() {
    let a = dvec3(1.0, -2.0, 0.5);
    let d = dvec3(0.3, 0.7, -1.1);
    let on_line: Vec<Point3> = [-2.0, 0.0, 0.5, 3.0, 10.0].iter().map(|&t| a + t * d).collect();
    assert!(is_collinear(&on_line, 1e-9));
    assert!(is_collinear(&on_line[..2], 1e-9));
    assert!(!is_collinear(&[a, a + d, a + Vector3::Z], 1e-9));

    let (p, q, r) = (dvec3(0.0, 0.0, 1.0), dvec3(2.0, 1.0, 1.5), dvec3(-1.0, 3.0, 0.0));
    let combo = p + 0.4 * (q - p) - 1.7 * (r - p);
    assert!(is_coplanar(&[p, q, r, combo], 1e-9));
    assert!(!is_coplanar(&[p, q, r, combo + (q - p).cross(r - p)], 1e-9));
}

#[test]
fn test_parallel_classification() {
    let v = dvec3(1.0, 2.0, -0.5);
    let perpendicular = v.cross(Vector3::Z);
    assert_eq!(is_parallel(v, v, 1e-9), Some(Parallelism::Same));
    assert_eq!(is_parallel(v, -v, 1e-9), Some(Parallelism::Opposite));
    assert_eq!(is_parallel(v, perpendicular, 1e-9), Some(Parallelism::NotParallel));
    assert_eq!(is_parallel(v, v, 1e-9).map(Parallelism::as_i8), Some(1));
    assert_eq!(is_parallel(v, -v, 1e-9).map(Parallelism::as_i8), Some(-1));
}

#[test]
fn test_side_classification() {
    let plane = Plane::new(dvec3(0.0, 0.0, 1.0), Vector3::Z);
    let sides = side(&plane, &[dvec3(5.0, 5.0, 3.0), dvec3(0.0, 0.0, 1.0), dvec3(0.0, 0.0, -1.0)], 1e-9);
    assert_eq!(sides, vec![Side::Positive, Side::On, Side::Negative]);
}

#[test]
fn test_skew_lines_reach_true_distance() {
    let a = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
    let b = Line::new(dvec3(0.0, 1.0, 1.0), dvec3(0.0, 1.0, -1.0));
    let (t1, t2) = skew_line_proximity(&a, &b, 1e-6).unwrap();
    let separation = a.point_at(t1).distance(b.point_at(t2));

    // Independent distance between the infinite lines: |(p2 - p1) · n| / |n|
    let n = a.direction().cross(b.direction());
    let expected = (b.start - a.start).dot(n).abs() / n.length();
    assert_relative_eq!(separation, expected, epsilon = 1e-12);
    assert_relative_eq!(separation, 1.0, epsilon = 1e-12);
}

#[test]
fn test_grid_intersections() {
    let lines = vec![
        Line::new(dvec3(-0.5, 0.0, 0.0), dvec3(1.5, 0.0, 0.0)),
        Line::new(dvec3(-0.5, 1.0, 0.0), dvec3(1.5, 1.0, 0.0)),
        Line::new(dvec3(0.0, -0.5, 0.0), dvec3(0.0, 1.5, 0.0)),
        Line::new(dvec3(1.0, -0.5, 0.0), dvec3(1.0, 1.5, 0.0)),
    ];
    let tol = Tolerance::default();
    let points = line_intersections(&lines, false, &tol);
    assert_eq!(points.len(), 4);
    for expected in [
        dvec3(0.0, 0.0, 0.0),
        dvec3(0.0, 1.0, 0.0),
        dvec3(1.0, 0.0, 0.0),
        dvec3(1.0, 1.0, 0.0),
    ] {
        assert!(points.iter().any(|p| p.distance(expected) < 1e-9), "missing {:?}", expected);
    }

    let hashed = kw_query::line_intersections_with(&lines, false, &tol, &UniformGrid::new(0.5));
    assert_eq!(hashed.len(), 4);
}

#[test]
fn test_unit_square_slice_and_area() {
    let plane = Plane::new(Point3::ZERO, Vector3::X);
    let slice = slice_at(&unit_square(), 0.4, 0.05, &plane, SliceAxis::default(), 1e-9).unwrap();
    assert_relative_eq!(slice.length, 1.0, epsilon = 1e-12);
    assert_relative_eq!(integrate_area(&unit_square(), &plane, 0.05, 1e-9).unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_closest_distance_between_curve_sets() {
    let curves: Vec<CurveKind> = unit_square().into_iter().map(CurveKind::from).collect();
    let probes = [dvec3(0.5, 3.0, 0.0), dvec3(2.0, 0.5, 0.0)];
    let d = closest_distance(curves.as_slice(), &probes, 1e-6).unwrap();
    assert_relative_eq!(d, 1.0, epsilon = 1e-12);
}
