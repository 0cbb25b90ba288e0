//! Knotwork geometry: curves, B-spline basis evaluation, intersections and sampling.

pub mod curve;
pub mod intersect;
pub mod nurbs;
pub mod sample;

pub use curve::{Curve, CurveKind};
