//! B-spline core: knot vectors, Cox–de Boor basis, rational curve evaluation.

pub mod basis;
pub mod eval;
pub mod knot;

pub use basis::{basis_function, derivative_function, BasisEvaluator};
pub use eval::{curve_point, curve_tangent};
pub use knot::{degree, find_span, KnotMultiplicity, KnotVector};
