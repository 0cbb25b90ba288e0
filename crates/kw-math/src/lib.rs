//! Knotwork math primitives: vectors, planes, bounding boxes, row reduction, predicates.

pub mod aabb;
pub mod linalg;
pub mod plane;
pub mod predicates;

pub use glam::{dvec3, DVec3};
pub use aabb::Aabb3;
pub use plane::{orthonormal_frame, Plane};
pub use predicates::{Parallelism, Side};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
