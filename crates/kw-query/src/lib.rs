//! Knotwork queries: curve proximity, pairwise intersection search and section slicing.

pub mod proximity;
pub mod pruning;
pub mod section;

pub use proximity::{
    closest_distance, line_distance, line_intersections, line_intersections_with, skew_line_proximity,
    ClosestPointSet,
};
pub use pruning::{AabbSweep, CandidatePairs, UniformGrid};
pub use section::{integrate_area, slice_at, sweep_slices, Slice, SliceAxis};
