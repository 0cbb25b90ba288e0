//! Broad-phase pruning for pairwise searches.
//!
//! A strategy turns a list of bounding boxes into the index pairs worth an
//! exact test. Every strategy returns the same set: all `(i, j)` with `i < j`
//! whose boxes overlap within tolerance. Only the cost differs.

use std::collections::HashMap;

use kw_math::Aabb3;
use rayon::prelude::*;

/// Below this many boxes the pair scan stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 256;

/// Grid cells one box may cover before the grid gives way to a sweep.
const MAX_CELLS_PER_BOX: f64 = 4096.0;

/// Source of candidate pairs for an exact pairwise test.
pub trait CandidatePairs: Sync {
    /// Pairs `(i, j)`, `i < j`, whose boxes overlap within `tolerance`,
    /// sorted ascending.
    fn candidate_pairs(&self, boxes: &[Aabb3], tolerance: f64) -> Vec<(usize, usize)>;
}

/// Every pair, no pruning. Used for infinite lines, whose boxes say nothing.
pub fn all_pairs(count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .flat_map(|i| (i + 1..count).map(move |j| (i, j)))
        .collect()
}

/// Upper-triangular scan with a box overlap check per pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AabbSweep;

impl CandidatePairs for AabbSweep {
    fn candidate_pairs(&self, boxes: &[Aabb3], tolerance: f64) -> Vec<(usize, usize)> {
        let n = boxes.len();
        let row = |i: usize| {
            (i + 1..n)
                .filter(move |&j| boxes[i].intersects(&boxes[j], tolerance))
                .map(move |j| (i, j))
        };
        if n < PARALLEL_THRESHOLD {
            (0..n).flat_map(row).collect()
        } else {
            // collect keeps the row order, so the output stays sorted
            (0..n).into_par_iter().flat_map_iter(row).collect()
        }
    }
}

/// Uniform grid hashing: boxes only meet boxes registered in a shared cell.
///
/// Falls back to [`AabbSweep`] when a box is not finite or would cover more
/// than `MAX_CELLS_PER_BOX` cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformGrid {
    /// Edge length of a cell. `None` picks the mean box extent.
    pub cell_size: Option<f64>,
}

impl UniformGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: Some(cell_size),
        }
    }

    fn resolve_cell_size(&self, boxes: &[Aabb3]) -> f64 {
        if let Some(size) = self.cell_size.filter(|s| s.is_finite() && *s > 0.0) {
            return size;
        }
        let mean = boxes.iter().map(|b| b.extents().max_element()).sum::<f64>() / boxes.len().max(1) as f64;
        if mean.is_finite() && mean > 0.0 {
            mean
        } else {
            1.0
        }
    }
}

type Cell = (i64, i64, i64);

impl CandidatePairs for UniformGrid {
    fn candidate_pairs(&self, boxes: &[Aabb3], tolerance: f64) -> Vec<(usize, usize)> {
        let size = self.resolve_cell_size(boxes);
        let span = |lo: f64, hi: f64| (hi / size).floor() - (lo / size).floor() + 1.0;
        let oversized = boxes.iter().map(|b| b.expand(tolerance)).any(|b| {
            let cells = span(b.min.x, b.max.x) * span(b.min.y, b.max.y) * span(b.min.z, b.max.z);
            !(cells.is_finite() && cells <= MAX_CELLS_PER_BOX)
        });
        if oversized {
            tracing::debug!(cell_size = size, boxes = boxes.len(), "grid too fine, sweeping instead");
            return AabbSweep.candidate_pairs(boxes, tolerance);
        }
        let cell_of = |v: f64| (v / size).floor() as i64;

        let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (index, b) in boxes.iter().enumerate() {
            let b = b.expand(tolerance);
            for x in cell_of(b.min.x)..=cell_of(b.max.x) {
                for y in cell_of(b.min.y)..=cell_of(b.max.y) {
                    for z in cell_of(b.min.z)..=cell_of(b.max.z) {
                        grid.entry((x, y, z)).or_default().push(index);
                    }
                }
            }
        }

        let mut pairs: Vec<(usize, usize)> = grid
            .values()
            .flat_map(|members| {
                members
                    .iter()
                    .enumerate()
                    .flat_map(move |(k, &i)| members[k + 1..].iter().map(move |&j| (i.min(j), i.max(j))))
            })
            .filter(|&(i, j)| boxes[i].intersects(&boxes[j], tolerance))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}
