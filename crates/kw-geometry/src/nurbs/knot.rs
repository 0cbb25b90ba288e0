//! Knot vector utilities for B-spline/NURBS evaluation.

use kw_core::{KwError, Result};
use serde::{Deserialize, Serialize};

/// A run of equal knot values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnotMultiplicity {
    pub knot: f64,
    pub multiplicity: usize,
}

/// A validated, non-decreasing knot sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct KnotVector(Vec<f64>);

impl KnotVector {
    /// Wrap `knots`, rejecting non-finite values and decreasing steps.
    pub fn new(knots: Vec<f64>) -> Result<Self> {
        if let Some(bad) = knots.iter().position(|k| !k.is_finite()) {
            return Err(KwError::Geometry(format!(
                "knot {} is not finite: {}",
                bad, knots[bad]
            )));
        }
        if let Some(w) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(KwError::Geometry(format!(
                "knot vector decreases at index {}: {} > {}",
                w + 1,
                knots[w],
                knots[w + 1]
            )));
        }
        Ok(Self(knots))
    }

    /// Clamped knot vector with unit-spaced interior knots.
    ///
    /// ```
    /// use kw_geometry::nurbs::KnotVector;
    /// let knots = KnotVector::clamped_uniform(2, 4).unwrap();
    /// assert_eq!(knots.as_slice(), &[0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0]);
    /// ```
    pub fn clamped_uniform(degree: usize, control_point_count: usize) -> Result<Self> {
        if control_point_count <= degree {
            return Err(KwError::InvalidArgument(format!(
                "a degree {} curve needs at least {} control points, got {}",
                degree,
                degree + 1,
                control_point_count
            )));
        }
        let spans = control_point_count - degree;
        let mut knots = Vec::with_capacity(control_point_count + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        knots.extend((1..spans).map(|i| i as f64));
        knots.extend(std::iter::repeat(spans as f64).take(degree + 1));
        Ok(Self(knots))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries equal to `knots[index]` in the run containing it.
    pub fn multiplicity_at(&self, index: usize) -> usize {
        let Some(&value) = self.0.get(index) else {
            return 0;
        };
        let before = self.0[..index].iter().rev().take_while(|&&k| k == value).count();
        let after = self.0[index..].iter().take_while(|&&k| k == value).count();
        before + after
    }

    /// Runs of equal knots in order.
    pub fn multiplicities(&self) -> Vec<KnotMultiplicity> {
        let mut runs: Vec<KnotMultiplicity> = Vec::new();
        for &knot in &self.0 {
            match runs.last_mut() {
                Some(run) if run.knot == knot => run.multiplicity += 1,
                _ => runs.push(KnotMultiplicity {
                    knot,
                    multiplicity: 1,
                }),
            }
        }
        runs
    }

    pub fn degree(&self) -> usize {
        degree(&self.0)
    }

    /// Valid parameter range `[knots[degree], knots[len - degree - 1]]`.
    pub fn domain(&self, degree: usize) -> (f64, f64) {
        (self.0[degree], self.0[self.0.len() - degree - 1])
    }

    pub fn find_span(&self, degree: usize, t: f64) -> usize {
        find_span(degree, &self.0, t)
    }
}

impl TryFrom<Vec<f64>> for KnotVector {
    type Error = KwError;

    fn try_from(knots: Vec<f64>) -> Result<Self> {
        Self::new(knots)
    }
}

impl From<KnotVector> for Vec<f64> {
    fn from(knots: KnotVector) -> Self {
        knots.0
    }
}

impl AsRef<[f64]> for KnotVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Degree of a clamped curve, read off the multiplicity of its first knot.
///
/// Precondition: `knots` is clamped, i.e. the first knot repeats
/// `degree + 1` times. On any other knot vector the result is meaningless.
/// For surfaces call this once per parametric direction; U and V knots are
/// unrelated.
pub fn degree(knots: &[f64]) -> usize {
    let mut degree = 0;
    while degree + 1 < knots.len() && knots[degree] == knots[degree + 1] {
        degree += 1;
    }
    degree
}

/// Find the knot span index for parameter `t`.
///
/// Returns `i` in `[degree, n]` with `knots[i] <= t < knots[i + 1]`, where
/// `n + 1` is the control point count. Parameters at or past the end of the
/// domain map to the last non-empty span.
pub fn find_span(degree: usize, knots: &[f64], t: f64) -> usize {
    let n = knots.len() - degree - 2;
    let above = knots.partition_point(|&k| k <= t);
    above.saturating_sub(1).clamp(degree, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_span_uniform() {
        // Degree 2, 5 control points
        let knots = vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        let degree = 2;

        assert_eq!(find_span(degree, &knots, 0.0), 2);
        assert_eq!(find_span(degree, &knots, 0.5), 2);
        assert_eq!(find_span(degree, &knots, 1.0), 3);
        assert_eq!(find_span(degree, &knots, 1.5), 3);
        assert_eq!(find_span(degree, &knots, 2.5), 4);
        assert_eq!(find_span(degree, &knots, 3.0), 4);
        assert_eq!(find_span(degree, &knots, -1.0), 2);
    }

    #[test]
    fn test_degree_of_clamped_knots() {
        assert_eq!(degree(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]), 3);
        assert_eq!(degree(&[0.0, 0.0, 0.5, 1.0, 1.0]), 1);
        assert_eq!(degree(&[0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0]), 2);
        assert_eq!(degree(&[]), 0);
        assert_eq!(degree(&[4.0]), 0);
    }

    #[test]
    fn test_clamped_uniform_round_trips_degree() {
        for degree in 1..=5 {
            let knots = KnotVector::clamped_uniform(degree, degree + 4).unwrap();
            assert_eq!(knots.len(), 2 * degree + 5);
            assert_eq!(knots.degree(), degree);
        }
    }

    #[test]
    fn test_clamped_uniform_needs_enough_points() {
        assert!(matches!(
            KnotVector::clamped_uniform(3, 3),
            Err(KwError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_decreasing_knots() {
        assert!(KnotVector::new(vec![0.0, 1.0, 0.5]).is_err());
        assert!(KnotVector::new(vec![0.0, f64::NAN]).is_err());
        assert!(KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_multiplicities() {
        let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0]).unwrap();
        let runs = knots.multiplicities();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1], KnotMultiplicity { knot: 0.5, multiplicity: 2 });
        assert_eq!(knots.multiplicity_at(0), 3);
        assert_eq!(knots.multiplicity_at(4), 2);
        assert_eq!(knots.multiplicity_at(7), 3);
        assert_eq!(knots.multiplicity_at(8), 0);
    }

    #[test]
    fn test_domain() {
        let knots = KnotVector::clamped_uniform(2, 5).unwrap();
        assert_eq!(knots.domain(2), (0.0, 3.0));
    }

    #[test]
    fn test_deserialize_validates() {
        let knots: KnotVector = serde_json::from_str("[0.0, 0.0, 1.0, 1.0]").unwrap();
        assert_eq!(knots.as_slice(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(serde_json::to_string(&knots).unwrap(), "[0.0,0.0,1.0,1.0]");
        assert!(serde_json::from_str::<KnotVector>("[0.0, 1.0, 0.5]").is_err());
    }
}
