//! Cox–de Boor evaluation of B-spline basis functions and their derivatives.
//!
//! The recursion is evaluated directly rather than through the triangular
//! table, so single basis functions can be queried by index. Shared subterms
//! are memoized per evaluator, which lives for one parameter value only.

use std::collections::HashMap;

/// Evaluates `N(i, n)` at a fixed parameter, caching `(i, n)` subterms.
#[derive(Debug)]
pub struct BasisEvaluator<'a> {
    knots: &'a [f64],
    t: f64,
    memo: HashMap<(usize, usize), f64>,
}

impl<'a> BasisEvaluator<'a> {
    pub fn new(knots: &'a [f64], t: f64) -> Self {
        Self {
            knots,
            t,
            memo: HashMap::new(),
        }
    }

    pub fn parameter(&self) -> f64 {
        self.t
    }

    /// Degree-`n` basis function `i`.
    ///
    /// Zero outside the support `[knots[i], knots[i + n + 1])` and whenever
    /// `i + n + 1` is past the end of the knot sequence. A ramp term whose
    /// denominator is not positive (repeated knots) contributes nothing.
    pub fn basis(&mut self, i: usize, n: usize) -> f64 {
        let k = self.knots;
        let t = self.t;
        if i + n + 1 >= k.len() {
            return 0.0;
        }
        if n == 0 {
            return if k[i] <= t && t < k[i + 1] { 1.0 } else { 0.0 };
        }
        if t < k[i] || t >= k[i + n + 1] {
            return 0.0;
        }
        if let Some(&cached) = self.memo.get(&(i, n)) {
            return cached;
        }

        let mut value = 0.0;
        let left = k[i + n] - k[i];
        if left > 0.0 {
            value += (t - k[i]) / left * self.basis(i, n - 1);
        }
        let right = k[i + n + 1] - k[i + 1];
        if right > 0.0 {
            value += (k[i + n + 1] - t) / right * self.basis(i + 1, n - 1);
        }

        self.memo.insert((i, n), value);
        value
    }

    /// First derivative of degree-`n` basis function `i`.
    pub fn derivative(&mut self, i: usize, n: usize) -> f64 {
        let k = self.knots;
        if n == 0 || i + n + 1 >= k.len() {
            return 0.0;
        }
        let degree = n as f64;
        let mut value = 0.0;
        let left = k[i + n] - k[i];
        if left > 0.0 {
            value += degree / left * self.basis(i, n - 1);
        }
        let right = k[i + n + 1] - k[i + 1];
        if right > 0.0 {
            value -= degree / right * self.basis(i + 1, n - 1);
        }
        value
    }
}

/// Degree-`n` basis function `i` of `knots` at `t`.
pub fn basis_function(knots: &[f64], i: usize, n: usize, t: f64) -> f64 {
    BasisEvaluator::new(knots, t).basis(i, n)
}

/// First derivative of degree-`n` basis function `i` of `knots` at `t`.
pub fn derivative_function(knots: &[f64], i: usize, n: usize, t: f64) -> f64 {
    BasisEvaluator::new(knots, t).derivative(i, n)
}
