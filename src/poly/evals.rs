use alloc::vec::Vec;

use p3_field::Field;
use p3_maybe_rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::multilinear::MultilinearPoint;

const PARALLEL_THRESHOLD: usize = 4096;

/// Represents a multilinear polynomial `f` in `n` variables, stored by its evaluations
/// over the boolean hypercube `{0,1}^n`.
///
/// The vertex `(b_0, ..., b_{n-1})` is stored at index `Σ b_l · 2^l`: the variable `X_0` is the
/// least significant bit of the index. Consecutive entries `(2i, 2i + 1)` therefore form the
/// edges along `X_0`, which is the variable the sumcheck binds first.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct EvaluationsList<F>(pub(crate) Vec<F>);

impl<F> EvaluationsList<F>
where
    F: Field,
{
    /// Constructs an `EvaluationsList` from a vector of evaluations.
    ///
    /// # Panics
    /// Panics if `evals.len()` is not a power of two.
    #[inline]
    pub fn new(evals: Vec<F>) -> Self {
        assert!(
            evals.len().is_power_of_two(),
            "Evaluation list length must be a power of two."
        );

        Self(evals)
    }

    /// Returns the value of a constant polynomial (i.e., when `num_variables` is 0).
    ///
    /// Returns None in other cases.
    #[must_use]
    #[inline]
    pub fn as_constant(&self) -> Option<F> {
        (self.num_evals() == 1).then_some(self.0[0])
    }

    /// Returns the total number of stored evaluations.
    #[must_use]
    #[inline]
    pub const fn num_evals(&self) -> usize {
        self.0.len()
    }

    /// Returns the number of variables in the multilinear polynomial.
    #[must_use]
    #[inline]
    pub const fn num_variables(&self) -> usize {
        self.0.len().ilog2() as usize
    }

    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[F] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, F> {
        self.0.iter()
    }

    /// Returns the two endpoints of the edge starting at the even index `i`.
    #[must_use]
    #[inline]
    pub fn edge(&self, i: usize) -> (F, F) {
        debug_assert_eq!(i % 2, 0);
        (self.0[i], self.0[i + 1])
    }

    /// Binds the lowest variable `X_0` to `r`, halving the number of evaluations.
    ///
    /// ```text
    /// Before: [ p(0, x'_0), p(1, x'_0), p(0, x'_1), p(1, x'_1), ... ]
    /// After:  [ p(r, x'_0), p(r, x'_1), ... ]
    /// ```
    ///
    /// The function computes `new[i] = old[2i] + r * (old[2i + 1] - old[2i])`, which is the
    /// degree-1 interpolant of the edge evaluated at `r`.
    ///
    /// Small lists are folded in place. Above `PARALLEL_THRESHOLD` the folded values go to a
    /// fresh buffer, since parallel writes to slot `i` would race with reads of slots `2i`.
    ///
    /// # Panics
    /// Panics on a constant polynomial.
    #[inline]
    pub fn fold_pairs(&mut self, r: F) {
        assert_ne!(self.num_variables(), 0);
        let half = self.num_evals() / 2;

        if self.num_evals() >= PARALLEL_THRESHOLD {
            self.0 = self
                .0
                .par_chunks_exact(2)
                .map(|pair| pair[0] + r * (pair[1] - pair[0]))
                .collect();
        } else {
            // Writing slot `i` only reads slots `2i` and `2i + 1 >= i`, so a forward pass is safe.
            for i in 0..half {
                let (lo, hi) = (self.0[2 * i], self.0[2 * i + 1]);
                self.0[i] = lo + r * (hi - lo);
            }
            self.0.truncate(half);
        }
    }

    /// Evaluates the multilinear extension at `point`, where `point[l]` is bound to `X_l`.
    ///
    /// # Panics
    /// Panics if the point does not have exactly `num_variables` coordinates.
    #[must_use]
    #[instrument(skip_all, level = "debug")]
    pub fn evaluate(&self, point: &MultilinearPoint<F>) -> F {
        assert_eq!(point.num_variables(), self.num_variables());
        let mut folded = self.clone();
        for &r in point.iter() {
            folded.fold_pairs(r);
        }
        folded.0[0]
    }
}

impl<F> core::ops::Index<usize> for EvaluationsList<F> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.0[index]
    }
}

impl<'a, F> IntoIterator for &'a EvaluationsList<F> {
    type Item = &'a F;
    type IntoIter = core::slice::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<F> IntoIterator for EvaluationsList<F> {
    type Item = F;
    type IntoIter = alloc::vec::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
