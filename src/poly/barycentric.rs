//! Barycentric (Lagrange) extension of univariates given in evaluation form.
//!
//! Given the evaluations `p(0), ..., p(n - 1)` of a polynomial of degree `< n`, the
//! barycentric formula evaluates `p` at any other point `z`:
//!
//! ```text
//! p(z) = (∏_{j<n} (z - j)) · Σ_{j<n} p(j) / (d_j · (z - j)),     d_j = ∏_{i≠j} (j - i)
//! ```
//!
//! All the quantities that only depend on the pair `(n, m)` (where `m` is the number of
//! requested evaluations) are precomputed once in a [`BarycentricData`] and cached for the
//! whole process: they never depend on proof data.

use alloc::vec::Vec;
use core::any::{Any, TypeId};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};

use p3_field::{Field, batch_multiplicative_inverse};

use super::univariate::Univariate;

type CacheKey = (TypeId, usize, usize);

/// Global cache of barycentric tables, indexed by field and `(domain_size, num_evals)`.
static BARYCENTRIC_CACHE: LazyLock<RwLock<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Precomputed tables for extending a degree `< domain_size` polynomial to `num_evals` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarycentricData<F> {
    /// Size `n` of the source domain `{0, ..., n - 1}`.
    domain_size: usize,
    /// Number `m` of evaluations produced by [`Self::extend`].
    num_evals: usize,
    /// `[0, 1, ..., max(n, m) - 1]` as field elements.
    big_domain: Vec<F>,
    /// `d_j = ∏_{i≠j, i<n} (j - i)` for `j < n`.
    lagrange_denominators: Vec<F>,
    /// `1 / (d_j · (k - j))` stored at `(k - n) · n + j`, for `n <= k < m` and `j < n`.
    precomputed_denominator_inverses: Vec<F>,
    /// `∏_{j<n} (k - j)` for `k < m`. Zero on the source domain.
    full_numerator_values: Vec<F>,
}

impl<F: Field> BarycentricData<F> {
    /// Builds the tables for the pair `(domain_size, num_evals)`.
    ///
    /// # Panics
    /// Panics if `domain_size == 0`.
    #[must_use]
    pub fn new(domain_size: usize, num_evals: usize) -> Self {
        assert_ne!(domain_size, 0, "barycentric domain cannot be empty");

        let big_domain: Vec<F> = (0..domain_size.max(num_evals))
            .map(|i| F::from_u64(i as u64))
            .collect();

        let lagrange_denominators: Vec<F> = (0..domain_size)
            .map(|j| {
                (0..domain_size)
                    .filter(|&i| i != j)
                    .map(|i| big_domain[j] - big_domain[i])
                    .product()
            })
            .collect();

        // All the denominators of the extension points are inverted in a single batch.
        let (points, weights) = (&big_domain, &lagrange_denominators);
        let denominators: Vec<F> = (domain_size..num_evals)
            .flat_map(|k| {
                weights
                    .iter()
                    .enumerate()
                    .map(move |(j, &d_j)| d_j * (points[k] - points[j]))
            })
            .collect();
        let precomputed_denominator_inverses = batch_multiplicative_inverse(&denominators);

        let full_numerator_values = (0..num_evals)
            .map(|k| {
                (0..domain_size)
                    .map(|j| big_domain[k] - big_domain[j])
                    .product()
            })
            .collect();

        Self {
            domain_size,
            num_evals,
            big_domain,
            lagrange_denominators,
            precomputed_denominator_inverses,
            full_numerator_values,
        }
    }

    /// Returns the process-wide tables for `(domain_size, num_evals)`, building them on first use.
    #[must_use]
    pub fn cached(domain_size: usize, num_evals: usize) -> Arc<Self> {
        let key = (TypeId::of::<F>(), domain_size, num_evals);

        // Fast path: shared read access.
        if let Some(entry) = BARYCENTRIC_CACHE
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
        {
            if let Ok(data) = Arc::clone(entry).downcast::<Self>() {
                return data;
            }
        }

        let mut cache = BARYCENTRIC_CACHE
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = cache
            .entry(key)
            .or_insert_with(|| Arc::new(Self::new(domain_size, num_evals)));
        Arc::clone(entry)
            .downcast::<Self>()
            .unwrap_or_else(|_| unreachable!("cache entries are keyed by their field type"))
    }

    #[must_use]
    pub const fn domain_size(&self) -> usize {
        self.domain_size
    }

    #[must_use]
    pub const fn num_evals(&self) -> usize {
        self.num_evals
    }

    /// Writes `p(0), ..., p(num_evals - 1)` into `dst`, where `p` is the interpolant of `src`.
    ///
    /// # Panics
    /// Panics if `src.len() != domain_size` or `dst.len() != num_evals`.
    pub fn extend(&self, src: &[F], dst: &mut [F]) {
        assert_eq!(src.len(), self.domain_size);
        assert_eq!(dst.len(), self.num_evals);

        let n = self.domain_size;
        let copied = n.min(self.num_evals);
        dst[..copied].copy_from_slice(&src[..copied]);

        for (k, out) in dst.iter_mut().enumerate().skip(n) {
            let inverses = &self.precomputed_denominator_inverses[(k - n) * n..(k - n + 1) * n];
            let sum: F = src
                .iter()
                .zip(inverses)
                .map(|(&value, &inverse)| value * inverse)
                .sum();
            *out = sum * self.full_numerator_values[k];
        }
    }

    /// Evaluates the interpolant of `src` at an arbitrary point `z`.
    ///
    /// Points of the source domain are answered directly, which avoids dividing by zero.
    #[must_use]
    pub fn evaluate(&self, src: &[F], z: F) -> F {
        assert_eq!(src.len(), self.domain_size);

        if let Some(j) = self.big_domain[..self.domain_size]
            .iter()
            .position(|&point| point == z)
        {
            return src[j];
        }

        let differences: Vec<F> = self.big_domain[..self.domain_size]
            .iter()
            .map(|&point| z - point)
            .collect();
        let numerator: F = differences.iter().copied().product();

        let denominators: Vec<F> = differences
            .iter()
            .zip(&self.lagrange_denominators)
            .map(|(&diff, &d_j)| diff * d_j)
            .collect();
        let inverses = batch_multiplicative_inverse(&denominators);

        let sum: F = src
            .iter()
            .zip(inverses)
            .map(|(&value, inverse)| value * inverse)
            .sum();
        sum * numerator
    }
}

/// Extends `src` (evaluations on `0..src.len()`) to fill `dst` (evaluations on `0..dst.len()`).
///
/// If `dst` is not longer than `src`, this is a plain copy of the prefix.
pub fn extend_slice<F: Field>(src: &[F], dst: &mut [F]) {
    if dst.len() <= src.len() {
        dst.copy_from_slice(&src[..dst.len()]);
        return;
    }
    BarycentricData::cached(src.len(), dst.len()).extend(src, dst);
}

/// Extends a univariate of length `N` to length `M`.
pub fn extend<F: Field, const N: usize, const M: usize>(
    univariate: &Univariate<F, N>,
) -> Univariate<F, M> {
    let mut evaluations = [F::ZERO; M];
    extend_slice(univariate.as_slice(), &mut evaluations);
    Univariate::new(evaluations)
}

/// Evaluates the interpolant of a univariate at `z`.
pub fn evaluate<F: Field, const N: usize>(univariate: &Univariate<F, N>, z: F) -> F {
    BarycentricData::cached(N, N).evaluate(univariate.as_slice(), z)
}
