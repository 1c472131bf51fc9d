use alloc::vec::Vec;
use core::ops::Index;

use p3_field::Field;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// A point `(x_0, ..., x_{n-1})` in `F^n` at which a multilinear polynomial is evaluated.
///
/// Coordinate `l` is bound to the variable `X_l`, which the sumcheck binds in round `l`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MultilinearPoint<F>(pub Vec<F>);

impl<F> MultilinearPoint<F>
where
    F: Field,
{
    #[must_use]
    pub const fn new(point: Vec<F>) -> Self {
        Self(point)
    }

    /// Returns the number of variables (dimension `n`).
    #[inline]
    #[must_use]
    pub const fn num_variables(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[F] {
        &self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, F> {
        self.0.iter()
    }

    /// Converts the hypercube vertex stored at `index` into a point with 0/1 coordinates.
    ///
    /// Bit `l` of `index` becomes coordinate `l`.
    #[must_use]
    pub fn from_hypercube_index(index: usize, num_variables: usize) -> Self {
        Self(
            (0..num_variables)
                .map(|l| F::from_bool((index >> l) & 1 == 1))
                .collect(),
        )
    }

    /// Samples a uniformly random point with `num_variables` coordinates.
    pub fn rand<R: Rng + ?Sized>(rng: &mut R, num_variables: usize) -> Self
    where
        StandardUniform: Distribution<F>,
    {
        Self((0..num_variables).map(|_| rng.random()).collect())
    }

    /// Computes `eq(self, other) = ∏ (x_l·y_l + (1 - x_l)(1 - y_l))`.
    ///
    /// # Panics
    /// Panics if the two points have different dimensions.
    #[must_use]
    pub fn eq_poly(&self, other: &Self) -> F {
        assert_eq!(self.num_variables(), other.num_variables());
        self.iter()
            .zip(other.iter())
            .map(|(&x, &y)| x * y + (F::ONE - x) * (F::ONE - y))
            .product()
    }
}

impl<F> Index<usize> for MultilinearPoint<F> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.0[index]
    }
}

impl<F> From<Vec<F>> for MultilinearPoint<F> {
    fn from(value: Vec<F>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use p3_baby_bear::BabyBear;
    use p3_field::PrimeCharacteristicRing;

    use super::*;

    type F = BabyBear;

    #[test]
    fn test_num_variables() {
        let point = MultilinearPoint::<F>::new(vec![F::ONE, F::ZERO, F::ONE]);
        assert_eq!(point.num_variables(), 3);
    }

    #[test]
    fn test_from_hypercube_index_uses_low_bit_first() {
        // 0b110 -> (0, 1, 1)
        let point = MultilinearPoint::<F>::from_hypercube_index(0b110, 3);
        assert_eq!(point.0, vec![F::ZERO, F::ONE, F::ONE]);
    }

    #[test]
    fn test_from_hypercube_index_truncates() {
        let point = MultilinearPoint::<F>::from_hypercube_index(0b1_0101, 3);
        assert_eq!(point.0, vec![F::ONE, F::ZERO, F::ONE]);
    }

    #[test]
    fn test_eq_poly_on_vertices_is_indicator() {
        for a in 0..4 {
            for b in 0..4 {
                let pa = MultilinearPoint::<F>::from_hypercube_index(a, 2);
                let pb = MultilinearPoint::<F>::from_hypercube_index(b, 2);
                let expected = if a == b { F::ONE } else { F::ZERO };
                assert_eq!(pa.eq_poly(&pb), expected);
            }
        }
    }
}
