use p3_field::Field;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// Scalars shared by every relation of a proof.
///
/// They are derived by Fiat-Shamir before the sumcheck starts, so the sumcheck itself only
/// reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationParameters<F> {
    /// Permutation challenge multiplying the identity/sigma values.
    pub beta: F,
    /// Permutation challenge added to every wire term.
    pub gamma: F,
    /// Correction term of the grand product accounting for public inputs.
    pub public_input_delta: F,
    /// Number of rows of the instance.
    pub circuit_size: usize,
}

impl<F: Field> RelationParameters<F> {
    pub const fn new(beta: F, gamma: F, public_input_delta: F, circuit_size: usize) -> Self {
        Self {
            beta,
            gamma,
            public_input_delta,
            circuit_size,
        }
    }

    /// Parameters with random `beta` and `gamma` and no public inputs.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, circuit_size: usize) -> Self
    where
        StandardUniform: Distribution<F>,
    {
        Self::new(rng.random(), rng.random(), F::ONE, circuit_size)
    }

    /// Computes the public-input correction of the grand product.
    ///
    /// Public input `i` sits on the left wire of row `offset + i`, and is copied to a slot
    /// that the permutation does not see. The correction is
    ///
    /// ```text
    /// δ = ∏_i (x_i + γ + β·(offset + i)) / ∏_i (x_i + γ - β·(1 + offset + i))
    /// ```
    ///
    /// Returns `None` if a denominator vanishes.
    #[must_use]
    pub fn compute_public_input_delta(
        public_inputs: &[F],
        beta: F,
        gamma: F,
        offset: usize,
    ) -> Option<F> {
        let (numerator, denominator) = public_inputs.iter().enumerate().fold(
            (F::ONE, F::ONE),
            |(num, den), (i, &x)| {
                let row = F::from_u64((offset + i) as u64);
                (
                    num * (x + gamma + beta * row),
                    den * (x + gamma - beta * (row + F::ONE)),
                )
            },
        );
        denominator.try_inverse().map(|inv| numerator * inv)
    }
}

#[cfg(test)]
mod tests {
    use p3_baby_bear::BabyBear;
    use p3_field::PrimeCharacteristicRing;

    use super::*;

    type F = BabyBear;

    #[test]
    fn test_public_input_delta_without_inputs_is_one() {
        let delta =
            RelationParameters::<F>::compute_public_input_delta(&[], F::TWO, F::ONE, 0).unwrap();
        assert_eq!(delta, F::ONE);
    }

    #[test]
    fn test_public_input_delta_single_input() {
        let (x, beta, gamma) = (F::from_u64(7), F::from_u64(3), F::from_u64(5));
        let delta =
            RelationParameters::compute_public_input_delta(&[x], beta, gamma, 2).unwrap();

        // (7 + 5 + 3·2) / (7 + 5 - 3·3) = 18 / 3
        assert_eq!(delta, F::from_u64(6));
    }
}
