//! Random instances satisfying the standard relation set.
//!
//! The first half of the rows is a chain of arithmetic gates where the output of each gate is
//! copied into the left wire of the next one. The second half is a sorted list checked by the
//! range relation. The grand product is then computed over the resulting copy constraints.
//! Public inputs, when requested, take the rows just before the chain.

use alloc::vec::Vec;

use p3_field::{Field, batch_multiplicative_inverse};
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use tracing::instrument;

use super::{AllEntities, Column, ColumnValues, RelationParameters, RelationSet, SortRelation};
use crate::poly::evals::EvaluationsList;

/// First row holding a public input. Row 0 is left empty.
pub const PUBLIC_INPUTS_OFFSET: usize = 1;

/// A full set of columns together with the parameters they were built for.
#[derive(Debug, Clone)]
pub struct HonkInstance<F> {
    pub columns: AllEntities<EvaluationsList<F>>,
    pub params: RelationParameters<F>,
    /// Values on the left wire of rows `PUBLIC_INPUTS_OFFSET..`.
    pub public_inputs: Vec<F>,
}

impl<F: Field> HonkInstance<F>
where
    StandardUniform: Distribution<F>,
{
    /// Samples an instance over `2^num_variables` rows satisfying every standard relation.
    pub fn random<R: Rng + ?Sized>(num_variables: usize, rng: &mut R) -> Self {
        Self::random_with_public_inputs(num_variables, 0, rng)
    }

    /// Largest number of public inputs [`Self::random_with_public_inputs`] accepts.
    #[must_use]
    pub const fn max_public_inputs(num_variables: usize) -> usize {
        let num_gates = 1 << num_variables.saturating_sub(1);
        num_gates.saturating_sub(PUBLIC_INPUTS_OFFSET + 1)
    }

    /// Samples a satisfying instance whose left wire carries `num_public_inputs` random public
    /// inputs.
    ///
    /// Public input `i` sits on row `PUBLIC_INPUTS_OFFSET + i` with every selector off. Its
    /// sigma points outside the permutation, so the grand product closes on the
    /// `public_input_delta` of the parameters instead of one.
    ///
    /// # Panics
    /// Panics if `num_public_inputs` exceeds [`Self::max_public_inputs`].
    #[instrument(skip(rng))]
    pub fn random_with_public_inputs<R: Rng + ?Sized>(
        num_variables: usize,
        num_public_inputs: usize,
        rng: &mut R,
    ) -> Self {
        assert!(
            num_public_inputs <= Self::max_public_inputs(num_variables),
            "{num_public_inputs} public inputs do not fit in 2^{num_variables} rows"
        );

        let n = 1 << num_variables;
        let num_gates = (n / 2).max(1);
        let chain_start = if num_public_inputs == 0 {
            0
        } else {
            PUBLIC_INPUTS_OFFSET + num_public_inputs
        };
        let mut rows: AllEntities<Vec<F>> = AllEntities::from_fn(|_| F::zero_vec(n));

        // Public inputs, with every selector off.
        let public_inputs: Vec<F> = (0..num_public_inputs).map(|_| rng.random()).collect();
        for (i, &x) in public_inputs.iter().enumerate() {
            let row = PUBLIC_INPUTS_OFFSET + i;
            rows[Column::WL][row] = x;
            rows[Column::WR][row] = rng.random();
            rows[Column::WO][row] = rng.random();
        }

        // Arithmetic chain.
        for i in chain_start..num_gates {
            let (q_m, q_l, q_r, q_c): (F, F, F, F) =
                (rng.random(), rng.random(), rng.random(), rng.random());
            let w_l = if i == chain_start {
                rng.random()
            } else {
                rows[Column::WO][i - 1]
            };
            let w_r: F = rng.random();

            rows[Column::QM][i] = q_m;
            rows[Column::QL][i] = q_l;
            rows[Column::QR][i] = q_r;
            rows[Column::QO][i] = F::NEG_ONE;
            rows[Column::QC][i] = q_c;
            rows[Column::WL][i] = w_l;
            rows[Column::WR][i] = w_r;
            rows[Column::WO][i] = w_l * (q_m * w_r + q_l) + q_r * w_r + q_c;
        }

        // Sorted list.
        if num_gates < n {
            let mut value: F = rng.random();
            for i in num_gates..n {
                rows[Column::WL][i] = value;
                rows[Column::WR][i] = rng.random();
                rows[Column::WO][i] = rng.random();
                rows[Column::QSort][i] = F::from_bool(i + 1 < n);
                value += F::from_u64(rng.random_range(0..=SortRelation::MAX_STEP));
            }
        }

        // Identity permutation, then one transposition per chained gate.
        for i in 0..n {
            for (k, (id, sigma)) in [
                (Column::Id1, Column::Sigma1),
                (Column::Id2, Column::Sigma2),
                (Column::Id3, Column::Sigma3),
            ]
            .into_iter()
            .enumerate()
            {
                let label = F::from_u64((k * n + i) as u64);
                rows[id][i] = label;
                rows[sigma][i] = label;
            }
        }
        for i in chain_start..num_gates.saturating_sub(1) {
            rows[Column::Sigma3][i] = rows[Column::Id1][i + 1];
            rows[Column::Sigma1][i + 1] = rows[Column::Id3][i];
        }

        // Public inputs are copied to the label `-(row + 1)`, which no identity column holds.
        for i in 0..num_public_inputs {
            let row = PUBLIC_INPUTS_OFFSET + i;
            rows[Column::Sigma1][row] = -F::from_u64((row + 1) as u64);
        }

        rows[Column::LagrangeFirst][0] = F::ONE;
        rows[Column::LagrangeLast][n - 1] = F::ONE;

        // Resample in the negligible case where a denominator of the correction vanishes.
        let (beta, gamma, delta) = loop {
            let (beta, gamma): (F, F) = (rng.random(), rng.random());
            if let Some(delta) = RelationParameters::compute_public_input_delta(
                &public_inputs,
                beta,
                gamma,
                PUBLIC_INPUTS_OFFSET,
            ) {
                break (beta, gamma, delta);
            }
        };
        let product = Self::fill_grand_product(&mut rows, beta, gamma);
        debug_assert_eq!(product, delta);

        for i in 0..n - 1 {
            rows[Column::WLShift][i] = rows[Column::WL][i + 1];
            rows[Column::ZPermShift][i] = rows[Column::ZPerm][i + 1];
        }

        Self {
            columns: rows.into_map(|_, column| EvaluationsList::new(column)),
            params: RelationParameters::new(beta, gamma, delta, n),
            public_inputs,
        }
    }

    /// Writes `z_perm` and returns the product of every row ratio.
    ///
    /// The grand product relation holds on the last row exactly when this product equals the
    /// public-input correction.
    fn fill_grand_product(rows: &mut AllEntities<Vec<F>>, beta: F, gamma: F) -> F {
        let n = rows[Column::WL].len();
        let numerators: Vec<F> = (0..n)
            .map(|i| wire_product(rows, i, beta, gamma, [Column::Id1, Column::Id2, Column::Id3]))
            .collect();
        let denominators: Vec<F> = (0..n)
            .map(|i| {
                wire_product(rows, i, beta, gamma, [Column::Sigma1, Column::Sigma2, Column::Sigma3])
            })
            .collect();
        let inverses = batch_multiplicative_inverse(&denominators);

        // z_perm[0] = 0 and z_perm[i + 1] = ∏_{j <= i} num_j / den_j.
        let mut running = F::ONE;
        for (i, (&num, &inv)) in numerators.iter().zip(&inverses).enumerate() {
            running *= num * inv;
            if i + 1 < n {
                rows[Column::ZPerm][i + 1] = running;
            }
        }
        running
    }
}

/// `∏_k (w_k + β·s_k + γ)` at row `i`, for the three wires and the given permutation columns.
fn wire_product<F: Field>(
    rows: &AllEntities<Vec<F>>,
    i: usize,
    beta: F,
    gamma: F,
    permutation: [Column; 3],
) -> F {
    [Column::WL, Column::WR, Column::WO]
        .into_iter()
        .zip(permutation)
        .map(|(wire, s)| rows[wire][i] + beta * rows[s][i] + gamma)
        .product()
}

impl<F: Field> HonkInstance<F> {
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.columns[Column::WL].num_variables()
    }

    /// Values of every column at row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> ColumnValues<F> {
        ColumnValues::at_index(&self.columns, i)
    }

    /// Rows on which some relation does not vanish, with the name of that relation.
    #[must_use]
    pub fn unsatisfied_rows(&self, relations: &RelationSet<F>) -> Vec<(usize, &'static str)> {
        (0..1 << self.num_variables())
            .flat_map(|i| {
                let row = self.row(i);
                relations
                    .iter()
                    .filter(|relation| relation.evaluate_full(&row, &self.params) != F::ZERO)
                    .map(|relation| (i, relation.name()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Adds one to a single entry of a column.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn corrupt(&mut self, column: Column, index: usize) {
        self.columns[column].0[index] += F::ONE;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use p3_baby_bear::BabyBear;
    use p3_field::{PrimeCharacteristicRing, extension::BinomialExtensionField};
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    type F = BabyBear;
    type EF = BinomialExtensionField<F, 4>;

    #[test]
    fn test_single_row_instance() {
        let mut rng = SmallRng::seed_from_u64(0);
        let instance = HonkInstance::<EF>::random(0, &mut rng);

        assert_eq!(instance.num_variables(), 0);
        assert!(instance.unsatisfied_rows(&RelationSet::standard()).is_empty());
    }

    #[test]
    fn test_no_public_inputs_means_unit_delta() {
        let mut rng = SmallRng::seed_from_u64(1);
        let instance = HonkInstance::<EF>::random(4, &mut rng);
        assert_eq!(instance.params.public_input_delta, EF::ONE);
    }

    #[test]
    fn test_corruption_breaks_a_relation() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut instance = HonkInstance::<EF>::random(3, &mut rng);
        instance.corrupt(Column::WO, 1);

        let broken = instance.unsatisfied_rows(&RelationSet::standard());
        assert!(broken.contains(&(1, "ArithmeticRelation")));
    }

    #[test]
    fn test_public_inputs_sit_on_the_left_wire() {
        let mut rng = SmallRng::seed_from_u64(3);
        let instance = HonkInstance::<EF>::random_with_public_inputs(4, 3, &mut rng);

        assert_eq!(instance.public_inputs.len(), 3);
        for (i, &x) in instance.public_inputs.iter().enumerate() {
            let row = instance.row(PUBLIC_INPUTS_OFFSET + i);
            assert_eq!(row[Column::WL], x);
            assert_eq!(row[Column::QM], EF::ZERO);
            assert_eq!(row[Column::QO], EF::ZERO);
        }

        let params = instance.params;
        assert_ne!(params.public_input_delta, EF::ONE);
        assert_eq!(
            RelationParameters::compute_public_input_delta(
                &instance.public_inputs,
                params.beta,
                params.gamma,
                PUBLIC_INPUTS_OFFSET,
            ),
            Some(params.public_input_delta)
        );
    }

    #[test]
    fn test_wrong_delta_breaks_the_last_row() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut instance = HonkInstance::<EF>::random_with_public_inputs(3, 2, &mut rng);
        instance.params.public_input_delta = EF::ONE;

        let broken = instance.unsatisfied_rows(&RelationSet::standard());
        assert_eq!(broken, vec![(7, "PermutationGrandProductRelation")]);
    }

    #[test]
    #[should_panic]
    fn test_too_many_public_inputs() {
        let mut rng = SmallRng::seed_from_u64(5);
        let max = HonkInstance::<EF>::max_public_inputs(3);
        let _ = HonkInstance::<EF>::random_with_public_inputs(3, max + 1, &mut rng);
    }

    proptest! {
        #[test]
        fn prop_instances_with_public_inputs_are_satisfied(
            seed in any::<u64>(),
            n in 3usize..7,
            k in any::<prop::sample::Index>(),
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let k = k.index(HonkInstance::<EF>::max_public_inputs(n) + 1);
            let instance = HonkInstance::<EF>::random_with_public_inputs(n, k, &mut rng);

            prop_assert_eq!(instance.public_inputs.len(), k);
            prop_assert!(instance.unsatisfied_rows(&RelationSet::standard()).is_empty());
        }

        #[test]
        fn prop_random_instances_are_satisfied(seed in any::<u64>(), n in 0usize..7) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let instance = HonkInstance::<EF>::random(n, &mut rng);

            prop_assert_eq!(instance.num_variables(), n);
            prop_assert!(instance.unsatisfied_rows(&RelationSet::standard()).is_empty());
        }
    }
}
