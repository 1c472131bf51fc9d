//! Constraint relations checked by the sumcheck.
//!
//! A relation is a polynomial expression `C` over the columns of the instance. The protocol
//! proves that `Σ_b pow_ζ(b) · Σ_i α^i · C_i(b) = 0` over the boolean hypercube, one relation
//! `C_i` per entry of a [`RelationSet`].
//!
//! Relations only see an edge of the hypercube at a time: every column restricted to the edge
//! is a univariate of degree 1, extended to enough points to describe `C` on that edge.

use alloc::{boxed::Box, vec, vec::Vec};
use core::fmt::Debug;

use p3_field::Field;

use crate::{poly::univariate::Univariate, sumcheck::errors::SumcheckError};

pub mod arithmetic;
pub mod columns;
pub mod instance;
pub mod parameters;
pub mod permutation;
pub mod sort;

pub use arithmetic::ArithmeticRelation;
pub use columns::{AllEntities, Column, ColumnValues, EdgeViews, NUM_COLUMNS};
pub use parameters::RelationParameters;
pub use permutation::{PermutationGrandProductRelation, PermutationInitializationRelation};
pub use sort::SortRelation;

/// A degree-bounded constraint over the instance columns.
pub trait Relation<F: Field>: Debug + Send + Sync {
    /// Human readable name, used in errors and traces.
    fn name(&self) -> &'static str;

    /// Number of evaluations that determine `C` on an edge, i.e. `1 + deg C`.
    fn length(&self) -> usize;

    /// Adds `scaling · C(edge)` pointwise to `acc`.
    ///
    /// `acc` holds exactly [`Self::length`] evaluations and every column of `edges` is a view
    /// of that same length.
    fn accumulate(
        &self,
        acc: &mut [F],
        edges: &EdgeViews<'_, F>,
        params: &RelationParameters<F>,
        scaling: F,
    );

    /// Evaluates `C` on plain column values.
    fn evaluate_full(&self, values: &ColumnValues<F>, params: &RelationParameters<F>) -> F;

    /// Whether `C` vanishes on the whole edge, so that its accumulation can be skipped.
    ///
    /// Returning `true` must never change the result of the round.
    fn skip(&self, _edges: &EdgeViews<'_, F>) -> bool {
        false
    }
}

/// Adds the evaluations of `value` into the first `N` entries of `acc`.
#[inline]
pub(crate) fn accumulate_into<F: Field, const N: usize>(acc: &mut [F], value: &Univariate<F, N>) {
    debug_assert_eq!(acc.len(), N);
    for (a, &v) in acc.iter_mut().zip(value.iter()) {
        *a += v;
    }
}

/// Returns true if `column` is zero at both endpoints of the edge.
#[inline]
pub(crate) fn vanishes_on_edge<F: Field>(edges: &EdgeViews<'_, F>, column: Column) -> bool {
    let edge = &edges[column];
    edge.value_at(0) == F::ZERO && edge.value_at(1) == F::ZERO
}

/// An ordered list of relations batched together with powers of `α`.
#[derive(Debug)]
pub struct RelationSet<F: Field> {
    relations: Vec<Box<dyn Relation<F>>>,
}

impl<F: Field> RelationSet<F> {
    #[must_use]
    pub const fn new(relations: Vec<Box<dyn Relation<F>>>) -> Self {
        Self { relations }
    }

    /// The relations of a standard Honk circuit: arithmetic gates, copy constraints and
    /// sorted range checks.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ArithmeticRelation),
            Box::new(PermutationGrandProductRelation),
            Box::new(PermutationInitializationRelation),
            Box::new(SortRelation),
        ])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Box<dyn Relation<F>>> {
        self.relations.iter()
    }

    /// Largest relation length, or 0 for an empty set.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.iter().map(|r| r.length()).max().unwrap_or(0)
    }

    /// Checks that the set can run in a sumcheck whose round polynomials have `max_length`
    /// evaluations.
    pub fn validate(&self, max_length: usize) -> Result<(), SumcheckError> {
        if self.is_empty() {
            return Err(SumcheckError::EmptyRelationSet);
        }
        for relation in self.iter() {
            if relation.length() > max_length {
                return Err(SumcheckError::RelationTooLong {
                    relation: relation.name(),
                    length: relation.length(),
                    max: max_length,
                });
            }
        }
        Ok(())
    }

    /// Computes `Σ_i α^i · C_i(values)`.
    #[must_use]
    pub fn batch_evaluations(
        &self,
        values: &ColumnValues<F>,
        params: &RelationParameters<F>,
        alpha: F,
    ) -> F {
        self.relations
            .iter()
            .rev()
            .fold(F::ZERO, |acc, relation| {
                acc * alpha + relation.evaluate_full(values, params)
            })
    }
}


#[cfg(test)]
mod tests {
    use p3_baby_bear::BabyBear;
    use p3_field::{PrimeCharacteristicRing, extension::BinomialExtensionField};
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use super::{test_utils::*, *};

    type F = BabyBear;
    type EF = BinomialExtensionField<F, 4>;

    /// Length large enough to test the degree bound of every standard relation.
    const MAX: usize = 8;

    #[test]
    fn test_standard_set() {
        let set = RelationSet::<EF>::standard();
        assert_eq!(set.len(), 4);
        assert_eq!(set.max_length(), SortRelation::LENGTH);

        let names: Vec<_> = set.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "ArithmeticRelation",
                "PermutationGrandProductRelation",
                "PermutationInitializationRelation",
                "SortRelation",
            ]
        );
    }

    #[test]
    fn test_validate() {
        let set = RelationSet::<EF>::standard();
        assert!(set.validate(6).is_ok());
        assert!(matches!(
            set.validate(5),
            Err(SumcheckError::RelationTooLong {
                relation: "SortRelation",
                length: 6,
                max: 5
            })
        ));
        assert!(matches!(
            RelationSet::<EF>::new(vec![]).validate(6),
            Err(SumcheckError::EmptyRelationSet)
        ));
    }

    #[test]
    fn test_degree_bounds_of_standard_relations() {
        let mut rng = SmallRng::seed_from_u64(1);
        let params = RelationParameters::<EF>::new(rng.random(), rng.random(), rng.random(), 8);

        for relation in RelationSet::<EF>::standard().iter() {
            for _ in 0..4 {
                assert_degree_bound::<EF, MAX, _>(relation.as_ref(), &params, &mut rng);
            }
        }
    }

    #[test]
    fn test_batch_evaluations_uses_increasing_powers_of_alpha() {
        let mut rng = SmallRng::seed_from_u64(2);
        let set = RelationSet::<EF>::standard();
        let params = RelationParameters::<EF>::new(rng.random(), rng.random(), rng.random(), 8);
        let values = ColumnValues::from_fn(|_| rng.random::<EF>());
        let alpha: EF = rng.random();

        let expected: EF = set
            .iter()
            .enumerate()
            .map(|(i, r)| alpha.exp_u64(i as u64) * r.evaluate_full(&values, &params))
            .sum();
        assert_eq!(set.batch_evaluations(&values, &params, alpha), expected);
    }

    #[test]
    fn test_skip_never_changes_the_result() {
        let mut rng = SmallRng::seed_from_u64(3);
        let params = RelationParameters::<EF>::new(rng.random(), rng.random(), rng.random(), 8);

        for relation in RelationSet::<EF>::standard().iter() {
            let mut edges = random_extended_edges::<EF, MAX, _>(&mut rng);
            for column in [
                Column::QM,
                Column::QL,
                Column::QR,
                Column::QO,
                Column::QC,
                Column::QSort,
                Column::LagrangeLast,
            ] {
                edges[column] = Univariate::zero();
            }
            let views = edges.map(|_, u| u.view_prefix(relation.length()));
            if relation.skip(&views) {
                let acc = accumulate_once(relation.as_ref(), &edges, &params, EF::ONE);
                assert!(acc.iter().all(|v| *v == EF::ZERO), "{}", relation.name());
            }
        }
    }
}
