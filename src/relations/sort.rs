use p3_field::Field;

use super::{
    Column, ColumnValues, EdgeViews, Relation, RelationParameters, accumulate_into,
    vanishes_on_edge,
};
use crate::poly::univariate::Univariate;

/// Range check on a sorted list: consecutive values of `w_l` may only increase by 0, 1, 2 or 3.
///
/// `q_sort · d·(d - 1)·(d - 2)·(d - 3) = 0` with `d = w_l_shift - w_l`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortRelation;

impl SortRelation {
    /// Degree 5, hence 6 evaluations.
    pub const LENGTH: usize = 6;

    /// Largest step allowed between consecutive sorted values.
    pub const MAX_STEP: u64 = 3;
}

type SortUnivariate<F> = Univariate<F, { SortRelation::LENGTH }>;

impl<F: Field> Relation<F> for SortRelation {
    fn name(&self) -> &'static str {
        "SortRelation"
    }

    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn accumulate(
        &self,
        acc: &mut [F],
        edges: &EdgeViews<'_, F>,
        _params: &RelationParameters<F>,
        scaling: F,
    ) {
        let delta = SortUnivariate::from_view(edges[Column::WLShift]) - edges[Column::WL];

        let mut result = SortUnivariate::from_view(edges[Column::QSort]) * scaling;
        for step in 0..=Self::MAX_STEP {
            result *= delta - F::from_u64(step);
        }

        accumulate_into(acc, &result);
    }

    fn evaluate_full(&self, values: &ColumnValues<F>, _params: &RelationParameters<F>) -> F {
        let delta = values[Column::WLShift] - values[Column::WL];
        (0..=Self::MAX_STEP).fold(values[Column::QSort], |acc, step| {
            acc * (delta - F::from_u64(step))
        })
    }

    fn skip(&self, edges: &EdgeViews<'_, F>) -> bool {
        vanishes_on_edge(edges, Column::QSort)
    }
}

#[cfg(test)]
mod tests {
    use p3_baby_bear::BabyBear;
    use p3_field::PrimeCharacteristicRing;

    use super::*;

    type F = BabyBear;

    fn values_with_step(step: u64) -> ColumnValues<F> {
        let mut values = ColumnValues::<F>::default();
        values[Column::QSort] = F::ONE;
        values[Column::WL] = F::from_u64(10);
        values[Column::WLShift] = F::from_u64(10 + step);
        values
    }

    #[test]
    fn test_allowed_steps() {
        let params = RelationParameters::new(F::ZERO, F::ZERO, F::ONE, 2);
        for step in 0..=SortRelation::MAX_STEP {
            assert_eq!(
                SortRelation.evaluate_full(&values_with_step(step), &params),
                F::ZERO
            );
        }
    }

    #[test]
    fn test_rejected_step() {
        let params = RelationParameters::new(F::ZERO, F::ZERO, F::ONE, 2);
        // 4·3·2·1
        assert_eq!(
            SortRelation.evaluate_full(&values_with_step(4), &params),
            F::from_u64(24)
        );

        let mut unselected = values_with_step(4);
        unselected[Column::QSort] = F::ZERO;
        assert_eq!(SortRelation.evaluate_full(&unselected, &params), F::ZERO);
    }

    #[test]
    fn test_decreasing_step_is_rejected() {
        let params = RelationParameters::new(F::ZERO, F::ZERO, F::ONE, 2);
        let mut values = values_with_step(0);
        values[Column::WLShift] = F::from_u64(9);

        // (-1)(-2)(-3)(-4)
        assert_eq!(SortRelation.evaluate_full(&values, &params), F::from_u64(24));
    }
}
