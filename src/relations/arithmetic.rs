use p3_field::Field;

use super::{
    Column, ColumnValues, EdgeViews, Relation, RelationParameters, accumulate_into,
    vanishes_on_edge,
};
use crate::poly::univariate::Univariate;

/// Standard PLONK gate: `w_l·(q_m·w_r + q_l) + q_r·w_r + q_o·w_o + q_c = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArithmeticRelation;

impl ArithmeticRelation {
    /// Degree 3 (`q_m·w_l·w_r`), hence 4 evaluations.
    pub const LENGTH: usize = 4;

    const SELECTORS: [Column; 5] = [Column::QM, Column::QL, Column::QR, Column::QO, Column::QC];
}

type ArithmeticUnivariate<F> = Univariate<F, { ArithmeticRelation::LENGTH }>;

impl<F: Field> Relation<F> for ArithmeticRelation {
    fn name(&self) -> &'static str {
        "ArithmeticRelation"
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
        let w_l = ArithmeticUnivariate::from_view(edges[Column::WL]);
        let w_r = edges[Column::WR];

        let mut result = ArithmeticUnivariate::from_view(edges[Column::QM]) * w_r;
        result += edges[Column::QL];
        result *= w_l;
        result += ArithmeticUnivariate::from_view(edges[Column::QR]) * w_r;
        result += ArithmeticUnivariate::from_view(edges[Column::QO]) * edges[Column::WO];
        result += edges[Column::QC];
        result *= scaling;

        accumulate_into(acc, &result);
    }

    fn evaluate_full(&self, values: &ColumnValues<F>, _params: &RelationParameters<F>) -> F {
        let w_l = values[Column::WL];
        let w_r = values[Column::WR];
        w_l * (values[Column::QM] * w_r + values[Column::QL])
            + values[Column::QR] * w_r
            + values[Column::QO] * values[Column::WO]
            + values[Column::QC]
    }

    fn skip(&self, edges: &EdgeViews<'_, F>) -> bool {
        Self::SELECTORS
            .into_iter()
            .all(|selector| vanishes_on_edge(edges, selector))
    }
}

#[cfg(test)]
mod tests {
    use p3_baby_bear::BabyBear;
    use p3_field::PrimeCharacteristicRing;

    use super::*;
    use crate::relations::{AllEntities, test_utils::accumulate_once};

    type F = BabyBear;

    fn params() -> RelationParameters<F> {
        RelationParameters::new(F::ZERO, F::ZERO, F::ONE, 2)
    }

    #[test]
    fn test_accumulate_on_identical_linear_edges() {
        // Every column is the line through (0, 1) and (1, 2).
        let line: Univariate<F, 2> = Univariate::new([F::ONE, F::TWO]);
        let edges = AllEntities::from_fn(|_| line.extend_to::<{ ArithmeticRelation::LENGTH }>());

        let acc = accumulate_once(&ArithmeticRelation, &edges, &params(), F::ONE);

        // x·(x·x + x) + x·x + x·x + x at x = 1, 2, 3, 4
        let expected = [5, 22, 57, 116].map(F::from_u64);
        assert_eq!(acc, expected);

        let result = ArithmeticUnivariate::new(acc.try_into().unwrap());
        assert_eq!(result.evaluate(F::ONE), F::from_u64(22));
        assert_eq!(result.extend_to::<5>().value_at(4), F::from_u64(205));
    }

    #[test]
    fn test_accumulate_adds_scaled_contribution() {
        let line: Univariate<F, 2> = Univariate::new([F::ONE, F::TWO]);
        let edges = AllEntities::from_fn(|_| line.extend_to::<{ ArithmeticRelation::LENGTH }>());
        let views = edges.map(|_, u| u.full_view());

        let mut acc = [F::ONE; ArithmeticRelation::LENGTH];
        ArithmeticRelation.accumulate(&mut acc, &views, &params(), F::TWO);

        let expected = [5, 22, 57, 116].map(|v| F::ONE + F::TWO * F::from_u64(v));
        assert_eq!(acc, expected);
    }

    #[test]
    fn test_evaluate_full_on_a_satisfied_gate() {
        // 3·4 + 2·3 - 18 = 0
        let mut values = ColumnValues::<F>::default();
        values[Column::QM] = F::ONE;
        values[Column::QL] = F::TWO;
        values[Column::QO] = F::NEG_ONE;
        values[Column::WL] = F::from_u64(3);
        values[Column::WR] = F::from_u64(4);
        values[Column::WO] = F::from_u64(18);
        assert_eq!(ArithmeticRelation.evaluate_full(&values, &params()), F::ZERO);

        values[Column::WO] = F::from_u64(17);
        assert_eq!(ArithmeticRelation.evaluate_full(&values, &params()), F::ONE);
    }

    #[test]
    fn test_skip_requires_every_selector_to_vanish() {
        let mut edges = AllEntities::from_fn(|_| Univariate::<F, 4>::zero());
        let views = edges.map(|_, u| u.full_view());
        assert!(Relation::<F>::skip(&ArithmeticRelation, &views));

        edges[Column::QC] = Univariate::new([F::ZERO, F::ONE, F::TWO, F::from_u64(3)]);
        let views = edges.map(|_, u| u.full_view());
        assert!(!Relation::<F>::skip(&ArithmeticRelation, &views));
    }
}
