//! Copy constraints via a grand product over the three wires.
//!
//! With `z_perm` the running product, every row must satisfy
//!
//! ```text
//! (z_perm + L_first) · ∏_k (w_k + β·id_k + γ) = (z_perm_shift + L_last·δ) · ∏_k (w_k + β·σ_k + γ)
//! ```
//!
//! and the accumulator must be closed after the last row (`L_last · z_perm_shift = 0`).

use p3_field::Field;

use super::{
    Column, ColumnValues, EdgeViews, Relation, RelationParameters, accumulate_into,
    vanishes_on_edge,
};
use crate::poly::univariate::Univariate;

/// `(wire, identity, sigma)` for each of the three permuted wires.
const WIRES: [(Column, Column, Column); 3] = [
    (Column::WL, Column::Id1, Column::Sigma1),
    (Column::WR, Column::Id2, Column::Sigma2),
    (Column::WO, Column::Id3, Column::Sigma3),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermutationGrandProductRelation;

impl PermutationGrandProductRelation {
    /// `z_perm` times three wire terms: degree 4.
    pub const LENGTH: usize = 5;
}

type GrandProductUnivariate<F> = Univariate<F, { PermutationGrandProductRelation::LENGTH }>;

/// `w + β·s + γ` over the edge.
fn wire_term<F: Field>(
    edges: &EdgeViews<'_, F>,
    wire: Column,
    permutation: Column,
    params: &RelationParameters<F>,
) -> GrandProductUnivariate<F> {
    let mut term = GrandProductUnivariate::from_view(edges[permutation]) * params.beta;
    term += edges[wire];
    term + params.gamma
}

impl<F: Field> Relation<F> for PermutationGrandProductRelation {
    fn name(&self) -> &'static str {
        "PermutationGrandProductRelation"
    }

    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn accumulate(
        &self,
        acc: &mut [F],
        edges: &EdgeViews<'_, F>,
        params: &RelationParameters<F>,
        scaling: F,
    ) {
        let mut numerator = GrandProductUnivariate::from_view(edges[Column::ZPerm]);
        numerator += edges[Column::LagrangeFirst];

        let mut denominator =
            GrandProductUnivariate::from_view(edges[Column::LagrangeLast]) * params.public_input_delta;
        denominator += edges[Column::ZPermShift];

        for (wire, id, sigma) in WIRES {
            numerator *= wire_term(edges, wire, id, params);
            denominator *= wire_term(edges, wire, sigma, params);
        }

        let result = (numerator - denominator) * scaling;
        accumulate_into(acc, &result);
    }

    fn evaluate_full(&self, values: &ColumnValues<F>, params: &RelationParameters<F>) -> F {
        let term = |wire: Column, s: Column| values[wire] + params.beta * values[s] + params.gamma;

        let numerator = WIRES
            .iter()
            .fold(values[Column::ZPerm] + values[Column::LagrangeFirst], |acc, &(w, id, _)| {
                acc * term(w, id)
            });
        let denominator = WIRES.iter().fold(
            values[Column::ZPermShift] + values[Column::LagrangeLast] * params.public_input_delta,
            |acc, &(w, _, sigma)| acc * term(w, sigma),
        );

        numerator - denominator
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermutationInitializationRelation;

impl PermutationInitializationRelation {
    pub const LENGTH: usize = 3;
}

type InitializationUnivariate<F> = Univariate<F, { PermutationInitializationRelation::LENGTH }>;

impl<F: Field> Relation<F> for PermutationInitializationRelation {
    fn name(&self) -> &'static str {
        "PermutationInitializationRelation"
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
        let mut result = InitializationUnivariate::from_view(edges[Column::LagrangeLast]);
        result *= edges[Column::ZPermShift];
        result *= scaling;
        accumulate_into(acc, &result);
    }

    fn evaluate_full(&self, values: &ColumnValues<F>, _params: &RelationParameters<F>) -> F {
        values[Column::LagrangeLast] * values[Column::ZPermShift]
    }

    fn skip(&self, edges: &EdgeViews<'_, F>) -> bool {
        vanishes_on_edge(edges, Column::LagrangeLast)
    }
}
