use p3_field::Field;
use serde::{Deserialize, Serialize};

/// Partially evaluated pow polynomial `pow_ζ(X_0, …, X_{d-1}) = ∏_l ((1 - X_l) + X_l · ζ^{2^l})`.
///
/// On the boolean hypercube `pow_ζ(b) = ζ^b`, reading `b` as an integer whose bit `l` is `X_l`.
/// Before round `l`, the variables `X_0..X_{l-1}` are bound to the round challenges and their
/// product is kept in `partial_evaluation_constant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowRandomizer<F> {
    /// `ζ^{2^l}`, the coefficient of the current variable.
    zeta_pow: F,
    /// `ζ^{2^{l+1}}`, the step between two consecutive edges of the current round.
    zeta_pow_sqr: F,
    /// `∏_{j<l} (1 + u_j · (ζ^{2^j} - 1))`.
    partial_evaluation_constant: F,
}

impl<F: Field> PowRandomizer<F> {
    #[must_use]
    pub fn new(zeta: F) -> Self {
        Self {
            zeta_pow: zeta,
            zeta_pow_sqr: zeta.square(),
            partial_evaluation_constant: F::ONE,
        }
    }

    #[must_use]
    pub const fn zeta_pow(&self) -> F {
        self.zeta_pow
    }

    #[must_use]
    pub const fn zeta_pow_sqr(&self) -> F {
        self.zeta_pow_sqr
    }

    #[must_use]
    pub const fn partial_evaluation_constant(&self) -> F {
        self.partial_evaluation_constant
    }

    /// The factor of the current variable, `(1 - X) + X · ζ^{2^l}`, at `X = challenge`.
    #[must_use]
    pub fn univariate_eval(&self, challenge: F) -> F {
        F::ONE + challenge * (self.zeta_pow - F::ONE)
    }

    /// Scaling applied to edge `edge` of the current round, `partial · (ζ^{2^{l+1}})^edge`.
    #[must_use]
    pub fn edge_scaling(&self, edge: usize) -> F {
        self.partial_evaluation_constant * self.zeta_pow_sqr.exp_u64(edge as u64)
    }

    /// Binds the current variable to `challenge` and moves to the next one.
    pub fn fold(&mut self, challenge: F) {
        self.partial_evaluation_constant *= self.univariate_eval(challenge);
        self.zeta_pow = self.zeta_pow_sqr;
        self.zeta_pow_sqr = self.zeta_pow_sqr.square();
    }
}
