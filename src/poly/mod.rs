pub mod barycentric;
pub mod evals;
pub mod multilinear;
pub mod univariate;
