//! Regression models and inference for the donor tables.
//!
//! The library is organized by concern:
//!
//! - [`design`]: design-matrix construction (dummy expansion,
//!   interactions, listwise deletion)
//! - [`ols`]: linear models with classical and HC1 robust standard errors
//! - [`logit`]: logistic regression via iteratively reweighted least
//!   squares, plus average marginal effects with delta-method standard
//!   errors
//! - [`inference`]: normal and Student-t tail probabilities
//!
//! All fits are deterministic: no randomness, fixed iteration limits,
//! fixed convergence tolerances.

pub mod design;
mod error;
pub mod inference;
pub mod logit;
pub mod ols;
mod solve;

pub use design::{DataColumns, Design, Term};
pub use error::{Result, StatsError};
pub use logit::{LogitFit, MarginalEffect, fit_logit};
pub use ols::{OlsFit, VarianceKind, fit_ols};

/// A fitted coefficient with its inference.
#[derive(Debug, Clone)]
pub struct Coefficient {
    /// Design-column name.
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl Coefficient {
    /// Look up a coefficient by design-column name.
    pub fn find<'a>(coefficients: &'a [Coefficient], name: &str) -> Option<&'a Coefficient> {
        coefficients.iter().find(|c| c.name == name)
    }
}
