//! statistical_tests — model-comparison tests.
//!
//! Purpose
//! -------
//! Collect the statistical tests used to choose between nested regression
//! specifications. This subtree implements the likelihood-ratio test
//! together with shared input validation and error handling.
//!
//! Key behaviors
//! -------------
//! - [`LROutcome::likelihood_ratio`] forms the LR statistic, its degrees of
//!   freedom, and the χ² upper-tail p-value.
//! - [`validation`] centralizes finiteness and significance-level checks.
//! - [`LRError`] / [`LRResult`] are the error surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are log-likelihoods of models fitted to the same observations.
//! - Tests never panic on user-facing invalid inputs.
//!
//! Downstream usage
//! ----------------
//! - `selection::compare` wraps [`LROutcome::likelihood_ratio`] for two
//!   fitted models and applies the "keep the simpler model unless rejected"
//!   policy.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the self-comparison case (p = 1), a known χ²₁ quantile,
//!   clamping, the non-nested error, and every validation branch.

pub mod errors;
pub mod likelihood_ratio;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{LRError, LRResult};
pub use self::likelihood_ratio::LROutcome;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can `use park_access::statistical_tests::prelude::*;`
// to import the primary statistical-test surface in a single line.

pub mod prelude {
    pub use super::errors::{LRError, LRResult};
    pub use super::likelihood_ratio::LROutcome;
}
