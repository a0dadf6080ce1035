//! impacts — direct, indirect and total effects for spatial lag models.
//!
//! Purpose
//! -------
//! Summarize how a change in one covariate propagates through the spatial
//! multiplier `(I − ρW)⁻¹`, using the trace summary computed once per
//! weights matrix and Monte Carlo draws from the fitted covariance.
//!
//! Key behaviors
//! -------------
//! - [`summarize`] returns an [`ImpactSummary`] with one
//!   [`CovariateImpacts`] row per covariate.
//! - Draws are seeded through [`ImpactOptions::seed`]; covariance matrices
//!   that are not positive definite are factored with clamped eigenvalues.
//!
//! Downstream usage
//! ----------------
//! - The pipeline calls [`summarize`] for the selected model when it has a
//!   spatial lag term.

pub mod errors;
mod sampling;
pub mod summary;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ImpactError, ImpactResult};
pub use self::summary::{
    summarize, CovariateImpacts, EffectEstimate, ImpactOptions, ImpactSummary,
    DEFAULT_IMPACT_DRAWS, DEFAULT_IMPACT_SEED,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{ImpactError, ImpactResult};
    pub use super::summary::{summarize, ImpactOptions, ImpactSummary};
}
