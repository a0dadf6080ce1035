//! regression — designs, specifications, and spatial maximum-likelihood fits.
//!
//! Purpose
//! -------
//! Provide the regression-fitting capability used twice in the pipeline:
//! inside the accessibility calibration loop (one specification, many
//! designs) and by the model selector (four specifications, one design).
//!
//! Key behaviors
//! -------------
//! - [`Design`]: named, immutable regressor matrices with optional
//!   intercept, augmentation, and Durbin lagging.
//! - [`ModelSpec`]: OLS, spatial lag, spatial error, spatial Durbin.
//! - [`RegressionFitter`]: the `fit(design, outcome, weights, spec)` seam;
//!   [`MaxLikelihoodFitter`] implements it by concentrated ML.
//! - [`FittedModel`]: coefficients, standard errors, σ², ρ/λ,
//!   log-likelihood, AIC/BIC, fitted values, residuals, covariance.
//!
//! Invariants & assumptions
//! ------------------------
//! - Singular or collinear designs are reported as
//!   [`RegressionError::SingularDesign`]; nothing is dropped silently.
//! - Log-likelihoods are full Gaussian values, comparable across
//!   specifications fitted to the same outcome.
//!
//! Testing notes
//! -------------
//! - Estimator tests simulate SAR, SEM and SDM processes on rook lattices
//!   with seeded noise and check parameter recovery.

pub mod design;
pub mod errors;
mod estimators;
pub mod fitted;
pub mod fitter;
mod least_squares;
pub mod spec;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::design::{Design, INTERCEPT, LAG_PREFIX};
pub use self::errors::{RegressionError, RegressionResult};
pub use self::fitted::FittedModel;
pub use self::fitter::{FitOptions, MaxLikelihoodFitter, RegressionFitter};
pub use self::least_squares::COLLINEARITY_TOL;
pub use self::spec::ModelSpec;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::design::Design;
    pub use super::errors::{RegressionError, RegressionResult};
    pub use super::fitted::FittedModel;
    pub use super::fitter::{FitOptions, MaxLikelihoodFitter, RegressionFitter};
    pub use super::spec::ModelSpec;
}
