//! regression::fitter — the regression-fitting capability.
//!
//! Purpose
//! -------
//! Define the seam between the accessibility calibrator / model selector
//! and the estimators: anything that can turn `(design, outcome, weights,
//! specification)` into a [`FittedModel`] implements [`RegressionFitter`].
//! [`MaxLikelihoodFitter`] is the built-in implementation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are borrowed and never mutated; every call returns a new model.
//! - Spatial specifications require weights covering exactly the design's
//!   rows; OLS ignores weights.
use crate::{
    optimization::loglik_optimizer::brent::{DEFAULT_SCALAR_MAX_ITER, DEFAULT_SCALAR_TOL},
    regression::{
        design::Design,
        errors::{RegressionError, RegressionResult},
        estimators::{fit_error, fit_lag, fit_ols},
        fitted::FittedModel,
        spec::ModelSpec,
    },
    spatial::weights::SpatialWeights,
};
use ndarray::ArrayView1;

/// Fit one specification over a design.
pub trait RegressionFitter {
    fn fit(
        &self, design: &Design, outcome: ArrayView1<f64>, weights: Option<&SpatialWeights>,
        spec: ModelSpec,
    ) -> RegressionResult<FittedModel>;
}

/// Options of [`MaxLikelihoodFitter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Absolute tolerance of the ρ/λ search.
    pub rho_tol: f64,
    /// Iteration cap of the ρ/λ search.
    pub max_iter: u64,
    /// Attempt the observed-information covariance before the conditional
    /// fallback.
    pub covariance: bool,
}

impl FitOptions {
    pub fn new(rho_tol: f64, max_iter: u64, covariance: bool) -> RegressionResult<Self> {
        if !rho_tol.is_finite() || rho_tol <= 0.0 {
            return Err(RegressionError::InvalidOption {
                name: "rho_tol",
                value: rho_tol,
                reason: "must be finite and > 0",
            });
        }
        if max_iter == 0 {
            return Err(RegressionError::InvalidOption {
                name: "max_iter",
                value: 0.0,
                reason: "must be >= 1",
            });
        }
        Ok(FitOptions { rho_tol, max_iter, covariance })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions { rho_tol: DEFAULT_SCALAR_TOL, max_iter: DEFAULT_SCALAR_MAX_ITER, covariance: true }
    }
}

/// Gaussian (concentrated) maximum-likelihood estimator for all four
/// specifications.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaxLikelihoodFitter {
    pub opts: FitOptions,
}

impl MaxLikelihoodFitter {
    pub fn new(opts: FitOptions) -> Self {
        MaxLikelihoodFitter { opts }
    }
}

impl RegressionFitter for MaxLikelihoodFitter {
    fn fit(
        &self, design: &Design, outcome: ArrayView1<f64>, weights: Option<&SpatialWeights>,
        spec: ModelSpec,
    ) -> RegressionResult<FittedModel> {
        if outcome.len() != design.n_obs() {
            return Err(RegressionError::DimensionMismatch {
                what: "outcome",
                expected: design.n_obs(),
                found: outcome.len(),
            });
        }
        if let Some((index, &value)) = outcome.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegressionError::NonFiniteValue { what: "outcome", index, value });
        }
        if !spec.is_spatial() {
            return fit_ols(design, outcome);
        }

        let weights = weights.ok_or(RegressionError::MissingWeights { spec })?;
        if weights.len() != design.n_obs() {
            return Err(RegressionError::WeightsSizeMismatch {
                expected: design.n_obs(),
                found: weights.len(),
            });
        }
        match spec {
            ModelSpec::Lag => fit_lag(design, outcome, weights, &self.opts, spec, Vec::new()),
            ModelSpec::Error => fit_error(design, outcome, weights, &self.opts),
            ModelSpec::Durbin => {
                let (lagged, pairs) = design.lagged(weights)?;
                fit_lag(&lagged, outcome, weights, &self.opts, spec, pairs)
            }
            ModelSpec::Ols => fit_ols(design, outcome),
        }
    }
}
