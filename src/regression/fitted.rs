//! regression::fitted — immutable estimator results.
use crate::{inference::hessian::CovarianceEstimate, regression::spec::ModelSpec};
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Normal};

/// Result of fitting one specification.
///
/// `covariance`, when present, is over `(β, ρ)` for spatial models (ρ last;
/// for the error model this is λ) and over `β` for OLS. σ² is a nuisance
/// parameter and excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub(crate) spec: ModelSpec,
    pub(crate) names: Vec<String>,
    pub(crate) coefficients: Array1<f64>,
    pub(crate) std_errors: Array1<f64>,
    pub(crate) sigma2: f64,
    pub(crate) rho: Option<f64>,
    pub(crate) rho_std_error: Option<f64>,
    pub(crate) log_likelihood: f64,
    pub(crate) n_obs: usize,
    pub(crate) fitted: Array1<f64>,
    pub(crate) residuals: Array1<f64>,
    pub(crate) covariance: Option<CovarianceEstimate>,
    pub(crate) durbin_pairs: Vec<(usize, usize)>,
    pub(crate) has_intercept: bool,
}

impl FittedModel {
    pub fn spec(&self) -> ModelSpec {
        self.spec
    }

    /// Coefficient names in estimation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn std_errors(&self) -> &Array1<f64> {
        &self.std_errors
    }

    /// Maximum-likelihood residual variance `e'e / n`.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Spatial autoregressive parameter: ρ for lag/Durbin, λ for error.
    pub fn rho(&self) -> Option<f64> {
        self.rho
    }

    pub fn rho_std_error(&self) -> Option<f64> {
        self.rho_std_error
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn fitted(&self) -> &Array1<f64> {
        &self.fitted
    }

    pub fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }

    pub fn covariance(&self) -> Option<&CovarianceEstimate> {
        self.covariance.as_ref()
    }

    /// `(base, lagged)` coefficient positions of Durbin `WX` terms.
    pub fn durbin_pairs(&self) -> &[(usize, usize)] {
        &self.durbin_pairs
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Free parameters: coefficients, σ², and the spatial parameter if any.
    pub fn n_params(&self) -> usize {
        self.coefficients.len() + 1 + usize::from(self.rho.is_some())
    }

    pub fn aic(&self) -> f64 {
        2.0 * self.n_params() as f64 - 2.0 * self.log_likelihood
    }

    pub fn bic(&self) -> f64 {
        (self.n_obs as f64).ln() * self.n_params() as f64 - 2.0 * self.log_likelihood
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.position(name).map(|j| self.coefficients[j])
    }

    pub fn std_error(&self, name: &str) -> Option<f64> {
        self.position(name).map(|j| self.std_errors[j])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Two-sided normal p-values of the coefficients; NaN where no standard
    /// error is available.
    pub fn p_values(&self) -> Array1<f64> {
        let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
        self.coefficients
            .iter()
            .zip(self.std_errors.iter())
            .map(|(&b, &se)| {
                if se > 0.0 && se.is_finite() {
                    2.0 * (1.0 - normal.cdf((b / se).abs()))
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}
