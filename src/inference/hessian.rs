//! inference::hessian — parameter covariance from observed information.
//!
//! Purpose
//! -------
//! Turn the curvature of a log-likelihood at its maximum into a parameter
//! covariance matrix. The spatial estimators hand in their analytic score;
//! this module differentiates it numerically, inverts the resulting
//! information, and records which inversion path was taken.
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`] runs [`compute_hessian`] on the score
//!   `θ ↦ ∇ℓ(θ)` and negates it to obtain the observed information
//!   `J(θ̂) = −∇²ℓ(θ̂)`.
//! - [`invert_information`] tries a Cholesky factorization first
//!   ([`CovarianceSource::ObservedInformation`]). When `J` is not positive
//!   definite it falls back to a Moore–Penrose pseudo-inverse over the
//!   eigen-directions with eigenvalue above [`EIGEN_EPS`]
//!   ([`CovarianceSource::PseudoInverse`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `J` is treated as symmetric; [`compute_hessian`] already symmetrizes.
//! - Directions with non-positive curvature are dropped from the
//!   pseudo-inverse, so their variance contribution is zero.
//!
//! Conventions
//! -----------
//! - Hessians are on the **summed** log-likelihood scale, so the returned
//!   covariance is the usual asymptotic covariance of θ̂.
//! - Conversion between `ndarray` and `nalgebra` happens only here.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the Cholesky path against an analytic inverse, the
//!   pseudo-inverse fallback on an indefinite matrix, and the score-based
//!   entry point on a Gaussian log-likelihood.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::{
        errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
        numerical_stability::transformations::EIGEN_EPS,
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Which estimator produced a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovarianceSource {
    /// Closed form (e.g. `σ²(X'X)⁻¹` for least squares).
    Analytic,
    /// Cholesky inverse of a positive-definite observed information.
    ObservedInformation,
    /// Eigenvalue-truncated pseudo-inverse; information was not positive
    /// definite.
    PseudoInverse,
    /// Conditional on the spatial parameter: `σ²(Z'Z)⁻¹` for the
    /// coefficients and the inverse curvature of the concentrated
    /// likelihood for ρ, with zero cross-covariance.
    Conditional,
}

/// Parameter covariance together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceEstimate {
    pub matrix: Array2<f64>,
    pub source: CovarianceSource,
}

impl CovarianceEstimate {
    /// Square roots of the diagonal; negative round-off is clamped to zero.
    pub fn standard_errors(&self) -> Array1<f64> {
        self.matrix.diag().mapv(|v| v.max(0.0).sqrt())
    }
}

/// calc_covariance — covariance of θ̂ from a log-likelihood score.
///
/// Parameters
/// ----------
/// - `score`: `&F`
///   Gradient of the log-likelihood, `θ ↦ ∇ℓ(θ)`, in the same
///   parameterization as `theta_hat`.
/// - `theta_hat`: `&Array1<f64>`
///   Maximum-likelihood estimate.
///
/// Errors
/// ------
/// - `InferenceError::Optimization` if the score fails or the numerical
///   Hessian is non-finite.
/// - Any error from [`invert_information`].
pub fn calc_covariance<F>(score: &F, theta_hat: &Array1<f64>) -> InferenceResult<CovarianceEstimate>
where
    F: Fn(&Array1<f64>) -> OptResult<Array1<f64>>,
{
    let hessian = compute_hessian(score, theta_hat)?;
    let information = -hessian;
    invert_information(&information)
}

/// invert_information — invert an observed information matrix.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` for a non-square input.
/// - `InferenceError::NonFiniteInformation` for NaN/∞ entries.
/// - `InferenceError::NoPositiveCurvature` when every eigenvalue is at or
///   below [`EIGEN_EPS`].
pub fn invert_information(information: &Array2<f64>) -> InferenceResult<CovarianceEstimate> {
    let n = information.nrows();
    if information.ncols() != n {
        return Err(InferenceError::DimensionMismatch {
            expected: n,
            found: (information.nrows(), information.ncols()),
        });
    }
    if let Some(((row, col), &value)) = information.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteInformation { row, col, value });
    }

    let mut info_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(information, &mut info_nalg);
    if let Some(chol) = info_nalg.clone().cholesky() {
        let inv = chol.inverse();
        return Ok(CovarianceEstimate {
            matrix: to_array2(&inv),
            source: CovarianceSource::ObservedInformation,
        });
    }
    Ok(CovarianceEstimate {
        matrix: pseudo_inverse(info_nalg)?,
        source: CovarianceSource::PseudoInverse,
    })
}

// ---- Helper methods ----

fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &v) in src.indexed_iter() {
        dst[(i, j)] = v;
    }
}

fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn pseudo_inverse(info: DMatrix<f64>) -> InferenceResult<Array2<f64>> {
    let n = info.nrows();
    let eigen = info.symmetric_eigen();
    let q = eigen.eigenvectors;
    let kept: Vec<(usize, f64)> =
        eigen.eigenvalues.iter().copied().enumerate().filter(|(_, l)| *l > EIGEN_EPS).collect();
    if kept.is_empty() {
        return Err(InferenceError::NoPositiveCurvature);
    }
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        kept.iter().map(|&(k, lambda)| q[(i, k)] * q[(j, k)] / lambda).sum()
    }))
}
