//! data::transforms — variance-stabilizing transforms for park attributes.
//!
//! Purpose
//! -------
//! Park sizes enter the utility in log-space; social-signal counts are
//! heavily skewed and contain zeros, so they are Yeo-Johnson transformed
//! with a maximum-likelihood exponent.
//!
//! Key behaviors
//! -------------
//! - [`log_transform`]: elementwise `ln(x)` for strictly positive input.
//! - [`yeo_johnson`]: the Yeo-Johnson power transform for a given `λ`.
//! - [`yeo_johnson_mle`]: choose `λ` on `[-5, 5]` by maximizing the profile
//!   log-likelihood of a normal model for the transformed values, using the
//!   bounded Brent search from the optimizer layer.
use crate::{
    data::errors::{DataError, DataResult},
    optimization::{
        errors::OptResult,
        loglik_optimizer::{DEFAULT_SCALAR_MAX_ITER, maximize_scalar},
    },
};
use ndarray::{Array1, ArrayView1};

/// Search interval for the Yeo-Johnson exponent.
pub const YEO_JOHNSON_LAMBDA_RANGE: (f64, f64) = (-5.0, 5.0);

const LAMBDA_EPS: f64 = 1e-12;

/// Elementwise natural log.
///
/// # Errors
/// `NonPositiveValue` for the first entry `≤ 0` (or NaN).
pub fn log_transform(values: ArrayView1<f64>) -> DataResult<Array1<f64>> {
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| v.is_nan() || **v <= 0.0) {
        return Err(DataError::NonPositiveValue { index, value });
    }
    Ok(values.mapv(f64::ln))
}

/// Yeo-Johnson transform of a single value.
pub fn yeo_johnson_value(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < LAMBDA_EPS {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < LAMBDA_EPS {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Yeo-Johnson transform of a vector.
pub fn yeo_johnson(values: ArrayView1<f64>, lambda: f64) -> Array1<f64> {
    values.mapv(|x| yeo_johnson_value(x, lambda))
}

/// Profile log-likelihood of `λ`:
/// `−n/2 · ln σ̂²(ψ_λ(x)) + (λ − 1) Σ sign(x) ln(1 + |x|)`.
pub fn yeo_johnson_log_likelihood(values: ArrayView1<f64>, lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed = yeo_johnson(values, lambda);
    let mean = transformed.sum() / n;
    let var = transformed.mapv(|t| (t - mean).powi(2)).sum() / n;
    let jacobian: f64 = values.iter().map(|&x| x.signum() * x.abs().ln_1p()).sum();
    -0.5 * n * var.ln() + (lambda - 1.0) * jacobian
}

/// Fitted Yeo-Johnson transform.
#[derive(Debug, Clone, PartialEq)]
pub struct YeoJohnsonFit {
    pub lambda: f64,
    pub transformed: Array1<f64>,
}

/// Estimate `λ` by maximum likelihood and return the transformed values.
///
/// # Errors
/// - `TransformFailed` for fewer than two values, non-finite input, or
///   constant input (the profile likelihood is unbounded).
pub fn yeo_johnson_mle(values: ArrayView1<f64>) -> DataResult<YeoJohnsonFit> {
    if values.len() < 2 {
        return Err(DataError::TransformFailed("need at least two values".to_string()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(DataError::TransformFailed("input contains non-finite values".to_string()));
    }
    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return Err(DataError::TransformFailed("input is constant".to_string()));
    }

    let objective = |lambda: f64| -> OptResult<f64> { Ok(yeo_johnson_log_likelihood(values, lambda)) };
    let (lo, hi) = YEO_JOHNSON_LAMBDA_RANGE;
    let best = maximize_scalar(&objective, lo, hi, 1e-8, DEFAULT_SCALAR_MAX_ITER)
        .map_err(|e| DataError::TransformFailed(e.to_string()))?;
    Ok(YeoJohnsonFit { lambda: best.x, transformed: yeo_johnson(values, best.x) })
}
