//! regression::estimators — OLS and concentrated-likelihood spatial fits.
//!
//! Purpose
//! -------
//! Fit the four specifications by (concentrated) maximum likelihood with
//! Gaussian errors. The spatial parameter is profiled out: for every trial
//! value the coefficients and σ² have closed forms, leaving a bounded 1-D
//! search over the admissible interval of `W`.
//!
//! Key behaviors
//! -------------
//! - OLS: closed form; coefficient covariance `s²(X'X)⁻¹` with
//!   `s² = e'e / (n − k)`.
//! - Lag (SAR): `e(ρ) = e₀ − ρ e_L` with `e₀`, `e_L` the OLS residuals of
//!   `y` and `Wy` on `X`, so each profile evaluation is O(1) after setup.
//! - Error (SEM): filtered OLS of `y − λWy` on `X − λWX` per trial λ.
//! - Durbin (SDM): SAR on the lagged design `[X, WX]`.
//! - Log-determinants use the stored spectrum: `Σ ln(1 − ρ λᵢ)`.
//!
//! Covariance
//! ----------
//! - With `FitOptions::covariance`, the observed information of
//!   `(β, ρ, σ²)` is obtained by differentiating the analytic score
//!   numerically ([`calc_covariance`]); the `(β, ρ)` block is kept.
//! - When that fails, a conditional estimate is used instead: `σ²(Z'Z)⁻¹`
//!   for β (with `Z` the filtered design) and the inverse curvature of the
//!   profile likelihood for ρ ([`CovarianceSource::Conditional`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All log-likelihoods include the Gaussian constant so values are
//!   comparable across specifications.
//! - Singular designs are reported, never repaired.
use crate::{
    inference::hessian::{calc_covariance, CovarianceEstimate, CovarianceSource},
    optimization::{errors::OptResult, loglik_optimizer::brent::maximize_scalar},
    regression::{
        design::Design,
        errors::{RegressionError, RegressionResult},
        fitted::FittedModel,
        fitter::FitOptions,
        least_squares::LeastSquares,
        spec::ModelSpec,
    },
    spatial::weights::SpatialWeights,
};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use std::f64::consts::PI;

/// Gaussian log-likelihood with σ² concentrated out: `−n/2 (ln 2π + 1 + ln(ssr/n))`.
fn concentrated_gaussian(n: f64, ssr: f64) -> f64 {
    -0.5 * n * ((2.0 * PI).ln() + 1.0 + (ssr / n).ln())
}

fn check_ssr(ssr: f64) -> RegressionResult<()> {
    if !(ssr.is_finite() && ssr > f64::MIN_POSITIVE) {
        return Err(RegressionError::PerfectFit);
    }
    Ok(())
}

fn check_size(n: usize, k: usize) -> RegressionResult<()> {
    if n <= k {
        return Err(RegressionError::TooFewObservations { n, k });
    }
    Ok(())
}

pub(crate) fn fit_ols(design: &Design, y: ArrayView1<f64>) -> RegressionResult<FittedModel> {
    let (n, k) = (design.n_obs(), design.n_cols());
    check_size(n, k + 1)?;
    let ls = LeastSquares::new(design.matrix())?;
    let (coefficients, residuals) = ls.fit(y);
    let ssr = residuals.dot(&residuals);
    check_ssr(ssr)?;

    let s2 = ssr / (n - k) as f64;
    let covariance =
        CovarianceEstimate { matrix: ls.gram_inverse() * s2, source: CovarianceSource::Analytic };
    let std_errors = covariance.standard_errors();
    let fitted = &y - &residuals;

    Ok(FittedModel {
        spec: ModelSpec::Ols,
        names: design.names().to_vec(),
        coefficients,
        std_errors,
        sigma2: ssr / n as f64,
        rho: None,
        rho_std_error: None,
        log_likelihood: concentrated_gaussian(n as f64, ssr),
        n_obs: n,
        fitted,
        residuals,
        covariance: Some(covariance),
        durbin_pairs: Vec::new(),
        has_intercept: design.has_intercept(),
    })
}

/// SAR fit; also used for Durbin on the lagged design.
pub(crate) fn fit_lag(
    design: &Design, y: ArrayView1<f64>, weights: &SpatialWeights, opts: &FitOptions,
    spec: ModelSpec, durbin_pairs: Vec<(usize, usize)>,
) -> RegressionResult<FittedModel> {
    let (n, k) = (design.n_obs(), design.n_cols());
    check_size(n, k + 2)?;
    let nf = n as f64;
    let x = design.matrix();
    let ls = LeastSquares::new(x)?;
    let wy = weights.lag(y)?;
    let (b0, e0) = ls.fit(y);
    let (bl, el) = ls.fit(wy.view());
    let (e0e0, e0el, elel) = (e0.dot(&e0), e0.dot(&el), el.dot(&el));

    let profile = |rho: f64| -> OptResult<f64> {
        let ssr = e0e0 - 2.0 * rho * e0el + rho * rho * elel;
        check_ssr(ssr)?;
        Ok(concentrated_gaussian(nf, ssr) + weights.log_det(rho))
    };
    let (lower, upper) = weights.rho_bounds();
    let best = maximize_scalar(&profile, lower, upper, opts.rho_tol, opts.max_iter)?;
    let rho = best.x;

    let coefficients = &b0 - &(&bl * rho);
    let residuals = &e0 - &(&el * rho);
    let ssr = residuals.dot(&residuals);
    check_ssr(ssr)?;
    let sigma2 = ssr / nf;
    let log_likelihood = concentrated_gaussian(nf, ssr) + weights.log_det(rho);
    let fitted = &y - &residuals;

    let score = |theta: &Array1<f64>| -> OptResult<Array1<f64>> {
        let beta = theta.slice(s![..k]);
        let (r, s2) = (theta[k], theta[k + 1]);
        let e = &y - &(&wy * r) - x.dot(&beta);
        Ok(assemble_score(
            x.t().dot(&e) / s2,
            weights.log_det_derivative(r) + wy.dot(&e) / s2,
            sigma2_score(nf, s2, e.dot(&e)),
        ))
    };
    let theta_hat = stack_theta(&coefficients, rho, sigma2);
    let covariance = spatial_covariance(opts, &score, &theta_hat, k, || {
        let rho_var = profile_variance(&profile, rho, lower, upper)?;
        Some(conditional_covariance(ls.gram_inverse() * sigma2, rho_var))
    });
    let (std_errors, rho_std_error) = split_std_errors(covariance.as_ref(), k);

    Ok(FittedModel {
        spec,
        names: design.names().to_vec(),
        coefficients,
        std_errors,
        sigma2,
        rho: Some(rho),
        rho_std_error,
        log_likelihood,
        n_obs: n,
        fitted,
        residuals,
        covariance,
        durbin_pairs,
        has_intercept: design.has_intercept(),
    })
}

pub(crate) fn fit_error(
    design: &Design, y: ArrayView1<f64>, weights: &SpatialWeights, opts: &FitOptions,
) -> RegressionResult<FittedModel> {
    let (n, k) = (design.n_obs(), design.n_cols());
    check_size(n, k + 2)?;
    let nf = n as f64;
    let x = design.matrix();
    let wy = weights.lag(y)?;
    let wx = weights.lag_columns(x)?;

    let profile = |lambda: f64| -> OptResult<f64> {
        let (_, e) = filtered_ols(x, wx.view(), y, wy.view(), lambda)?;
        let ssr = e.dot(&e);
        check_ssr(ssr)?;
        Ok(concentrated_gaussian(nf, ssr) + weights.log_det(lambda))
    };
    let (lower, upper) = weights.rho_bounds();
    let best = maximize_scalar(&profile, lower, upper, opts.rho_tol, opts.max_iter)?;
    let lambda = best.x;

    let (coefficients, filtered_residuals) = filtered_ols(x, wx.view(), y, wy.view(), lambda)?;
    let ssr = filtered_residuals.dot(&filtered_residuals);
    check_ssr(ssr)?;
    let sigma2 = ssr / nf;
    let log_likelihood = concentrated_gaussian(nf, ssr) + weights.log_det(lambda);
    let fitted = design.predict(coefficients.view());
    let residuals = &y - &fitted;

    let score = |theta: &Array1<f64>| -> OptResult<Array1<f64>> {
        let beta = theta.slice(s![..k]);
        let (l, s2) = (theta[k], theta[k + 1]);
        let u = &y - &x.dot(&beta);
        let wu = &wy - &wx.dot(&beta);
        let e = &u - &(&wu * l);
        let xs = &x - &(&wx * l);
        Ok(assemble_score(
            xs.t().dot(&e) / s2,
            weights.log_det_derivative(l) + wu.dot(&e) / s2,
            sigma2_score(nf, s2, e.dot(&e)),
        ))
    };
    let theta_hat = stack_theta(&coefficients, lambda, sigma2);
    let covariance = spatial_covariance(opts, &score, &theta_hat, k, || {
        let rho_var = profile_variance(&profile, lambda, lower, upper)?;
        let xs = &x - &(&wx * lambda);
        let gram_inverse = LeastSquares::new(xs.view()).ok()?.gram_inverse();
        Some(conditional_covariance(gram_inverse * sigma2, rho_var))
    });
    let (std_errors, rho_std_error) = split_std_errors(covariance.as_ref(), k);

    Ok(FittedModel {
        spec: ModelSpec::Error,
        names: design.names().to_vec(),
        coefficients,
        std_errors,
        sigma2,
        rho: Some(lambda),
        rho_std_error,
        log_likelihood,
        n_obs: n,
        fitted,
        residuals,
        covariance,
        durbin_pairs: Vec::new(),
        has_intercept: design.has_intercept(),
    })
}

// ---- Helper methods ----

/// OLS of `y − λWy` on `X − λWX`.
fn filtered_ols(
    x: ArrayView2<f64>, wx: ArrayView2<f64>, y: ArrayView1<f64>, wy: ArrayView1<f64>, lambda: f64,
) -> RegressionResult<(Array1<f64>, Array1<f64>)> {
    let xs = &x - &(&wx * lambda);
    let ys = &y - &(&wy * lambda);
    let ls = LeastSquares::new(xs.view())?;
    Ok(ls.fit(ys.view()))
}

fn sigma2_score(n: f64, s2: f64, ssr: f64) -> f64 {
    -n / (2.0 * s2) + ssr / (2.0 * s2 * s2)
}

fn assemble_score(beta_part: Array1<f64>, rho_part: f64, sigma2_part: f64) -> Array1<f64> {
    let k = beta_part.len();
    let mut g = Array1::<f64>::zeros(k + 2);
    g.slice_mut(s![..k]).assign(&beta_part);
    g[k] = rho_part;
    g[k + 1] = sigma2_part;
    g
}

fn stack_theta(beta: &Array1<f64>, rho: f64, sigma2: f64) -> Array1<f64> {
    let k = beta.len();
    let mut theta = Array1::<f64>::zeros(k + 2);
    theta.slice_mut(s![..k]).assign(beta);
    theta[k] = rho;
    theta[k + 1] = sigma2;
    theta
}

fn spatial_covariance<F, C>(
    opts: &FitOptions, score: &F, theta_hat: &Array1<f64>, k: usize, conditional: C,
) -> Option<CovarianceEstimate>
where
    F: Fn(&Array1<f64>) -> OptResult<Array1<f64>>,
    C: FnOnce() -> Option<CovarianceEstimate>,
{
    if opts.covariance {
        if let Ok(full) = calc_covariance(score, theta_hat) {
            let matrix = full.matrix.slice(s![..=k, ..=k]).to_owned();
            if matrix.diag().iter().all(|v| v.is_finite() && *v >= 0.0) {
                return Some(CovarianceEstimate { matrix, source: full.source });
            }
        }
    }
    conditional()
}

/// `−1 / ℓc''(x)` by central differences, kept inside `(lower, upper)`.
fn profile_variance<G>(profile: &G, x: f64, lower: f64, upper: f64) -> Option<f64>
where
    G: Fn(f64) -> OptResult<f64>,
{
    let h = (1e-4 * (1.0 + x.abs())).min(0.5 * (x - lower)).min(0.5 * (upper - x));
    if h.is_nan() || h <= 0.0 {
        return None;
    }
    let f0 = profile(x).ok()?;
    let fp = profile(x + h).ok()?;
    let fm = profile(x - h).ok()?;
    let curvature = (fp - 2.0 * f0 + fm) / (h * h);
    (curvature.is_finite() && curvature < 0.0).then(|| -1.0 / curvature)
}

fn conditional_covariance(beta_block: Array2<f64>, rho_var: f64) -> CovarianceEstimate {
    let k = beta_block.nrows();
    let mut matrix = Array2::<f64>::zeros((k + 1, k + 1));
    matrix.slice_mut(s![..k, ..k]).assign(&beta_block);
    matrix[[k, k]] = rho_var;
    CovarianceEstimate { matrix, source: CovarianceSource::Conditional }
}

fn split_std_errors(cov: Option<&CovarianceEstimate>, k: usize) -> (Array1<f64>, Option<f64>) {
    match cov {
        Some(c) => {
            let se = c.standard_errors();
            (se.slice(s![..k]).to_owned(), Some(se[k]))
        }
        None => (Array1::from_elem(k, f64::NAN), None),
    }
}
