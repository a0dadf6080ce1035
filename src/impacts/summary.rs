//! impacts::summary — direct, indirect and total effects of spatial models.
//!
//! Purpose
//! -------
//! Decompose the marginal effect of each covariate in a spatial lag or
//! spatial Durbin model into the part felt in the tract itself (direct) and
//! the part transmitted through neighbors (indirect), and attach simulated
//! uncertainty.
//!
//! Key behaviors
//! -------------
//! - With `S(W) = (I − ρW)⁻¹(βI + θW)`, the average direct effect is
//!   `tr(S)/n = Σ_p ρᵖ (β t_p + θ t_{p+1})` and the average total effect is
//!   `1ᵀS1/n = Σ_p ρᵖ (β g_p + θ g_{p+1})`, where `t_p`, `g_p` come from
//!   [`TraceSummary`]. For the lag model θ = 0.
//! - Indirect = total − direct.
//! - Uncertainty: `draws` parameter vectors from `N(θ̂, Σ̂)` over `(β, ρ)`.
//!   Draws with `|ρ| ≥ 1` are rejected and replaced. Each effect reports the
//!   simulated mean, standard deviation, `z = mean / sd` and two-sided
//!   normal p-value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only specifications with a spatial lag of `y` are accepted.
//! - The same seed always yields the same summary.
//! - The intercept and Durbin `W_` columns are not reported as covariates;
//!   a Durbin covariate's θ is folded into its own row.
use crate::{
    impacts::{
        errors::{ImpactError, ImpactResult},
        sampling::MvnSampler,
    },
    inference::hessian::CovarianceSource,
    regression::{design::INTERCEPT, fitted::FittedModel, spec::ModelSpec},
    spatial::traces::TraceSummary,
};
use ndarray::{Array1, ArrayView1};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statrs::distribution::{ContinuousCDF, Normal};

pub const DEFAULT_IMPACT_DRAWS: usize = 1000;
pub const DEFAULT_IMPACT_SEED: u64 = 7_042_019;
/// Attempts allowed per requested draw before giving up on rejections.
const MAX_ATTEMPTS_PER_DRAW: usize = 10;

/// Options for [`summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactOptions {
    pub draws: usize,
    pub seed: u64,
}

impl ImpactOptions {
    pub fn new(draws: usize, seed: u64) -> ImpactResult<Self> {
        if draws < 2 {
            return Err(ImpactError::InvalidDraws(draws));
        }
        Ok(ImpactOptions { draws, seed })
    }
}

impl Default for ImpactOptions {
    fn default() -> Self {
        ImpactOptions { draws: DEFAULT_IMPACT_DRAWS, seed: DEFAULT_IMPACT_SEED }
    }
}

/// Point value and simulated distribution of one effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectEstimate {
    /// Effect at the estimated parameters.
    pub point: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub z: f64,
    pub p_value: f64,
}

impl EffectEstimate {
    fn from_draws(point: f64, draws: &[f64]) -> Self {
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = var.sqrt();
        let (z, p_value) = if std_dev > 0.0 {
            let z = mean / std_dev;
            let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
            (z, 2.0 * (1.0 - normal.cdf(z.abs())))
        } else {
            (f64::NAN, f64::NAN)
        };
        EffectEstimate { point, mean, std_dev, z, p_value }
    }
}

/// Impacts of one covariate.
#[derive(Debug, Clone, PartialEq)]
pub struct CovariateImpacts {
    pub name: String,
    pub direct: EffectEstimate,
    pub indirect: EffectEstimate,
    pub total: EffectEstimate,
}

/// Impacts table of one fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub spec: ModelSpec,
    pub rows: Vec<CovariateImpacts>,
    pub draws: usize,
    /// Draws discarded because `|ρ| ≥ 1`.
    pub rejected: usize,
    pub covariance_source: CovarianceSource,
    /// Whether the draw covariance needed eigenvalue clamping.
    pub clamped_covariance: bool,
}

impl ImpactSummary {
    pub fn get(&self, name: &str) -> Option<&CovariateImpacts> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Effects of one covariate at a given parameter vector.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Effects {
    direct: f64,
    total: f64,
}

/// Coefficient positions of one reported covariate.
#[derive(Debug, Clone, PartialEq)]
struct Term {
    name: String,
    beta: usize,
    theta: Option<usize>,
}

fn reported_terms(model: &FittedModel) -> Vec<Term> {
    let names = model.names();
    match model.spec() {
        ModelSpec::Durbin => model
            .durbin_pairs()
            .iter()
            .map(|&(b, l)| Term { name: names[b].clone(), beta: b, theta: Some(l) })
            .collect(),
        _ => names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_str() != INTERCEPT)
            .map(|(j, n)| Term { name: n.clone(), beta: j, theta: None })
            .collect(),
    }
}

fn series_effects(beta: f64, theta: f64, rho: f64, traces: &TraceSummary) -> Effects {
    let t = traces.normalized_traces();
    let g = traces.row_sum_moments();
    let mut direct = 0.0;
    let mut total = 0.0;
    let mut rho_p = 1.0;
    for p in 0..=traces.max_power() {
        direct += rho_p * (beta * t[p] + theta * t[p + 1]);
        total += rho_p * (beta * g[p] + theta * g[p + 1]);
        rho_p *= rho;
    }
    Effects { direct, total }
}

fn effects_at(params: ArrayView1<f64>, terms: &[Term], traces: &TraceSummary) -> Vec<Effects> {
    let rho = params[params.len() - 1];
    terms
        .iter()
        .map(|term| {
            let theta = term.theta.map_or(0.0, |l| params[l]);
            series_effects(params[term.beta], theta, rho, traces)
        })
        .collect()
}

/// summarize — simulated impacts of a spatial lag or Durbin model.
///
/// Parameters
/// ----------
/// - `model`: `&FittedModel`
///   A lag or Durbin fit carrying a covariance over `(β, ρ)`.
/// - `traces`: `&TraceSummary`
///   Traces of the same weights matrix the model was fitted with.
/// - `opts`: `&ImpactOptions`
///
/// Returns
/// -------
/// `ImpactResult<ImpactSummary>`
///   One row per reported covariate.
///
/// Errors
/// ------
/// - `ImpactError::NoSpatialLag` for OLS and error models.
/// - `ImpactError::MissingCovariance` when the fit has no covariance.
/// - `ImpactError::TraceSizeMismatch`, `CovarianceShape`,
///   `NonFiniteCovariance` for inconsistent inputs.
/// - `ImpactError::TooManyRejections` when fewer than `draws` stable draws
///   are found within the attempt budget.
pub fn summarize(
    model: &FittedModel, traces: &TraceSummary, opts: &ImpactOptions,
) -> ImpactResult<ImpactSummary> {
    let spec = model.spec();
    let rho = match model.rho() {
        Some(rho) if spec.has_lag() => rho,
        _ => return Err(ImpactError::NoSpatialLag { spec }),
    };
    let covariance = model.covariance().ok_or(ImpactError::MissingCovariance { spec })?;
    if traces.n() != model.n_obs() {
        return Err(ImpactError::TraceSizeMismatch {
            traces: traces.n(),
            observations: model.n_obs(),
        });
    }
    if opts.draws < 2 {
        return Err(ImpactError::InvalidDraws(opts.draws));
    }

    let terms = reported_terms(model);
    let mut theta_hat = model.coefficients().to_vec();
    theta_hat.push(rho);
    let theta_hat = Array1::from(theta_hat);
    let point = effects_at(theta_hat.view(), &terms, traces);
    let sampler = MvnSampler::new(theta_hat, &covariance.matrix)?;

    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
    let mut direct = vec![Vec::with_capacity(opts.draws); terms.len()];
    let mut total = vec![Vec::with_capacity(opts.draws); terms.len()];
    let budget = opts.draws * MAX_ATTEMPTS_PER_DRAW;
    let mut accepted = 0;
    let mut attempts = 0;
    while accepted < opts.draws {
        if attempts == budget {
            return Err(ImpactError::TooManyRejections { accepted, attempts });
        }
        attempts += 1;
        let draw = sampler.draw(&mut rng);
        if draw[draw.len() - 1].abs() >= 1.0 {
            continue;
        }
        for (k, e) in effects_at(draw.view(), &terms, traces).into_iter().enumerate() {
            direct[k].push(e.direct);
            total[k].push(e.total);
        }
        accepted += 1;
    }
    let rejected = attempts - accepted;
    if rejected > 0 {
        log::warn!("{spec} impacts: rejected {rejected} draws with |rho| >= 1");
    }

    let rows = terms
        .into_iter()
        .enumerate()
        .map(|(k, term)| {
            let indirect: Vec<f64> =
                total[k].iter().zip(direct[k].iter()).map(|(t, d)| t - d).collect();
            CovariateImpacts {
                name: term.name,
                direct: EffectEstimate::from_draws(point[k].direct, &direct[k]),
                indirect: EffectEstimate::from_draws(point[k].total - point[k].direct, &indirect),
                total: EffectEstimate::from_draws(point[k].total, &total[k]),
            }
        })
        .collect();

    Ok(ImpactSummary {
        spec,
        rows,
        draws: opts.draws,
        rejected,
        covariance_source: covariance.source,
        clamped_covariance: sampler.clamped(),
    })
}
