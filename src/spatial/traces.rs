//! spatial::traces — power traces of W for impact decomposition.
//!
//! Purpose
//! -------
//! Precompute the quantities the impact summarizer needs from `W`, once per
//! weights matrix:
//!
//! - normalized traces `t_p = tr(Wᵖ) / n` for `p = 0..=P+1`, which drive the
//!   average direct effect;
//! - row-sum moments `g_p = (1/n) 1ᵀ Wᵖ 1`, which drive the average total
//!   effect. With no isolates `g_p = 1` for every `p`.
//!
//! Key behaviors
//! -------------
//! - [`TraceMethod::MonteCarlo`] uses the Hutchinson-type estimator
//!   `tr(Wᵖ) ≈ n · mean_r (xᵣᵀ Wᵖ xᵣ / xᵣᵀ xᵣ)` with standard normal probes
//!   from a seeded `ChaCha8Rng`; `tr(W⁰) = n`, `tr(W) = 0` and
//!   `tr(W²) = Σ w_ij w_ji` are replaced by their exact values.
//! - [`TraceMethod::Exact`] uses `tr(Wᵖ) = Σ λᵢᵖ` from the stored spectrum.
//! - Row-sum moments are always exact (repeated lags of the ones vector).
//!
//! Invariants & assumptions
//! ------------------------
//! - The same seed and options always produce the same summary.
//! - Computed once and reused for every model sharing the weights.
use crate::spatial::{
    errors::{SpatialError, SpatialResult},
    weights::SpatialWeights,
};
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::Deserialize;

pub const DEFAULT_TRACE_POWER: usize = 100;
pub const DEFAULT_TRACE_DRAWS: usize = 50;
pub const DEFAULT_TRACE_SEED: u64 = 20_231_115;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMethod {
    MonteCarlo,
    Exact,
}

/// Options for [`trace_summary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOptions {
    /// Highest power `P` of the series; traces are kept up to `P + 1`.
    pub max_power: usize,
    /// Monte Carlo probe vectors.
    pub draws: usize,
    pub seed: u64,
    pub method: TraceMethod,
}

impl TraceOptions {
    pub fn new(
        max_power: usize, draws: usize, seed: u64, method: TraceMethod,
    ) -> SpatialResult<Self> {
        if max_power == 0 {
            return Err(SpatialError::InvalidTraceOptions { reason: "max_power must be >= 1" });
        }
        if method == TraceMethod::MonteCarlo && draws == 0 {
            return Err(SpatialError::InvalidTraceOptions {
                reason: "Monte Carlo traces need at least one draw",
            });
        }
        Ok(TraceOptions { max_power, draws, seed, method })
    }
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            max_power: DEFAULT_TRACE_POWER,
            draws: DEFAULT_TRACE_DRAWS,
            seed: DEFAULT_TRACE_SEED,
            method: TraceMethod::MonteCarlo,
        }
    }
}

/// Normalized power traces and row-sum moments of one weights matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSummary {
    n: usize,
    normalized_traces: Vec<f64>,
    row_sum_moments: Vec<f64>,
    method: TraceMethod,
}

impl TraceSummary {
    pub fn n(&self) -> usize {
        self.n
    }

    /// Highest series power `P` (traces are stored up to `P + 1`).
    pub fn max_power(&self) -> usize {
        self.normalized_traces.len() - 2
    }

    /// `tr(Wᵖ) / n` for `p = 0..=P+1`.
    pub fn normalized_traces(&self) -> &[f64] {
        &self.normalized_traces
    }

    /// `(1/n) 1ᵀ Wᵖ 1` for `p = 0..=P+1`.
    pub fn row_sum_moments(&self) -> &[f64] {
        &self.row_sum_moments
    }

    /// Unnormalized `tr(Wᵖ)`.
    pub fn trace(&self, p: usize) -> Option<f64> {
        self.normalized_traces.get(p).map(|t| t * self.n as f64)
    }

    pub fn method(&self) -> TraceMethod {
        self.method
    }
}

/// trace_summary — traces and row-sum moments of `W` up to `P + 1`.
///
/// Parameters
/// ----------
/// - `weights`: `&SpatialWeights`
/// - `opts`: `&TraceOptions`
///
/// Returns
/// -------
/// A [`TraceSummary`] holding `P + 2` normalized traces and row-sum moments.
pub fn trace_summary(weights: &SpatialWeights, opts: &TraceOptions) -> SpatialResult<TraceSummary> {
    let n = weights.len();
    if n == 0 {
        return Err(SpatialError::EmptyInput);
    }
    let len = opts.max_power + 2;
    let nf = n as f64;

    let mut traces = match opts.method {
        TraceMethod::Exact => exact_traces(weights, len),
        TraceMethod::MonteCarlo => monte_carlo_traces(weights, len, opts.draws, opts.seed),
    };
    traces[0] = nf;
    traces[1] = 0.0;
    traces[2] = weights.trace_of_square();
    let normalized_traces = traces.into_iter().map(|t| t / nf).collect();

    let mut row_sum_moments = Vec::with_capacity(len);
    let mut v = Array1::<f64>::ones(n);
    row_sum_moments.push(1.0);
    for _ in 1..len {
        v = weights.lag_unchecked(v.view());
        row_sum_moments.push(v.sum() / nf);
    }

    Ok(TraceSummary { n, normalized_traces, row_sum_moments, method: opts.method })
}

fn exact_traces(weights: &SpatialWeights, len: usize) -> Vec<f64> {
    (0..len)
        .map(|p| weights.eigenvalues().iter().map(|l| l.powi(p as i32)).sum())
        .collect()
}

fn monte_carlo_traces(weights: &SpatialWeights, len: usize, draws: usize, seed: u64) -> Vec<f64> {
    let n = weights.len();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut acc = vec![0.0; len];
    for _ in 0..draws {
        let x: Array1<f64> = (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let xx = x.dot(&x);
        if xx <= 0.0 {
            continue;
        }
        let mut v = x.clone();
        for slot in acc.iter_mut().skip(1) {
            v = weights.lag_unchecked(v.view());
            *slot += x.dot(&v) / xx;
        }
    }
    let scale = n as f64 / draws as f64;
    acc.into_iter().map(|a| a * scale).collect()
}
