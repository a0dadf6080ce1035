//! pipeline::config — analysis configuration and its TOML form.
//!
//! Purpose
//! -------
//! Gather every tunable of one analysis run into [`AnalysisConfig`]. The
//! typed struct is built either in code (starting from
//! [`AnalysisConfig::new`]) or from TOML text through a plain-data mirror
//! that is validated field by field.
//!
//! Conventions
//! -----------
//! - The regression fitted during calibration has no default: code passes
//!   it to [`AnalysisConfig::new`], TOML must set `calibration.spec`.
//! - Other missing TOML keys take the documented defaults; unknown keys
//!   are an error.
//! - Unbounded coefficient limits are written `inf` / `-inf`.
//!
//! Example
//! -------
//! ```toml
//! outcomes = ["obesity"]
//! alpha = 0.05
//!
//! [weights]
//! kind = "distance_band"
//! radius = 1500.0
//!
//! [calibration]
//! spec = "durbin"
//! solver = "neldermead"
//! initial = [-1.0, 0.5]
//! ```
use crate::{
    accessibility::{
        calibrate::{
            default_calibration_mle, CalibrationConfig, DEFAULT_ACCESS_COLUMN,
            DEFAULT_BOUNDARY_TOL, DEFAULT_CALIBRATION_MAX_ITER,
        },
        coefficients::{CoefficientBounds, Interval, LogsumCoefficients},
        distance::DEFAULT_DISTANCE_FLOOR,
    },
    impacts::summary::{ImpactOptions, DEFAULT_IMPACT_DRAWS, DEFAULT_IMPACT_SEED},
    optimization::loglik_optimizer::{
        brent::{DEFAULT_SCALAR_MAX_ITER, DEFAULT_SCALAR_TOL},
        traits::{MLEOptions, Solver, Tolerances},
    },
    pipeline::errors::{AnalysisError, AnalysisResult},
    regression::{fitter::FitOptions, spec::ModelSpec},
    selection::policy::DEFAULT_SIGNIFICANCE,
    spatial::{
        adjacency::AdjacencyRule,
        traces::{
            TraceMethod, TraceOptions, DEFAULT_TRACE_DRAWS, DEFAULT_TRACE_POWER, DEFAULT_TRACE_SEED,
        },
    },
};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Typed, validated configuration of [`run_analysis`](super::run_analysis).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Outcomes to analyze; empty means every outcome column.
    pub outcomes: Vec<String>,
    pub adjacency: AdjacencyRule,
    pub distance_floor: f64,
    /// Use `ln d_ij` instead of `d_ij` in the utility.
    pub log_distance: bool,
    pub calibration: CalibrationConfig,
    /// Significance level of the error-vs-Durbin test.
    pub alpha: f64,
    pub fit: FitOptions,
    pub traces: TraceOptions,
    pub impacts: ImpactOptions,
}

impl AnalysisConfig {
    /// Documented defaults, calibrating against `calibration_spec`.
    pub fn new(calibration_spec: ModelSpec) -> Self {
        let raw = RawConfig::default();
        AnalysisConfig {
            outcomes: Vec::new(),
            adjacency: AdjacencyRule::Queen,
            distance_floor: DEFAULT_DISTANCE_FLOOR,
            log_distance: false,
            calibration: CalibrationConfig {
                spec: calibration_spec,
                bounds: CoefficientBounds::default(),
                initial: LogsumCoefficients::new(
                    raw.calibration.initial[0],
                    raw.calibration.initial[1],
                    None,
                ),
                mle: default_calibration_mle(),
                column_name: DEFAULT_ACCESS_COLUMN.to_string(),
                boundary_tol: DEFAULT_BOUNDARY_TOL,
            },
            alpha: DEFAULT_SIGNIFICANCE,
            fit: FitOptions::default(),
            traces: TraceOptions::default(),
            impacts: ImpactOptions::default(),
        }
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// `ConfigParse` for malformed TOML, unknown keys, or a missing
    /// `calibration.spec`; `InvalidConfig` and
    /// layer errors for values that fail validation.
    pub fn from_toml_str(text: &str) -> AnalysisResult<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        raw.validate()
    }

    /// Read and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading analysis config {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Whether the calibration includes the social-signal term.
    pub fn uses_signal(&self) -> bool {
        self.calibration.initial.signal.is_some()
    }
}

// ---- TOML mirror ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    outcomes: Vec<String>,
    weights: AdjacencyRule,
    distance_floor: f64,
    log_distance: bool,
    alpha: f64,
    calibration: RawCalibration,
    fit: RawFit,
    traces: RawTraces,
    impacts: RawImpacts,
}

impl Default for RawConfig {
    fn default() -> Self {
        RawConfig {
            outcomes: Vec::new(),
            weights: AdjacencyRule::Queen,
            distance_floor: DEFAULT_DISTANCE_FLOOR,
            log_distance: false,
            alpha: DEFAULT_SIGNIFICANCE,
            calibration: RawCalibration::default(),
            fit: RawFit::default(),
            traces: RawTraces::default(),
            impacts: RawImpacts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawCalibration {
    spec: Option<ModelSpec>,
    /// `[β_d, β_s]` or `[β_d, β_s, β_t]`; a third entry enables the signal.
    initial: Vec<f64>,
    distance_bounds: [f64; 2],
    size_bounds: [f64; 2],
    signal_bounds: [f64; 2],
    solver: String,
    simplex_step: Option<f64>,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    max_iter: usize,
    column_name: String,
    boundary_tol: f64,
    verbose: bool,
}

impl Default for RawCalibration {
    fn default() -> Self {
        RawCalibration {
            spec: None,
            initial: vec![-1.0, 0.5],
            distance_bounds: [f64::NEG_INFINITY, 0.0],
            size_bounds: [0.0, f64::INFINITY],
            signal_bounds: [f64::NEG_INFINITY, f64::INFINITY],
            solver: "neldermead".to_string(),
            simplex_step: None,
            tol_grad: None,
            tol_cost: Some(1e-10),
            max_iter: DEFAULT_CALIBRATION_MAX_ITER,
            column_name: DEFAULT_ACCESS_COLUMN.to_string(),
            boundary_tol: DEFAULT_BOUNDARY_TOL,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawFit {
    rho_tol: f64,
    max_iter: u64,
    covariance: bool,
}

impl Default for RawFit {
    fn default() -> Self {
        RawFit { rho_tol: DEFAULT_SCALAR_TOL, max_iter: DEFAULT_SCALAR_MAX_ITER, covariance: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTraces {
    max_power: usize,
    draws: usize,
    seed: u64,
    method: TraceMethod,
}

impl Default for RawTraces {
    fn default() -> Self {
        RawTraces {
            max_power: DEFAULT_TRACE_POWER,
            draws: DEFAULT_TRACE_DRAWS,
            seed: DEFAULT_TRACE_SEED,
            method: TraceMethod::MonteCarlo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawImpacts {
    draws: usize,
    seed: u64,
}

impl Default for RawImpacts {
    fn default() -> Self {
        RawImpacts { draws: DEFAULT_IMPACT_DRAWS, seed: DEFAULT_IMPACT_SEED }
    }
}

impl RawConfig {
    fn validate(self) -> AnalysisResult<AnalysisConfig> {
        let adjacency = match self.weights {
            AdjacencyRule::Queen => AdjacencyRule::Queen,
            AdjacencyRule::DistanceBand { radius, power } => {
                AdjacencyRule::distance_band_with_power(radius, power)?
            }
        };
        if !self.distance_floor.is_finite() || self.distance_floor <= 0.0 {
            return Err(AnalysisError::InvalidConfig {
                field: "distance_floor",
                reason: format!("{} is not a positive finite distance", self.distance_floor),
            });
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidConfig {
                field: "alpha",
                reason: format!("{} is outside (0, 1)", self.alpha),
            });
        }
        let fit = FitOptions::new(self.fit.rho_tol, self.fit.max_iter, self.fit.covariance)?;
        let traces = TraceOptions::new(
            self.traces.max_power,
            self.traces.draws,
            self.traces.seed,
            self.traces.method,
        )?;
        let impacts = ImpactOptions::new(self.impacts.draws, self.impacts.seed)?;
        Ok(AnalysisConfig {
            outcomes: self.outcomes,
            adjacency,
            distance_floor: self.distance_floor,
            log_distance: self.log_distance,
            calibration: self.calibration.validate()?,
            alpha: self.alpha,
            fit,
            traces,
            impacts,
        })
    }
}

impl RawCalibration {
    fn validate(self) -> AnalysisResult<CalibrationConfig> {
        let spec = self.spec.ok_or_else(|| {
            AnalysisError::ConfigParse("missing field `spec` in [calibration]".to_string())
        })?;
        let initial = match self.initial.as_slice() {
            &[d, s] => LogsumCoefficients::new(d, s, None),
            &[d, s, t] => LogsumCoefficients::new(d, s, Some(t)),
            other => {
                return Err(AnalysisError::InvalidConfig {
                    field: "calibration.initial",
                    reason: format!("expected 2 or 3 coefficients, found {}", other.len()),
                })
            }
        };
        let bounds = CoefficientBounds {
            distance: Interval::new("distance", self.distance_bounds[0], self.distance_bounds[1])?,
            size: Interval::new("size", self.size_bounds[0], self.size_bounds[1])?,
            signal: Interval::new("signal", self.signal_bounds[0], self.signal_bounds[1])?,
        };
        let solver = match (self.solver.parse::<Solver>()?, self.simplex_step) {
            (Solver::NelderMead { .. }, Some(step)) => Solver::nelder_mead(step)?,
            (solver, _) => solver,
        };
        let tols = Tolerances::new(self.tol_grad, self.tol_cost, Some(self.max_iter))?;
        let mle = MLEOptions::new(tols, solver, self.verbose, None)?;
        Ok(CalibrationConfig::new(
            spec,
            bounds,
            initial,
            mle,
            self.column_name,
            self.boundary_tol,
        )?)
    }
}
