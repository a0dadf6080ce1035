//! pipeline::run — one analysis run from validated tables to impacts.
//!
//! Purpose
//! -------
//! Wire the layers together in their data-flow order: spatial weights and
//! traces once per run, park attributes and the distance matrix once per
//! run, then per outcome calibrate → augment → fit all four specifications
//! → select → summarize impacts.
//!
//! Key behaviors
//! -------------
//! - Origins are population-weighted tract centroids; destinations are park
//!   locations. Park sizes enter as `ln(area)` and signal counts (when the
//!   calibration start has a signal coefficient) as their maximum-likelihood
//!   Yeo-Johnson transform.
//! - When the calibrated logsum is constant across tracts the models are
//!   fit on the base design and the report carries no accessibility column.
//! - Impacts are computed only when the selected model has a spatial lag.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are borrowed and never mutated.
//! - Every failure is fatal for the run and surfaces as [`AnalysisError`].
use crate::{
    accessibility::{
        calibrate::{calibrate_regression, CalibrationOutcome},
        distance::DistanceMatrix,
        logsum::LogsumInputs,
    },
    data::{
        records::{ParkTable, TractTable},
        transforms::{log_transform, yeo_johnson_mle},
    },
    impacts::summary::{summarize, ImpactSummary},
    pipeline::{
        config::AnalysisConfig,
        errors::{AnalysisError, AnalysisResult},
    },
    regression::{design::Design, fitter::MaxLikelihoodFitter},
    selection::{
        model_set::{fit_all, ComparisonRow, ModelSet},
        policy::{select_error_vs_durbin, Selection},
    },
    spatial::{
        traces::{trace_summary, TraceSummary},
        weights::SpatialWeights,
    },
};
use ndarray::{Array1, Array2};

/// Results for one outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeReport {
    pub outcome: String,
    pub calibration: CalibrationOutcome,
    pub models: ModelSet,
    pub comparison: Vec<ComparisonRow>,
    pub selection: Selection,
    /// Present when the selected model has a spatial lag.
    pub impacts: Option<ImpactSummary>,
}

impl OutcomeReport {
    /// Standardized accessibility column appended to the design.
    pub fn accessibility(&self) -> Option<&Array1<f64>> {
        self.calibration.accessibility.as_ref()
    }
}

/// Results of [`run_analysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub n_tracts: usize,
    pub n_parks: usize,
    /// Tract positions without neighbors.
    pub isolates: Vec<usize>,
    /// Yeo-Johnson λ of the signal transform, when the signal is used.
    pub signal_lambda: Option<f64>,
    pub traces: TraceSummary,
    pub outcomes: Vec<OutcomeReport>,
}

impl AnalysisReport {
    pub fn outcome(&self, name: &str) -> Option<&OutcomeReport> {
        self.outcomes.iter().find(|o| o.outcome == name)
    }
}

/// Park-side utility inputs shared by every outcome.
struct ParkAttributes {
    distances: Array2<f64>,
    sizes: Array1<f64>,
    signal: Option<Array1<f64>>,
    signal_lambda: Option<f64>,
}

fn park_attributes(
    tracts: &TractTable, parks: &ParkTable, config: &AnalysisConfig,
) -> AnalysisResult<ParkAttributes> {
    let origins = tracts.population_centroids()?;
    let matrix = DistanceMatrix::compute_with_floor(&origins, &parks.locations(), config.distance_floor)?;
    let distances = if config.log_distance { matrix.ln() } else { matrix.values().clone() };
    let sizes = log_transform(parks.areas().view())?;
    let (signal, signal_lambda) = if config.uses_signal() {
        let counts = parks.signal_counts().ok_or(AnalysisError::MissingSignal)?;
        let fit = yeo_johnson_mle(counts.view())?;
        log::debug!("signal Yeo-Johnson lambda = {:.4}", fit.lambda);
        (Some(fit.transformed), Some(fit.lambda))
    } else {
        (None, None)
    };
    Ok(ParkAttributes { distances, sizes, signal, signal_lambda })
}

fn selected_outcomes(tracts: &TractTable, config: &AnalysisConfig) -> AnalysisResult<Vec<String>> {
    if config.outcomes.is_empty() {
        return Ok(tracts.outcome_names().to_vec());
    }
    for name in &config.outcomes {
        if !tracts.outcome_names().contains(name) {
            return Err(AnalysisError::UnknownOutcome { name: name.clone() });
        }
    }
    Ok(config.outcomes.clone())
}

/// run_analysis — calibrate, fit, select and summarize every outcome.
///
/// Parameters
/// ----------
/// - `tracts`: `&TractTable`
///   Tracts with population centroids joined (and polygons for queen
///   contiguity).
/// - `parks`: `&ParkTable`
/// - `config`: `&AnalysisConfig`
///
/// Returns
/// -------
/// `AnalysisResult<AnalysisReport>`
///   One [`OutcomeReport`] per analyzed outcome, in configuration order.
///
/// Errors
/// ------
/// Any layer error, wrapped in the matching [`AnalysisError`] variant.
pub fn run_analysis(
    tracts: &TractTable, parks: &ParkTable, config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    let outcomes = selected_outcomes(tracts, config)?;
    log::info!(
        "analysis of {} outcome(s) over {} tracts and {} parks",
        outcomes.len(),
        tracts.len(),
        parks.len()
    );

    let weights = SpatialWeights::build(tracts, &config.adjacency)?;
    let isolates = weights.isolates();
    if !isolates.is_empty() {
        log::warn!("{} tract(s) have no neighbors and keep all-zero weight rows", isolates.len());
    }
    let traces = trace_summary(&weights, &config.traces)?;

    let attrs = park_attributes(tracts, parks, config)?;
    let inputs = LogsumInputs::new(
        attrs.distances.view(),
        attrs.sizes.view(),
        attrs.signal.as_ref().map(|t| t.view()),
    )?;
    let base = Design::from_tracts(tracts)?;
    let fitter = MaxLikelihoodFitter::new(config.fit);

    let mut reports = Vec::with_capacity(outcomes.len());
    for name in outcomes {
        let y = tracts.outcome(&name)?;
        let calibrated =
            calibrate_regression(&fitter, &base, y.view(), Some(&weights), &inputs, &config.calibration)?;
        if calibrated.calibration.boundary.any() {
            log::warn!("{name}: calibrated coefficients reached a bound: {:?}", calibrated.calibration.boundary);
        }
        let design = match &calibrated.calibration.accessibility {
            Some(z) => base.augment(&config.calibration.column_name, z.view())?,
            None => {
                log::warn!("{name}: accessibility is constant at the optimum; fitting without it");
                base.clone()
            }
        };

        let models = fit_all(&fitter, &design, y.view(), &weights)?;
        let selection = select_error_vs_durbin(&models, config.alpha)?;
        let chosen = models.get(selection.chosen);
        let impacts = if chosen.spec().has_lag() {
            Some(summarize(chosen, &traces, &config.impacts)?)
        } else {
            log::info!("{name}: selected {} model has no spatial lag; skipping impacts", chosen.spec());
            None
        };

        reports.push(OutcomeReport {
            outcome: name,
            calibration: calibrated.calibration,
            comparison: models.comparison_table(),
            models,
            selection,
            impacts,
        });
    }

    Ok(AnalysisReport {
        n_tracts: tracts.len(),
        n_parks: parks.len(),
        isolates,
        signal_lambda: attrs.signal_lambda,
        traces,
        outcomes: reports,
    })
}
