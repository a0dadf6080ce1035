//! selection::model_set — the four-way fit over a shared design.
use crate::{
    regression::{
        design::Design, errors::RegressionResult, fitted::FittedModel, fitter::RegressionFitter,
        spec::ModelSpec,
    },
    spatial::weights::SpatialWeights,
};
use ndarray::ArrayView1;

/// OLS, lag, error, and Durbin fits of one outcome on one design.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSet {
    pub ols: FittedModel,
    pub lag: FittedModel,
    pub error: FittedModel,
    pub durbin: FittedModel,
}

impl ModelSet {
    pub fn get(&self, spec: ModelSpec) -> &FittedModel {
        match spec {
            ModelSpec::Ols => &self.ols,
            ModelSpec::Lag => &self.lag,
            ModelSpec::Error => &self.error,
            ModelSpec::Durbin => &self.durbin,
        }
    }

    /// Models in [`ModelSpec::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &FittedModel> {
        ModelSpec::ALL.into_iter().map(move |spec| self.get(spec))
    }

    /// One summary row per specification.
    pub fn comparison_table(&self) -> Vec<ComparisonRow> {
        self.iter().map(ComparisonRow::from_model).collect()
    }
}

/// One estimate of a comparison row.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSummary {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub p_value: f64,
}

/// Summary of one fitted specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub spec: ModelSpec,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_params: usize,
    pub rho: Option<f64>,
    pub rho_std_error: Option<f64>,
    pub coefficients: Vec<CoefficientSummary>,
}

impl ComparisonRow {
    pub fn from_model(model: &FittedModel) -> Self {
        let p_values = model.p_values();
        let coefficients = model
            .names()
            .iter()
            .enumerate()
            .map(|(j, name)| CoefficientSummary {
                name: name.clone(),
                estimate: model.coefficients()[j],
                std_error: model.std_errors()[j],
                p_value: p_values[j],
            })
            .collect();
        ComparisonRow {
            spec: model.spec(),
            log_likelihood: model.log_likelihood(),
            aic: model.aic(),
            bic: model.bic(),
            n_params: model.n_params(),
            rho: model.rho(),
            rho_std_error: model.rho_std_error(),
            coefficients,
        }
    }
}

/// fit_all — fit every specification over the same design and weights.
///
/// Errors
/// ------
/// The first fitting error, in [`ModelSpec::ALL`] order.
pub fn fit_all<R: RegressionFitter>(
    fitter: &R, design: &Design, outcome: ArrayView1<f64>, weights: &SpatialWeights,
) -> RegressionResult<ModelSet> {
    let fit = |spec: ModelSpec| -> RegressionResult<FittedModel> {
        let model = fitter.fit(design, outcome, Some(weights), spec)?;
        log::debug!(
            "fitted {spec} model: log-likelihood = {:.4}, AIC = {:.4}",
            model.log_likelihood(),
            model.aic()
        );
        Ok(model)
    };
    Ok(ModelSet {
        ols: fit(ModelSpec::Ols)?,
        lag: fit(ModelSpec::Lag)?,
        error: fit(ModelSpec::Error)?,
        durbin: fit(ModelSpec::Durbin)?,
    })
}
