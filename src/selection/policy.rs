//! selection::policy — likelihood-ratio comparison and nested selection.
//!
//! Purpose
//! -------
//! Decide between a restricted specification and a more general one that
//! nests it. The default pairing is spatial error vs spatial Durbin: the
//! error model is the Durbin model under the common-factor restriction
//! `θ = −ρβ`, one restriction per lagged covariate.
//!
//! Key behaviors
//! -------------
//! - [`compare`] returns the LR statistic, degrees of freedom (difference
//!   in free parameters), and χ² p-value. A model compared with itself has
//!   statistic 0 and p-value 1.
//! - [`select_nested`] keeps the restricted model unless the test rejects
//!   it at `α`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Selection happens once per outcome; nothing here searches over model
//!   classes beyond the given pair.
use crate::{
    regression::{fitted::FittedModel, spec::ModelSpec},
    selection::model_set::ModelSet,
    statistical_tests::{
        errors::LRResult, likelihood_ratio::LROutcome, validation::validate_significance,
    },
};

/// Conventional significance level for the nested comparison.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// compare — likelihood-ratio test between two fitted models.
///
/// The model with more free parameters is treated as the general one.
///
/// Errors
/// ------
/// - `LRError::InvalidLogLikelihood` for non-finite log-likelihoods.
/// - `LRError::NotNested` when both models have the same parameter count
///   but clearly different fits.
pub fn compare(a: &FittedModel, b: &FittedModel) -> LRResult<LROutcome> {
    LROutcome::likelihood_ratio(a.log_likelihood(), a.n_params(), b.log_likelihood(), b.n_params())
}

/// Outcome of a nested selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub chosen: ModelSpec,
    pub restricted: ModelSpec,
    pub general: ModelSpec,
    pub test: LROutcome,
    pub alpha: f64,
}

impl Selection {
    /// Whether the general model was preferred.
    pub fn rejected_restriction(&self) -> bool {
        self.chosen == self.general
    }
}

/// select_nested — keep `restricted` unless the LR test rejects it at `alpha`.
pub fn select_nested(
    restricted: &FittedModel, general: &FittedModel, alpha: f64,
) -> LRResult<Selection> {
    validate_significance(alpha)?;
    let test = compare(restricted, general)?;
    let chosen = if test.rejects(alpha)? { general.spec() } else { restricted.spec() };
    log::info!(
        "{} vs {}: LR = {:.4}, df = {}, p = {:.4}; keeping {}",
        restricted.spec(),
        general.spec(),
        test.stat(),
        test.df(),
        test.p_value(),
        chosen
    );
    Ok(Selection { chosen, restricted: restricted.spec(), general: general.spec(), test, alpha })
}

/// Error-vs-Durbin selection over a fitted [`ModelSet`].
pub fn select_error_vs_durbin(models: &ModelSet, alpha: f64) -> LRResult<Selection> {
    select_nested(&models.error, &models.durbin, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        regression::{design::Design, fitter::{test_support::*, MaxLikelihoodFitter}},
        selection::model_set::fit_all,
    };
    use ndarray::Axis;

    fn simulated(rho: f64, theta: f64, seed: u64) -> ModelSet {
        let w = grid_weights(12);
        let x = normals(144, seed);
        let wx = w.lag(x.view()).unwrap();
        let v = x.mapv(|v| 1.0 + 2.0 * v) + wx * theta + normals(144, seed + 1) * 0.5;
        let y = spatial_inverse(&w, rho, v.view());
        let design = Design::with_intercept(vec!["x".into()], x.insert_axis(Axis(1))).unwrap();
        fit_all(&MaxLikelihoodFitter::default(), &design, y.view(), &w).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Comparing a model with itself yields p ≈ 1.
    //
    // Given
    // -----
    // - The lag model of a simulated data set compared with itself.
    //
    // Expect
    // ------
    // - Statistic 0, df 0, p-value within 1e-12 of 1.
    fn self_comparison_has_unit_p_value() {
        // Arrange
        let models = simulated(0.4, 0.0, 21);

        // Act
        let lr = compare(&models.lag, &models.lag).unwrap();

        // Assert
        assert_eq!(lr.stat(), 0.0);
        assert_eq!(lr.df(), 0);
        assert!((lr.p_value() - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A strong spillover in X rejects the error restriction.
    //
    // Given
    // -----
    // - y from an SDM with ρ = 0.4 and θ = 2.5.
    //
    // Expect
    // ------
    // - Durbin chosen, df = 1; comparison table ordered OLS, lag, error,
    //   Durbin.
    fn strong_spillover_rejects_error_model() {
        // Arrange
        let models = simulated(0.4, 2.5, 31);

        // Act
        let sel = select_error_vs_durbin(&models, DEFAULT_SIGNIFICANCE).unwrap();

        // Assert
        assert_eq!(sel.chosen, ModelSpec::Durbin);
        assert!(sel.rejected_restriction());
        assert_eq!(sel.test.df(), 1);
        let table = models.comparison_table();
        let specs: Vec<ModelSpec> = table.iter().map(|r| r.spec).collect();
        assert_eq!(specs, ModelSpec::ALL.to_vec());
        assert_eq!(table[3].coefficients.len(), 3);
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        let models = simulated(0.2, 0.0, 41);
        assert!(select_error_vs_durbin(&models, 1.5).is_err());
    }
}
