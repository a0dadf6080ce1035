//! statistical_tests::likelihood_ratio — LR test between nested models.
//!
//! Purpose
//! -------
//! Compare a restricted model against a more general one that nests it,
//! using the statistic `LR = 2(ℓ_general − ℓ_restricted)` referred to a
//! χ² distribution with `df = k_general − k_restricted` degrees of freedom.
//!
//! Key behaviors
//! -------------
//! - The side with more parameters is treated as the general model,
//!   whichever argument position it was passed in.
//! - A negative statistic (the general model fitting slightly worse, which
//!   only happens through optimizer tolerance) is clamped to zero.
//! - A statistic that is numerically zero always yields `p = 1`, including
//!   the degenerate comparison of a model with itself (`df = 0`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Log-likelihoods are finite and computed on the same observations.
//! - `p_value` lies in `[0, 1]`.

use crate::statistical_tests::{
    errors::{LRError, LRResult},
    validation::{validate_log_likelihoods, validate_significance},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Statistics at or below this value are treated as exactly zero.
pub const LR_ZERO_TOL: f64 = 1e-8;

/// Result of a likelihood-ratio comparison.
///
/// Fields
/// ------
/// - `stat`: `f64`
///   `2(ℓ_general − ℓ_restricted)`, clamped at zero.
/// - `df`: `usize`
///   Difference in parameter counts.
/// - `p_value`: `f64`
///   Upper-tail χ²(df) probability of `stat`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LROutcome {
    stat: f64,
    df: usize,
    p_value: f64,
}

impl LROutcome {
    /// Run the likelihood-ratio test.
    ///
    /// Parameters
    /// ----------
    /// - `ll_a`, `k_a`: log-likelihood and parameter count of one model.
    /// - `ll_b`, `k_b`: the same for the other model.
    ///
    /// Returns
    /// -------
    /// `LRResult<LROutcome>`
    ///
    /// Errors
    /// ------
    /// - `LRError::InvalidLogLikelihood` for non-finite inputs.
    /// - `LRError::NotNested` when `k_a == k_b` but the log-likelihoods
    ///   differ by more than [`LR_ZERO_TOL`] on the statistic scale.
    /// - `LRError::InvalidDistribution` if statrs rejects the χ² parameters.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use park_access::statistical_tests::LROutcome;
    ///
    /// let same = LROutcome::likelihood_ratio(-120.0, 4, -120.0, 4).unwrap();
    /// assert_eq!(same.p_value(), 1.0);
    /// ```
    pub fn likelihood_ratio(ll_a: f64, k_a: usize, ll_b: f64, k_b: usize) -> LRResult<Self> {
        let ((ll_r, k_r), (ll_g, k_g)) =
            if k_a <= k_b { ((ll_a, k_a), (ll_b, k_b)) } else { ((ll_b, k_b), (ll_a, k_a)) };
        validate_log_likelihoods(ll_r, ll_g)?;

        let df = k_g - k_r;
        let stat = if df == 0 {
            2.0 * (ll_g - ll_r).abs()
        } else {
            (2.0 * (ll_g - ll_r)).max(0.0)
        };
        if stat <= LR_ZERO_TOL {
            return Ok(LROutcome { stat: 0.0, df, p_value: 1.0 });
        }
        if df == 0 {
            return Err(LRError::NotNested { k_restricted: k_r, k_general: k_g, statistic: stat });
        }

        let chi2 = ChiSquared::new(df as f64).map_err(|_| LRError::InvalidDistribution { df })?;
        let p_value = (1.0 - chi2.cdf(stat)).clamp(0.0, 1.0);
        Ok(LROutcome { stat, df, p_value })
    }

    /// LR statistic.
    pub fn stat(&self) -> f64 {
        self.stat
    }

    /// Degrees of freedom of the χ² reference.
    pub fn df(&self) -> usize {
        self.df
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// `true` when the restricted model is rejected at level `alpha`.
    ///
    /// # Errors
    /// `LRError::InvalidSignificance` unless `0 < alpha < 1`.
    pub fn rejects(&self, alpha: f64) -> LRResult<bool> {
        validate_significance(alpha)?;
        Ok(self.p_value < alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // A model compared with itself must not reject anything.
    //
    // Given
    // -----
    // - Identical log-likelihoods and parameter counts.
    //
    // Expect
    // ------
    // - stat = 0, df = 0, p = 1 and no rejection at α = 0.05.
    fn self_comparison_yields_unit_p_value() {
        // Act
        let out = LROutcome::likelihood_ratio(-250.3, 6, -250.3, 6).unwrap();

        // Assert
        assert_eq!(out.stat(), 0.0);
        assert_eq!(out.df(), 0);
        assert!((out.p_value() - 1.0).abs() < 1e-12);
        assert!(!out.rejects(0.05).unwrap());
    }

    #[test]
    // Purpose
    // -------
    // Check the statistic, df and p-value against a known χ² quantile, and
    // that argument order does not matter.
    //
    // Given
    // -----
    // - ℓ_r = -100 (k = 3), ℓ_g = -98.07854 (k = 4): LR = 3.84292 ≈ χ²₁(0.95).
    //
    // Expect
    // ------
    // - p ≈ 0.05 for both argument orders.
    fn statistic_matches_chi_square_quantile() {
        // Act
        let ab = LROutcome::likelihood_ratio(-100.0, 3, -98.07854, 4).unwrap();
        let ba = LROutcome::likelihood_ratio(-98.07854, 4, -100.0, 3).unwrap();

        // Assert
        assert_eq!(ab.df(), 1);
        assert!((ab.stat() - 3.84292).abs() < 1e-9);
        assert!((ab.p_value() - 0.05).abs() < 1e-4, "p = {}", ab.p_value());
        assert_eq!(ab, ba);
    }

    #[test]
    // Purpose
    // -------
    // Cover the clamping and non-nested branches.
    //
    // Given
    // -----
    // - A general model with a slightly lower ℓ, and two equal-size models
    //   with different ℓ.
    //
    // Expect
    // ------
    // - Clamped statistic gives p = 1; equal-size mismatch is `NotNested`.
    fn negative_statistic_clamps_and_equal_size_mismatch_is_not_nested() {
        let clamped = LROutcome::likelihood_ratio(-50.0, 2, -50.001, 5).unwrap();
        assert_eq!(clamped.p_value(), 1.0);
        assert!(matches!(
            LROutcome::likelihood_ratio(-50.0, 3, -40.0, 3),
            Err(LRError::NotNested { .. })
        ));
        assert!(clamped.rejects(1.2).is_err());
    }
}
