//! statistical_tests::validation — shared input guards for model comparisons.
//!
//! Purpose
//! -------
//! Check log-likelihoods and significance levels once, before any test
//! statistic is formed, and map failures into [`LRError`] values.

use crate::statistical_tests::errors::{LRError, LRResult};

/// Reject non-finite log-likelihoods for either side of a comparison.
pub fn validate_log_likelihoods(ll_restricted: f64, ll_general: f64) -> LRResult<()> {
    if !ll_restricted.is_finite() {
        return Err(LRError::InvalidLogLikelihood { label: "restricted", value: ll_restricted });
    }
    if !ll_general.is_finite() {
        return Err(LRError::InvalidLogLikelihood { label: "general", value: ll_general });
    }
    Ok(())
}

/// Require `0 < alpha < 1`.
pub fn validate_significance(alpha: f64) -> LRResult<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(LRError::InvalidSignificance(alpha));
    }
    Ok(())
}
