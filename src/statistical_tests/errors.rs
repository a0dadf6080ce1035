//! statistical_tests::errors — error types for model-comparison tests.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the likelihood-ratio test and
//! its input guards, so invalid comparisons are reported as values instead of
//! panics.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of the comparison being made
//!   ("log-likelihood must be finite", "models are not nested") rather than
//!   low-level details.

pub type LRResult<T> = Result<T, LRError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LRError {
    //------ Input validation errors ------
    /// A log-likelihood passed to the test was NaN or infinite.
    InvalidLogLikelihood { label: &'static str, value: f64 },
    /// Significance level outside (0, 1).
    InvalidSignificance(f64),
    /// Equal parameter counts but different likelihoods: no restriction links
    /// the two models.
    NotNested { k_restricted: usize, k_general: usize, statistic: f64 },

    //------ Distribution errors ------
    /// χ² reference distribution could not be built.
    InvalidDistribution { df: usize },
}

impl std::error::Error for LRError {}

impl std::fmt::Display for LRError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LRError::InvalidLogLikelihood { label, value } => {
                write!(f, "Invalid log-likelihood for {label} model: {value}. Must be finite.")
            }
            LRError::InvalidSignificance(alpha) => {
                write!(f, "Invalid significance level: {alpha}. Must lie in (0, 1).")
            }
            LRError::NotNested { k_restricted, k_general, statistic } => write!(
                f,
                "Models are not nested: both have {k_restricted}/{k_general} parameters but LR statistic is {statistic}"
            ),
            LRError::InvalidDistribution { df } => {
                write!(f, "Could not build chi-squared reference with {df} degrees of freedom")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that payloads are embedded in `Display` messages.
    //
    // Given
    // -----
    // - `InvalidSignificance(1.5)` and `InvalidLogLikelihood` for "general".
    //
    // Expect
    // ------
    // - Messages contain "1.5" and "general" respectively.
    fn lr_error_display_includes_payload() {
        // Arrange
        let alpha = LRError::InvalidSignificance(1.5);
        let ll = LRError::InvalidLogLikelihood { label: "general", value: f64::NAN };

        // Act
        let (m1, m2) = (alpha.to_string(), ll.to_string());

        // Assert
        assert!(m1.contains("1.5"), "Got: {m1}");
        assert!(m2.contains("general"), "Got: {m2}");
    }
}
