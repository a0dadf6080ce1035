//! Unified error handling for inference routines.
//!
//! `InferenceError` covers failures while turning a fitted model's curvature
//! into a parameter covariance: shape problems, non-finite information, an
//! information matrix with no usable directions, and passthrough failures
//! from the optimizer layer. `InferenceResult<T>` is the common alias.

use crate::optimization::errors::OptError;

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Information matrix ----
    /// Information matrix is not square or does not match θ̂.
    DimensionMismatch { expected: usize, found: (usize, usize) },

    /// Information matrix contains a non-finite entry.
    NonFiniteInformation { row: usize, col: usize, value: f64 },

    /// No eigenvalue exceeded the truncation threshold.
    NoPositiveCurvature,

    // ---- Upstream ----
    /// Finite-difference Hessian or score evaluation failed.
    Optimization(String),

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Optimization(err.to_string())
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Information matrix ----
            InferenceError::DimensionMismatch { expected, found } => write!(
                f,
                "Inference Error: information matrix should be {expected}x{expected}, found {found:?}"
            ),
            InferenceError::NonFiniteInformation { row, col, value } => {
                write!(f, "Inference Error: non-finite information at ({row}, {col}): {value}")
            }
            InferenceError::NoPositiveCurvature => {
                write!(f, "Inference Error: information matrix has no positive eigenvalues")
            }

            // ---- Upstream ----
            InferenceError::Optimization(msg) => write!(f, "Inference Error: {msg}"),

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {msg}"),
        }
    }
}
