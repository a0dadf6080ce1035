//! Error surface for distances, the logsum engine, and calibration.
//!
//! Shape errors are fatal contract violations and are reported with the
//! offending dimension. Boundary convergence of the calibrator is *not* an
//! error; it is flagged on the outcome instead.

use crate::{optimization::errors::OptError, regression::errors::RegressionError};

pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AccessError {
    // ---- Inputs ----
    DimensionMismatch { what: &'static str, expected: usize, found: usize },
    EmptyInput { what: &'static str },
    NonFiniteInput { what: &'static str, index: usize, value: f64 },
    /// Distance floor must be finite and > 0.
    InvalidFloor(f64),

    // ---- Standardization ----
    /// A constant vector cannot be scaled to unit variance.
    ZeroVariance,

    // ---- Coefficients ----
    InvalidBounds { coefficient: &'static str, lower: f64, upper: f64 },
    StartOutsideBounds { coefficient: &'static str, value: f64, lower: f64, upper: f64 },
    /// Signal coefficient requested without a signal vector, or vice versa.
    SignalMismatch { reason: &'static str },
    InvalidTolerance { name: &'static str, value: f64 },

    // ---- Upstream ----
    Optimization(String),
    Regression(String),
}

impl std::error::Error for AccessError {}

impl From<OptError> for AccessError {
    fn from(err: OptError) -> Self {
        AccessError::Optimization(err.to_string())
    }
}

impl From<RegressionError> for AccessError {
    fn from(err: RegressionError) -> Self {
        AccessError::Regression(err.to_string())
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            AccessError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }
            AccessError::EmptyInput { what } => write!(f, "Empty input: {what}"),
            AccessError::NonFiniteInput { what, index, value } => {
                write!(f, "Non-finite {what} at index {index}: {value}")
            }
            AccessError::InvalidFloor(v) => {
                write!(f, "Invalid distance floor {v}: must be finite and > 0")
            }

            // ---- Standardization ----
            AccessError::ZeroVariance => {
                write!(f, "Cannot standardize a constant vector (zero variance)")
            }

            // ---- Coefficients ----
            AccessError::InvalidBounds { coefficient, lower, upper } => {
                write!(f, "Invalid bounds for {coefficient}: [{lower}, {upper}]")
            }
            AccessError::StartOutsideBounds { coefficient, value, lower, upper } => write!(
                f,
                "Initial {coefficient} coefficient {value} outside bounds [{lower}, {upper}]"
            ),
            AccessError::SignalMismatch { reason } => write!(f, "Signal mismatch: {reason}"),
            AccessError::InvalidTolerance { name, value } => {
                write!(f, "Invalid {name} {value}: must be finite and > 0")
            }

            // ---- Upstream ----
            AccessError::Optimization(msg) => write!(f, "Calibration optimizer failed: {msg}"),
            AccessError::Regression(msg) => write!(f, "Calibration regression failed: {msg}"),
        }
    }
}
