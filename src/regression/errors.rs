//! Error surface for design construction and model fitting.
//!
//! `RegressionError` covers malformed designs, missing or mismatched
//! spatial weights, numerical degeneracy of the least-squares system, and
//! failures passed up from the optimizer and spatial layers.

use crate::{
    optimization::errors::OptError, regression::spec::ModelSpec, spatial::errors::SpatialError,
};

pub type RegressionResult<T> = Result<T, RegressionError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RegressionError {
    // ---- Design ----
    EmptyDesign,
    DimensionMismatch { what: &'static str, expected: usize, found: usize },
    DuplicateColumn { name: String },
    UnknownColumn { name: String },
    NonFiniteValue { what: &'static str, index: usize, value: f64 },

    // ---- Numerical degeneracy ----
    /// `X'X` is singular or too ill-conditioned to solve (collinear columns).
    SingularDesign { min_eigenvalue: f64 },
    /// Residuals vanish, so the Gaussian likelihood is unbounded.
    PerfectFit,
    TooFewObservations { n: usize, k: usize },

    // ---- Specification ----
    MissingWeights { spec: ModelSpec },
    WeightsSizeMismatch { expected: usize, found: usize },
    InvalidSpec { name: String },
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    // ---- Upstream ----
    Optimization(String),
    Spatial(String),
}

impl std::error::Error for RegressionError {}

impl From<OptError> for RegressionError {
    fn from(err: OptError) -> Self {
        RegressionError::Optimization(err.to_string())
    }
}

impl From<SpatialError> for RegressionError {
    fn from(err: SpatialError) -> Self {
        RegressionError::Spatial(err.to_string())
    }
}

impl std::fmt::Display for RegressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Design ----
            RegressionError::EmptyDesign => write!(f, "Design has no rows or no columns"),
            RegressionError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }
            RegressionError::DuplicateColumn { name } => {
                write!(f, "Design column '{name}' already exists")
            }
            RegressionError::UnknownColumn { name } => write!(f, "Unknown design column '{name}'"),
            RegressionError::NonFiniteValue { what, index, value } => {
                write!(f, "Non-finite value {value} in {what} at index {index}")
            }

            // ---- Numerical degeneracy ----
            RegressionError::SingularDesign { min_eigenvalue } => write!(
                f,
                "Design matrix is singular or collinear (smallest scaled eigenvalue {min_eigenvalue:e})"
            ),
            RegressionError::PerfectFit => {
                write!(f, "Residual sum of squares is zero; likelihood is unbounded")
            }
            RegressionError::TooFewObservations { n, k } => {
                write!(f, "{n} observations are too few for {k} parameters")
            }

            // ---- Specification ----
            RegressionError::MissingWeights { spec } => {
                write!(f, "Specification '{spec}' requires spatial weights")
            }
            RegressionError::WeightsSizeMismatch { expected, found } => {
                write!(f, "Spatial weights cover {found} units, design has {expected} rows")
            }
            RegressionError::InvalidSpec { name } => {
                write!(f, "Unknown model specification '{name}'")
            }
            RegressionError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }

            // ---- Upstream ----
            RegressionError::Optimization(msg) => write!(f, "Optimization failed: {msg}"),
            RegressionError::Spatial(msg) => write!(f, "Spatial operator failed: {msg}"),
        }
    }
}
