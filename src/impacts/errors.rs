//! impacts::errors — failures of the impact summarizer.
use crate::regression::spec::ModelSpec;

pub type ImpactResult<T> = Result<T, ImpactError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ImpactError {
    // ---- Model applicability ----
    /// Impacts are defined only for specifications with a lag of `y`.
    NoSpatialLag { spec: ModelSpec },
    /// The fitted model carries no parameter covariance to draw from.
    MissingCovariance { spec: ModelSpec },

    // ---- Shape and value errors ----
    CovarianceShape { expected: usize, found: (usize, usize) },
    NonFiniteCovariance { row: usize, col: usize, value: f64 },
    TraceSizeMismatch { traces: usize, observations: usize },

    // ---- Simulation ----
    InvalidDraws(usize),
    /// Too many ρ draws fell outside the stable region.
    TooManyRejections { accepted: usize, attempts: usize },
}

impl std::error::Error for ImpactError {}

impl std::fmt::Display for ImpactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactError::NoSpatialLag { spec } => {
                write!(f, "Impacts require a spatial lag of the outcome; {spec} model has none")
            }
            ImpactError::MissingCovariance { spec } => {
                write!(f, "The {spec} model has no parameter covariance to simulate from")
            }
            ImpactError::CovarianceShape { expected, found } => write!(
                f,
                "Covariance must be {expected}x{expected}, found {}x{}",
                found.0, found.1
            ),
            ImpactError::NonFiniteCovariance { row, col, value } => {
                write!(f, "Non-finite covariance entry at ({row}, {col}): {value}")
            }
            ImpactError::TraceSizeMismatch { traces, observations } => write!(
                f,
                "Trace summary was built for {traces} units but the model has {observations} observations"
            ),
            ImpactError::InvalidDraws(draws) => {
                write!(f, "Invalid number of draws: {draws}. Must be at least 2.")
            }
            ImpactError::TooManyRejections { accepted, attempts } => write!(
                f,
                "Only {accepted} of {attempts} simulated spatial parameters were inside (-1, 1)"
            ),
        }
    }
}
