//! spatial::errors — failures while building neighbor structures and traces.

use crate::data::errors::DataError;

pub type SpatialResult<T> = Result<T, SpatialError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SpatialError {
    // ---- Inputs ----
    /// No units to build weights over.
    EmptyInput,
    /// A polygon has no bounding rectangle (no coordinates).
    EmptyGeometry { index: usize },
    /// Distance band radius must be finite and > 0.
    InvalidRadius(f64),
    /// Inverse-distance power must be finite and ≥ 0.
    InvalidPower(f64),
    /// Two units share the same location, so inverse distance is undefined.
    CoincidentPoints { i: usize, j: usize },
    /// Upstream table validation failed.
    Data(String),

    // ---- Weight entries ----
    IndexOutOfRange { index: usize, n: usize },
    SelfNeighbor { index: usize },
    DuplicateNeighbor { i: usize, j: usize },
    InvalidWeight { i: usize, j: usize, value: f64 },
    /// Raw weights must be symmetric so the eigenvalues of the
    /// row-standardized matrix are real.
    AsymmetricWeights { i: usize, j: usize },

    // ---- Operators ----
    DimensionMismatch { expected: usize, found: usize },
    /// Trace options out of range.
    InvalidTraceOptions { reason: &'static str },
}

impl std::error::Error for SpatialError {}

impl From<DataError> for SpatialError {
    fn from(err: DataError) -> Self {
        SpatialError::Data(err.to_string())
    }
}

impl std::fmt::Display for SpatialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            SpatialError::EmptyInput => write!(f, "No spatial units supplied"),
            SpatialError::EmptyGeometry { index } => {
                write!(f, "Geometry {index} is empty and has no bounding rectangle")
            }
            SpatialError::InvalidRadius(r) => {
                write!(f, "Invalid distance band radius {r}: must be finite and > 0")
            }
            SpatialError::InvalidPower(p) => {
                write!(f, "Invalid inverse-distance power {p}: must be finite and >= 0")
            }
            SpatialError::CoincidentPoints { i, j } => {
                write!(f, "Units {i} and {j} share a location; inverse distance undefined")
            }
            SpatialError::Data(msg) => write!(f, "Invalid spatial input: {msg}"),

            // ---- Weight entries ----
            SpatialError::IndexOutOfRange { index, n } => {
                write!(f, "Neighbor index {index} out of range for {n} units")
            }
            SpatialError::SelfNeighbor { index } => {
                write!(f, "Unit {index} lists itself as a neighbor")
            }
            SpatialError::DuplicateNeighbor { i, j } => {
                write!(f, "Neighbor pair ({i}, {j}) listed more than once")
            }
            SpatialError::InvalidWeight { i, j, value } => {
                write!(f, "Invalid weight {value} for pair ({i}, {j}): must be finite and > 0")
            }
            SpatialError::AsymmetricWeights { i, j } => {
                write!(f, "Raw weights are not symmetric at pair ({i}, {j})")
            }

            // ---- Operators ----
            SpatialError::DimensionMismatch { expected, found } => {
                write!(f, "Vector length {found} does not match {expected} spatial units")
            }
            SpatialError::InvalidTraceOptions { reason } => {
                write!(f, "Invalid trace options: {reason}")
            }
        }
    }
}
