//! data::errors — validation failures for tract and park tables.
//!
//! Every variant here is an *input-shape* error: it is fatal, reported
//! immediately, and never coerced away.

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Tables ----
    /// A table was constructed with no rows.
    EmptyTable { table: &'static str },
    /// Two rows share the same join key.
    DuplicateId { table: &'static str, id: String },
    /// Covariate or outcome vector length differs from the header.
    ColumnCountMismatch { id: String, expected: usize, found: usize },
    /// Two header names collide.
    DuplicateColumn(String),
    /// Requested column is not in the header.
    UnknownColumn(String),
    /// A covariate, outcome, or coordinate is NaN or infinite.
    NonFiniteValue { id: String, column: String, value: f64 },
    /// Park area does not exceed the configured minimum.
    ParkBelowMinimumArea { id: String, area: f64, minimum: f64 },
    /// A tract has no polygon although contact adjacency needs one.
    MissingGeometry { id: String },
    /// Some parks carry a social-signal count and some do not.
    PartialSignal { id: String },

    // ---- Joins ----
    /// Lookup table has no entry for a tract id.
    MissingJoinKey { id: String },
    /// A tract was used before its population-weighted centroid was joined.
    MissingPopulationCentroid { id: String },

    // ---- Transforms ----
    /// Log transform requires strictly positive input.
    NonPositiveValue { index: usize, value: f64 },
    /// Power-transform estimation failed (e.g. constant input).
    TransformFailed(String),
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Tables ----
            DataError::EmptyTable { table } => write!(f, "{table} table has no rows"),
            DataError::DuplicateId { table, id } => {
                write!(f, "Duplicate id '{id}' in {table} table")
            }
            DataError::ColumnCountMismatch { id, expected, found } => {
                write!(f, "Row '{id}' has {found} values, header has {expected}")
            }
            DataError::DuplicateColumn(name) => write!(f, "Duplicate column name '{name}'"),
            DataError::UnknownColumn(name) => write!(f, "Unknown column '{name}'"),
            DataError::NonFiniteValue { id, column, value } => {
                write!(f, "Non-finite value {value} in column '{column}' of row '{id}'")
            }
            DataError::ParkBelowMinimumArea { id, area, minimum } => {
                write!(f, "Park '{id}' has area {area}, must exceed {minimum}")
            }
            DataError::MissingGeometry { id } => write!(f, "Tract '{id}' has no polygon geometry"),
            DataError::PartialSignal { id } => {
                write!(f, "Park '{id}' lacks a signal count while other parks have one")
            }

            // ---- Joins ----
            DataError::MissingJoinKey { id } => {
                write!(f, "No population-weighted centroid for tract '{id}'")
            }
            DataError::MissingPopulationCentroid { id } => {
                write!(f, "Population-weighted centroid not joined for tract '{id}'")
            }

            // ---- Transforms ----
            DataError::NonPositiveValue { index, value } => {
                write!(f, "Log transform needs positive input, found {value} at index {index}")
            }
            DataError::TransformFailed(msg) => write!(f, "Power transform failed: {msg}"),
        }
    }
}
