//! spatial — neighbor structures, spatial weights, and power traces.
//!
//! Purpose
//! -------
//! Turn tract geometry into the row-standardized weights matrix `W` shared by
//! the spatial estimators and the impact summarizer.
//!
//! Key behaviors
//! -------------
//! - [`adjacency`]: queen contiguity (R-tree prefilter + DE-9IM intersects)
//!   and inverse-distance bands over population-weighted centroids.
//! - [`weights`]: row standardization with all-zero isolate rows, spatial
//!   lag, spectrum, log-determinant and the admissible ρ interval.
//! - [`traces`]: `tr(Wᵖ)/n` and row-sum moments, computed once per `W`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Raw weights are symmetric and non-negative with an empty diagonal.
//! - Isolates are not an error; they simply receive no spillover.
//!
//! Downstream usage
//! ----------------
//! - `regression` uses the lag operator and log-determinant; `impacts` uses
//!   the trace summary.

pub mod adjacency;
pub mod errors;
pub mod traces;
pub mod weights;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adjacency::{distance_band, queen_contiguity, Adjacency, AdjacencyRule};
pub use self::errors::{SpatialError, SpatialResult};
pub use self::traces::{trace_summary, TraceMethod, TraceOptions, TraceSummary};
pub use self::weights::SpatialWeights;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::adjacency::AdjacencyRule;
    pub use super::errors::{SpatialError, SpatialResult};
    pub use super::traces::{trace_summary, TraceOptions, TraceSummary};
    pub use super::weights::SpatialWeights;
}
