//! data — validated inputs for one analysis run.
//!
//! Purpose
//! -------
//! Represent the already-cleaned tract and park tables, join the
//! population-weighted centroid lookup, and provide the attribute
//! transforms (log sizes, Yeo-Johnson signal counts) the accessibility
//! layer expects.
//!
//! Invariants & assumptions
//! ------------------------
//! - File parsing, missing-data filtering, and reprojection happen before
//!   this layer; it only validates.
//! - Validation failures are fatal [`DataError`]s.

pub mod errors;
pub mod join;
pub mod records;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DataError, DataResult};
pub use self::join::join_population_centroids;
pub use self::records::{Park, ParkTable, Tract, TractTable};
pub use self::transforms::{YeoJohnsonFit, log_transform, yeo_johnson, yeo_johnson_mle};

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::join::join_population_centroids;
    pub use super::records::{Park, ParkTable, Tract, TractTable};
    pub use super::transforms::{log_transform, yeo_johnson_mle};
}
