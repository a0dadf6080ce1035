//! accessibility — logsum accessibility and its calibration.
//!
//! Purpose
//! -------
//! Measure how easily each tract reaches parks with a choice-theoretic
//! logsum (expected maximum utility over parks), and calibrate the utility
//! coefficients so the standardized index best explains a health outcome.
//!
//! Key behaviors
//! -------------
//! - [`DistanceMatrix`]: planar tract × park distances, floored at a
//!   configured minimum (default 0.1).
//! - [`LogsumInputs`] / [`accessibility`]: per-tract
//!   `ln Σ_j exp(β_d d_ij + β_s s_j + β_t t_j)`, overflow-free.
//! - [`standardize`]: mean 0, variance 1 (population variance).
//! - [`calibrate`] / [`calibrate_regression`]: bounded maximum likelihood
//!   over `β`, appending the standardized index to a fresh design at every
//!   proposal and flagging boundary convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - Distances are already planar; no geodesy here.
//! - Calibrated coefficients always satisfy their bounds.
//! - Shared inputs are borrowed and never mutated.
//!
//! Downstream usage
//! ----------------
//! - The pipeline calibrates once per outcome and hands the augmented
//!   design to the model selector.

pub mod calibrate;
pub mod coefficients;
pub mod distance;
pub mod errors;
pub mod logsum;
pub mod standardize;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calibrate::{
    calibrate, calibrate_regression, default_calibration_mle, AccessibilityObjective,
    CalibratedModel, CalibrationConfig, CalibrationOutcome, RegressionObjective,
    DEFAULT_ACCESS_COLUMN,
};
pub use self::coefficients::{
    BoundSide, BoundaryFlags, CoefficientBounds, Interval, LogsumCoefficients,
};
pub use self::distance::{DistanceMatrix, DEFAULT_DISTANCE_FLOOR};
pub use self::errors::{AccessError, AccessResult};
pub use self::logsum::{accessibility, LogsumInputs};
pub use self::standardize::standardize;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::calibrate::{calibrate_regression, CalibrationConfig, CalibrationOutcome};
    pub use super::coefficients::{CoefficientBounds, LogsumCoefficients};
    pub use super::distance::DistanceMatrix;
    pub use super::errors::{AccessError, AccessResult};
    pub use super::logsum::{accessibility, LogsumInputs};
    pub use super::standardize::standardize;
}
