//! inference — covariance estimation for fitted models.
//!
//! Purpose
//! -------
//! Convert the curvature of a maximized log-likelihood into parameter
//! covariances and standard errors, with a fallback when the observed
//! information is not positive definite.
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`]: finite-difference Hessian of an analytic score,
//!   then inversion.
//! - [`invert_information`]: Cholesky inverse, or eigenvalue-truncated
//!   pseudo-inverse; the path taken is reported as a [`CovarianceSource`].
//!
//! Downstream usage
//! ----------------
//! - The spatial estimators in `regression` call [`calc_covariance`] after
//!   the concentrated-likelihood search; `impacts` draws from the returned
//!   matrix.

pub mod errors;
pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{CovarianceEstimate, CovarianceSource, calc_covariance, invert_information};

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use park_access::inference::prelude::*;` to
// import the primary inference surface in a single line.

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::{CovarianceEstimate, CovarianceSource, calc_covariance};
}
