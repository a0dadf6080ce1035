//! numerical_stability — numerically robust transforms and reductions.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms and reductions used by the
//! calibration and regression layers. This module centralizes small numerical
//! tolerances and transform logic so the rest of the crate can assume
//! well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse,
//!   `safe_logistic` and `safe_logit`) for mapping unconstrained reals into
//!   half-lines or intervals without overflow/underflow.
//! - Provide a max-shifted log-sum-exp (`log_sum_exp`) that never overflows
//!   for finite inputs.
//! - Centralize small numeric tolerances (`LOGIT_EPS`, `EIGEN_EPS`,
//!   `GENERAL_TOL`) so downstream modules share consistent guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; shape and domain
//!   validation happens in the calling layers.
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas on
//!   safe grids, tail behavior, inverse round trips, and overflow-free
//!   log-sum-exp on extreme inputs.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, LOGIT_EPS, log_sum_exp, safe_logistic, safe_logit, safe_softplus,
    safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, LOGIT_EPS, log_sum_exp, safe_logistic, safe_logit, safe_softplus,
        safe_softplus_inv,
    };
}
