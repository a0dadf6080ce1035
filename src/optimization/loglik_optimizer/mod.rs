//! loglik_optimizer — argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement [`LogLikelihood`] and invoke
//! [`maximize`] (multivariate) or [`maximize_scalar`] (bounded 1-D).
//!
//! Key behaviors
//! -------------
//! - Convert log-likelihoods into Argmin cost functions `c(θ) = -ℓ(θ)` via
//!   [`adapter::ArgMinAdapter`], with finite-difference gradients when a
//!   model provides none.
//! - [`maximize`] validates the start, selects L-BFGS (More–Thuente or
//!   Hager–Zhang) or Nelder–Mead from [`Solver`], runs it, and normalizes
//!   the result into an [`OptimOutcome`].
//! - [`finite_diff::compute_hessian`] differentiates a gradient numerically
//!   for covariance estimation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `LogLikelihood::value` / `grad` report invalid inputs as [`OptError`]
//!   values, never panics.
//! - Configuration types ([`Tolerances`], [`MLEOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space; bounded coefficients are
//!   mapped in the model layer (see `accessibility::coefficients`).
//! - All user-facing values, including [`OptimOutcome::value`], are
//!   log-likelihoods, not costs.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions ([`adapter`]), builders, every solver
//!   path on a concave bowl ([`api`]), the scalar Brent search, and
//!   derivative validation.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod brent;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::brent::{DEFAULT_SCALAR_MAX_ITER, DEFAULT_SCALAR_TOL, ScalarOutcome, maximize_scalar};
pub use self::finite_diff::compute_hessian;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Solver, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use park_access::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::brent::{ScalarOutcome, maximize_scalar};
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Solver, Tolerances,
    };
    pub use super::types::{Cost, Grad, Hessian, Theta};
}
