//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer shared by the accessibility calibrator and
//! the spatial regression estimators: an Argmin-backed log-likelihood
//! maximizer, numerically stable parameter transforms, and a single
//! error/result surface. Callers implement a log-likelihood, choose a solver
//! and tolerances, and obtain fitted parameters and diagnostics without
//! touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`) with L-BFGS (More–Thuente or Hager–Zhang line
//!   search) or derivative-free Nelder–Mead, plus a bounded 1-D Brent
//!   maximizer used for concentrated spatial likelihoods.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained parameters into bounded model space and for stable
//!   log-sum-exp reductions.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Box constraints are never handed to the solver. Bounded coefficients are
//!   mapped from an unconstrained θ-space by the transforms in
//!   `numerical_stability`, so every iterate is feasible by construction.
//! - This module and its submodules avoid I/O and logging; higher layers are
//!   responsible for reporting progress. The only exception is the optional
//!   `obs_slog` observer attached when `MLEOptions::verbose` is set.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use park_access::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
