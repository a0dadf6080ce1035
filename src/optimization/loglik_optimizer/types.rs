//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and Argmin solver aliases used by the
//! log-likelihood optimizer so the calibration and regression layers never
//! spell out `ndarray` or Argmin generics themselves.
//!
//! Key behaviors
//! -------------
//! - Canonical aliases for parameter vectors, gradients, Hessians, and
//!   scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - A map type for Argmin function-evaluation counters (`FnEvalMap`).
//! - Pre-wired solver aliases: L-BFGS for both line searches, Nelder–Mead
//!   over `Theta`, and the scalar Brent solver used for spatial
//!   autoregressive parameters.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of free parameters;
//!   `Hessian` is `theta.len() × theta.len()`.
//! - `DEFAULT_LBFGS_MEM` is the history size used when
//!   `MLEOptions::lbfgs_mem` is `None`.
use argmin::solver::{
    brent::BrentOpt,
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` in unconstrained optimizer space.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` Hessian for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value handed to Argmin, `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Derivative-free simplex solver over [`Theta`].
pub type NelderMeadSolver = NelderMead<Theta, Cost>;

/// Bounded scalar solver (Brent's method without derivatives).
pub type ScalarBrent = BrentOpt<f64>;
