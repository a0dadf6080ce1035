//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference derivatives around a parameter vector with
//! error capture, validation, and symmetry cleanup, so the optimizer and the
//! inference layer can request derivatives without touching the
//! `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient of a scalar objective with
//!   captured closure errors and post-hoc validation.
//! - [`compute_hessian`]: Hessian of a *fallible* gradient function,
//!   central differences first and forward differences as fallback, then
//!   symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Differences are taken in whatever coordinates `theta` lives in; the
//!   regression layer passes natural parameters `(β, ρ, σ²)` so the
//!   resulting Hessian is directly the observed information (negated).
//! - Any error raised by the gradient closure aborts the Hessian; the first
//!   such error is returned unchanged.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the error-capture path, non-finite rejection, and
//!   symmetry of the returned Hessian.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Evaluation point; its length is the expected gradient dimension.
/// - `func`: `&G`
///   Scalar objective. It is expected to write any evaluation error into
///   `closure_err` and return `NaN`.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Error slot shared with `func`; cleared on entry.
///
/// Errors
/// ------
/// - The captured closure error, converted into `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian of a fallible gradient.
///
/// Parameters
/// ----------
/// - `grad`: `&F`
///   Gradient function `θ ↦ ∇ℓ(θ)`. Errors are captured and surfaced.
/// - `theta`: `&Theta`
///   Evaluation point.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   A finite, symmetric `dim × dim` matrix.
///
/// Errors
/// ------
/// - The first error raised by `grad`.
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation.
///
/// Notes
/// -----
/// - The central-difference validation error is discarded; only the
///   fallback's error is reported.
pub fn compute_hessian<F>(grad: &F, theta: &Theta) -> OptResult<Hessian>
where
    F: Fn(&Theta) -> OptResult<Grad>,
{
    let dim = theta.len();
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let grad_func = |t: &Theta| -> Grad {
        match grad(t) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Grad::from_elem(dim, f64::NAN)
            }
        }
    };

    let mut central = theta.central_hessian(&grad_func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    if validate_hessian(&central, dim).is_ok() {
        symmetrize_hess(&mut central);
        return Ok(central);
    }
    let mut forward = theta.forward_hessian(&grad_func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_hessian(&forward, dim)?;
    symmetrize_hess(&mut forward);
    Ok(forward)
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place; the diagonal is untouched.
pub(crate) fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
