//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind small builders that apply the
//! crate-level [`MLEOptions`] (tolerances, L-BFGS memory, simplex step) and
//! return a ready-to-run solver.
//!
//! Key behaviors
//! -------------
//! - L-BFGS with Hager–Zhang or More–Thuente line search, tolerances applied
//!   through the shared [`configure_lbfgs`].
//! - Nelder–Mead with an axis-aligned initial simplex around `θ₀` and the
//!   cost tolerance wired to the simplex standard-deviation stopping rule.
//!
//! Conventions
//! -----------
//! - Builders never set `max_iters`; the runners do.
//! - Errors from Argmin's `with_tolerance_*` are surfaced as [`OptError`]
//!   through `From<argmin::core::Error>`.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, NelderMeadSolver, Theta,
        },
    },
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   Consults `lbfgs_mem` (default [`DEFAULT_LBFGS_MEM`]) and the gradient /
///   cost tolerances.
///
/// Errors
/// ------
/// - `OptError` when Argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More–Thuente line search.
///
/// Same contract as [`build_optimizer_hager_zhang`].
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// When a tolerance is `None` the corresponding `with_tolerance_*` method is
/// not called and Argmin's default stays in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// build_nelder_mead — construct a Nelder–Mead solver around `theta0`.
///
/// Parameters
/// ----------
/// - `theta0`: `&Theta`
///   Starting point; becomes the first simplex vertex.
/// - `step`: `f64`
///   Offset along each coordinate for the remaining `dim` vertices.
/// - `opts`: `&MLEOptions`
///   `tols.tol_cost` becomes the simplex standard-deviation tolerance.
///
/// Errors
/// ------
/// - `OptError::InvalidSimplexStep` if `step` is non-finite or ≤ 0.
/// - `OptError::InvalidThetaInput` if `theta0` is empty.
/// - `OptError` when Argmin rejects the tolerance.
pub fn build_nelder_mead(theta0: &Theta, step: f64, opts: &MLEOptions) -> OptResult<NelderMeadSolver> {
    if !step.is_finite() || step <= 0.0 {
        return Err(OptError::InvalidSimplexStep { step });
    }
    if theta0.is_empty() {
        return Err(OptError::InvalidThetaInput { index: 0, value: f64::NAN });
    }
    let mut simplex = Vec::with_capacity(theta0.len() + 1);
    simplex.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += step;
        simplex.push(vertex);
    }
    let mut solver = NelderMeadSolver::new(simplex);
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Solver, Tolerances};
    use ndarray::array;

    fn opts_with(tols: Tolerances, solver: Solver, mem: Option<usize>) -> MLEOptions {
        MLEOptions::new(tols, solver, false, mem).expect("MLEOptions should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Ensure both L-BFGS builders succeed with default and explicit memory.
    //
    // Given
    // -----
    // - Valid tolerances; `lbfgs_mem` of `None` and `Some(11)`.
    //
    // Expect
    // ------
    // - Every builder call returns `Ok(_)`.
    fn lbfgs_builders_accept_default_and_explicit_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();
        let hz = opts_with(tols, Solver::Lbfgs(LineSearcher::HagerZhang), None);
        let mt = opts_with(tols, Solver::Lbfgs(LineSearcher::MoreThuente), Some(11));

        // Act + Assert
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
        assert!(build_optimizer_hager_zhang(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify `configure_lbfgs` leaves the solver constructible when both
    // tolerances are absent.
    //
    // Given
    // -----
    // - Tolerances with only `max_iter`.
    //
    // Expect
    // ------
    // - `Ok(_)`.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = opts_with(tols, Solver::Lbfgs(LineSearcher::MoreThuente), None);
        assert!(configure_lbfgs(raw, &opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check the Nelder–Mead builder's input validation.
    //
    // Given
    // -----
    // - A valid start, a zero step, and an empty start vector.
    //
    // Expect
    // ------
    // - Valid input builds; the other two are rejected.
    fn build_nelder_mead_validates_inputs() {
        // Arrange
        let tols = Tolerances::new(None, Some(1e-10), Some(100)).unwrap();
        let opts = opts_with(tols, Solver::NelderMead { step: 0.5 }, None);

        // Act + Assert
        assert!(build_nelder_mead(&array![0.0, 1.0], 0.5, &opts).is_ok());
        assert_eq!(
            build_nelder_mead(&array![0.0], 0.0, &opts).err(),
            Some(OptError::InvalidSimplexStep { step: 0.0 })
        );
        assert!(build_nelder_mead(&Theta::zeros(0), 0.5, &opts).is_err());
    }
}
