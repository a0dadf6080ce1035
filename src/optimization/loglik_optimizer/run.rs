//! Execution helpers that run an `argmin` solver on a log-likelihood problem
//! and return a crate-level [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run a gradient-based solver (L-BFGS) on an adapted log-likelihood.
///
/// # Arguments
/// - `theta0`: initial parameter vector, consumed into the solver state.
/// - `opts`: optimizer options; `tols.max_iter` caps the run.
/// - `problem`: an [`ArgMinAdapter`] wrapping the model and its data.
/// - `solver`: a solver from
///   [`build_optimizer_hager_zhang`](super::builders::build_optimizer_hager_zhang)
///   or [`build_optimizer_more_thuente`](super::builders::build_optimizer_more_thuente).
///
/// # Feature flags
/// With `obs_slog` and `opts.verbose`, a terminal slog observer is attached
/// and ℓ(θ₀) is printed before the first iteration.
///
/// # Errors
/// - Any `argmin` runtime error (line-search failure, objective error) via
///   `From<argmin::core::Error>`; errors raised by the model come back as
///   the model's own `OptError`.
/// - Validation errors when building the [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>>,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

/// Run a derivative-free simplex solver on an adapted log-likelihood.
///
/// The initial simplex is carried by the solver itself (see
/// [`build_nelder_mead`](super::builders::build_nelder_mead)), so no initial
/// parameter is set on the state. The reported `grad_norm` is always `None`.
///
/// # Errors
/// Same as [`run_lbfgs`].
pub fn run_nelder_mead<'a, F, S>(
    opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<ArgMinAdapter<'a, F>, IterState<Theta, (), (), (), (), f64>>,
{
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        None,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
