//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait objectives implement (calibration objective,
//!   any future model whose parameters are searched numerically).
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Solver`] / [`LineSearcher`]: choice of search algorithm.
//! - [`OptimOutcome`]: normalized result returned by [`maximize`](super::maximize).
//!
//! Convention: we *maximize* a log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it is the gradient of
//! the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// - `type Data`: payload carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences of the cost are used.
pub trait LogLikelihood {
    type Data;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidSolver {
                name: s.to_string(),
                reason: "Valid line searchers are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Search algorithm used by [`maximize`](super::maximize).
///
/// Variants:
/// - `Lbfgs(LineSearcher)`: quasi-Newton search with analytic or
///   finite-difference gradients.
/// - `NelderMead { step }`: derivative-free simplex search; the initial
///   simplex is `θ₀` plus `step` along each coordinate.
///
/// Parsing accepts `"lbfgs"` (More–Thuente), `"lbfgs-morethuente"`,
/// `"lbfgs-hagerzhang"` and `"neldermead"` (step 0.5), case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solver {
    Lbfgs(LineSearcher),
    NelderMead { step: f64 },
}

impl Solver {
    /// Derivative-free simplex search with a validated initial step.
    pub fn nelder_mead(step: f64) -> OptResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(OptError::InvalidSimplexStep { step });
        }
        Ok(Solver::NelderMead { step })
    }
}

impl FromStr for Solver {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase().replace(['_', ' '], "-");
        match lowered.as_str() {
            "lbfgs" => Ok(Solver::Lbfgs(LineSearcher::MoreThuente)),
            "neldermead" | "nelder-mead" => Ok(Solver::NelderMead { step: 0.5 }),
            other => match other.strip_prefix("lbfgs-") {
                Some(ls) => Ok(Solver::Lbfgs(ls.parse()?)),
                None => Err(OptError::InvalidSolver {
                    name: s.to_string(),
                    reason: "Valid solvers are 'lbfgs', 'lbfgs-<linesearch>' or 'neldermead'.",
                }),
            },
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `solver: Solver` — search algorithm.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size, default
///   [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = 1e-10`, `max_iter = 200`
/// - `solver`: L-BFGS with More–Thuente
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub solver: Solver,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// Numeric tolerances are validated in [`Tolerances::new`]; this
    /// constructor only checks the L-BFGS memory.
    pub fn new(
        tols: Tolerances, solver: Solver, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, solver, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-10), max_iter: Some(200) },
            solver: Solver::Lbfgs(LineSearcher::MoreThuente),
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold
///   (L-BFGS only).
/// - `tol_cost`: terminate when the change in cost falls below this threshold
///   (for Nelder–Mead: the standard deviation of simplex costs).
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found (unconstrained space).
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` only when the solver met its own tolerance.
/// - `hit_max_iter`: `true` when the iteration cap stopped the run.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub hit_max_iter: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, hit_max_iter, status) = match &termination {
            TerminationStatus::NotTerminated => (false, false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => (
                matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                ),
                matches!(reason, TerminationReason::MaxItersReached),
                format!("{reason:?}"),
            ),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, hit_max_iter, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify solver names parse case-insensitively, including the
    // line-search suffix form.
    //
    // Given
    // -----
    // - Several spellings of supported solvers and one unknown name.
    //
    // Expect
    // ------
    // - Supported names map to the right variant; the unknown name errors.
    fn solver_from_str_accepts_known_names() {
        assert_eq!("LBFGS".parse::<Solver>().unwrap(), Solver::Lbfgs(LineSearcher::MoreThuente));
        assert_eq!(
            "lbfgs-HagerZhang".parse::<Solver>().unwrap(),
            Solver::Lbfgs(LineSearcher::HagerZhang)
        );
        assert_eq!("Nelder_Mead".parse::<Solver>().unwrap(), Solver::NelderMead { step: 0.5 });
        assert!(matches!("bfgs".parse::<Solver>(), Err(OptError::InvalidSolver { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Check the validation rules on tolerances and L-BFGS memory.
    //
    // Given
    // -----
    // - All-`None` tolerances, a zero iteration cap, a negative tolerance,
    //   and zero L-BFGS memory.
    //
    // Expect
    // ------
    // - Each is rejected with its dedicated error variant.
    fn tolerances_and_options_reject_invalid_settings() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();
        assert!(matches!(
            MLEOptions::new(tols, Solver::Lbfgs(LineSearcher::HagerZhang), false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        assert!(Solver::nelder_mead(0.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Ensure iteration-cap termination is reported as not converged but
    // flagged, while solver convergence sets `converged`.
    //
    // Given
    // -----
    // - Two outcomes built from MaxItersReached and SolverConverged.
    //
    // Expect
    // ------
    // - Flags differ as documented.
    fn optim_outcome_distinguishes_cap_from_convergence() {
        let capped = OptimOutcome::new(
            Some(array![1.0]),
            -2.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            10,
            FnEvalMap::new(),
            None,
        )
        .unwrap();
        assert!(!capped.converged);
        assert!(capped.hit_max_iter);

        let done = OptimOutcome::new(
            Some(array![1.0]),
            -2.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            3,
            FnEvalMap::new(),
            Some(array![0.0]),
        )
        .unwrap();
        assert!(done.converged);
        assert_eq!(done.grad_norm, Some(0.0));
    }
}
