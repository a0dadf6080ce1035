//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! Validates the starting point, wraps the model in an [`ArgMinAdapter`]
//! (which *minimizes* `-ℓ(θ)`), builds the solver named by
//! [`MLEOptions::solver`], and delegates to the matching runner.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_nelder_mead, build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::{run_lbfgs, run_nelder_mead},
        traits::{LineSearcher, LogLikelihood, MLEOptions, Solver},
        validation::validate_theta0,
    },
};

/// Maximize a log-likelihood `ℓ(θ)`.
///
/// # Behavior
/// - Rejects non-finite entries in `theta0`, then calls `f.check(theta0, data)`.
/// - Dispatches on `opts.solver`: L-BFGS with the chosen line search, or
///   Nelder–Mead with an axis-aligned simplex of the configured step.
///
/// # Errors
/// - `OptError::InvalidThetaInput` for a non-finite starting point.
/// - Any error from `f.check`, the builders, or the runners. Errors raised
///   inside `f.value`/`f.grad` are returned unchanged.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use park_access::optimization::errors::OptResult;
/// use park_access::optimization::loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta};
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), park_access::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    validate_theta0(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.solver {
        Solver::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        Solver::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        Solver::NelderMead { step } => {
            let solver = build_nelder_mead(&theta0, step, opts)?;
            run_nelder_mead(opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Grad, traits::Tolerances},
    };
    use ndarray::array;

    /// ℓ(θ) = -Σ (θ_i - c_i)², analytic gradient optional.
    struct ShiftedBowl {
        with_grad: bool,
    }

    impl LogLikelihood for ShiftedBowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, center: &Theta) -> OptResult<f64> {
            let d = theta - center;
            Ok(-d.dot(&d))
        }

        fn check(&self, theta: &Theta, center: &Theta) -> OptResult<()> {
            if theta.len() != center.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: center.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, center: &Theta) -> OptResult<Grad> {
            if !self.with_grad {
                return Err(OptError::GradientNotImplemented);
            }
            Ok((theta - center) * -2.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Exercise every solver choice end to end on a concave bowl.
    //
    // Given
    // -----
    // - Center c = (1.5, -0.5), start at the origin.
    // - L-BFGS (both line searches, analytic and FD gradients) and Nelder–Mead.
    //
    // Expect
    // ------
    // - θ̂ ≈ c and ℓ(θ̂) ≈ 0 for each solver.
    fn maximize_finds_bowl_center_with_every_solver() {
        // Arrange
        let center = array![1.5, -0.5];
        let tols = Tolerances::new(Some(1e-8), Some(1e-12), Some(500)).unwrap();
        let solvers = [
            Solver::Lbfgs(LineSearcher::MoreThuente),
            Solver::Lbfgs(LineSearcher::HagerZhang),
            Solver::NelderMead { step: 0.5 },
        ];

        for solver in solvers {
            for with_grad in [true, false] {
                let opts = MLEOptions::new(tols, solver, false, None).unwrap();

                // Act
                let out = maximize(&ShiftedBowl { with_grad }, array![0.0, 0.0], &center, &opts)
                    .unwrap();

                // Assert
                for i in 0..2 {
                    assert!(
                        (out.theta_hat[i] - center[i]).abs() < 1e-4,
                        "{solver:?}: {:?}",
                        out.theta_hat
                    );
                }
                assert!(out.value > -1e-7);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the starting point is validated before any solver work.
    //
    // Given
    // -----
    // - A NaN entry in θ₀ and a θ₀ of the wrong length.
    //
    // Expect
    // ------
    // - `InvalidThetaInput` and the model's `ThetaLengthMismatch`.
    fn maximize_rejects_bad_starting_points() {
        let center = array![0.0, 0.0];
        let opts = MLEOptions::default();
        let f = ShiftedBowl { with_grad: true };
        assert!(matches!(
            maximize(&f, array![f64::NAN, 0.0], &center, &opts),
            Err(OptError::InvalidThetaInput { index: 0, .. })
        ));
        assert!(matches!(
            maximize(&f, array![0.0], &center, &opts),
            Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
