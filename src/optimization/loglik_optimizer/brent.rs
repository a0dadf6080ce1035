//! loglik_optimizer::brent — bounded one-dimensional maximization.
//!
//! Purpose
//! -------
//! Maximize a scalar function on a closed interval with Brent's method
//! (golden section plus parabolic interpolation, no derivatives). The
//! spatial regression estimators use it for the concentrated likelihood of
//! the autoregressive parameter, whose admissible range is an interval.
//!
//! Conventions
//! -----------
//! - As with [`maximize`](super::maximize), the objective is a
//!   log-likelihood; the sign flip to a cost happens here.
//! - Errors raised by the objective come back unchanged.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::ScalarBrent,
};
use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};

/// Default absolute tolerance on the location of the maximum.
pub const DEFAULT_SCALAR_TOL: f64 = 1e-8;

/// Default iteration cap for [`maximize_scalar`].
pub const DEFAULT_SCALAR_MAX_ITER: u64 = 500;

/// Result of a bounded scalar maximization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOutcome {
    pub x: f64,
    pub value: f64,
    pub iterations: u64,
    pub converged: bool,
}

struct NegatedScalar<'a, G> {
    f: &'a G,
}

impl<G> CostFunction for NegatedScalar<'_, G>
where
    G: Fn(f64) -> OptResult<f64>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.f)(*x)?;
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(-value)
    }
}

/// maximize_scalar — maximize `f` on `[lower, upper]`.
///
/// Parameters
/// ----------
/// - `f`: `&G`
///   Objective; must be finite on the whole interval.
/// - `lower`, `upper`: `f64`
///   Finite bounds with `lower < upper`.
/// - `tol`: `f64`
///   Absolute tolerance on `x`.
/// - `max_iter`: `u64`
///   Iteration cap.
///
/// Errors
/// ------
/// - `OptError::InvalidParameter` for a degenerate or non-finite interval.
/// - `OptError::InvalidTolCost` for a non-positive tolerance.
/// - `OptError::NonFiniteCost` or any error raised by `f`.
pub fn maximize_scalar<G>(
    f: &G, lower: f64, upper: f64, tol: f64, max_iter: u64,
) -> OptResult<ScalarOutcome>
where
    G: Fn(f64) -> OptResult<f64>,
{
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(OptError::InvalidParameter {
            text: format!("scalar search interval [{lower}, {upper}] must be finite and non-empty"),
        });
    }
    if !tol.is_finite() || tol <= 0.0 {
        return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
    }

    let solver = ScalarBrent::new(lower, upper).set_tolerance(f64::EPSILON.sqrt(), tol);
    let problem = NegatedScalar { f };
    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(max_iter))
        .run()?;
    let state = result.state();
    let x = state.get_best_param().copied().ok_or(OptError::MissingThetaHat)?;
    let value = -state.get_best_cost();
    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    Ok(ScalarOutcome { x, value, iterations: state.get_iter(), converged })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Locate an interior maximum and a maximum pinned at the boundary.
    //
    // Given
    // -----
    // - f(x) = -(x - 0.3)² on [-1, 1] and g(x) = x on [-1, 1].
    //
    // Expect
    // ------
    // - argmax f ≈ 0.3; argmax g within tolerance of 1.
    fn maximize_scalar_finds_interior_and_boundary_maxima() {
        // Act
        let bump = |x: f64| -> OptResult<f64> { Ok(-(x - 0.3).powi(2)) };
        let ramp = |x: f64| -> OptResult<f64> { Ok(x) };
        let inner = maximize_scalar(&bump, -1.0, 1.0, 1e-10, 200).unwrap();
        let edge = maximize_scalar(&ramp, -1.0, 1.0, 1e-10, 200).unwrap();

        // Assert
        assert!((inner.x - 0.3).abs() < 1e-6, "x = {}", inner.x);
        assert!(inner.converged);
        assert!(edge.x > 1.0 - 1e-5, "x = {}", edge.x);
    }

    #[test]
    // Purpose
    // -------
    // Verify interval validation and error propagation from the objective.
    //
    // Given
    // -----
    // - An empty interval, and an objective that always fails.
    //
    // Expect
    // ------
    // - `InvalidParameter`, then the objective's own error.
    fn maximize_scalar_validates_and_propagates() {
        let ramp = |x: f64| -> OptResult<f64> { Ok(x) };
        assert!(matches!(
            maximize_scalar(&ramp, 1.0, 1.0, 1e-8, 10),
            Err(OptError::InvalidParameter { .. })
        ));
        let failing = |_: f64| -> OptResult<f64> {
            Err(OptError::ObjectiveFailed { text: "singular".to_string() })
        };
        assert_eq!(
            maximize_scalar(&failing, 0.0, 1.0, 1e-8, 10),
            Err(OptError::ObjectiveFailed { text: "singular".to_string() })
        );
    }
}
