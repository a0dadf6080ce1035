//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` is turned into minimizing `c(θ) = -ℓ(θ)`. Analytic
//! gradients are negated; when a model has none, the **cost** closure is
//! finite-differenced so no sign flip is needed on that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns `-∇ℓ(θ)` when the model provides it, and a
///   finite-difference gradient of the cost otherwise.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Central-difference gradient of the cost, retried with forward
    /// differences when an evaluation fails or the result is non-finite.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let central = theta.central_diff(&cost_func);
        if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`, rejecting non-finite log-likelihoods.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    struct Quadratic {
        analytic: bool,
    }

    impl LogLikelihood for Quadratic {
        type Data = Theta;

        fn value(&self, theta: &Theta, center: &Theta) -> OptResult<f64> {
            let d = theta - center;
            Ok(-d.dot(&d))
        }

        fn check(&self, _theta: &Theta, _center: &Theta) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, center: &Theta) -> OptResult<Grad> {
            if self.analytic {
                Ok((theta - center) * -2.0)
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the sign conventions of the adapter for both gradient paths.
    //
    // Given
    // -----
    // - ℓ(θ) = -|θ - c|² with and without an analytic gradient.
    //
    // Expect
    // ------
    // - cost = |θ - c|² and both gradient paths return 2(θ - c).
    fn adapter_flips_signs_and_falls_back_to_finite_differences() {
        // Arrange
        let center = array![1.0, -2.0];
        let theta = array![0.5, 0.5];
        let analytic = Quadratic { analytic: true };
        let numeric = Quadratic { analytic: false };

        // Act
        let a = ArgMinAdapter::new(&analytic, &center);
        let n = ArgMinAdapter::new(&numeric, &center);
        let cost = a.cost(&theta).unwrap();
        let ga = a.gradient(&theta).unwrap();
        let gn = n.gradient(&theta).unwrap();

        // Assert
        assert!((cost - 6.5).abs() < 1e-12);
        let expected = array![-1.0, 5.0];
        for i in 0..2 {
            assert!((ga[i] - expected[i]).abs() < 1e-12);
            assert!((gn[i] - expected[i]).abs() < 1e-5);
        }
    }
}
