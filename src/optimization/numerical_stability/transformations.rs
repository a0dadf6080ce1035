//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries, using explicit cutoffs (`x > 20.0`) to keep
//! `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`safe_softplus(x)`]: stable `ln(1 + exp(x))`, mapping ℝ → [0, ∞).
//! - [`safe_softplus_inv(x)`]: inverse of softplus on (0, ∞).
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, mapping ℝ → [0, 1].
//! - [`safe_logit(p)`]: inverse of the logistic on (0, 1), clamped by
//!   [`LOGIT_EPS`].
//! - [`log_sum_exp(xs)`]: `ln Σ exp(x_i)` with the maximum subtracted
//!   before exponentiating.

/// Clamp used when inverting the logistic near 0 or 1.
pub const LOGIT_EPS: f64 = 1e-10;

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic absolute tolerance for "numerically zero" comparisons.
pub const GENERAL_TOL: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For sufficiently large `x`, `softplus(x) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The result is never negative, which the bounded coefficient maps rely on.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: returns `t = ln(exp(x) - 1)`.
///
/// `x` must be finite and `> 0`; callers nudge boundary values inward before
/// inverting.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates `exp` only on non-positive arguments so neither branch can
/// overflow.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse logistic `logit(p) = ln(p / (1 - p))`, with `p` clamped to
/// `[LOGIT_EPS, 1 - LOGIT_EPS]`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Max-shifted log-sum-exp.
///
/// Returns `m + ln Σ exp(x_i - m)` with `m = max_i x_i`, so the largest
/// exponent evaluated is `exp(0) = 1`. An empty iterator yields `-∞`
/// (the logsum of an empty choice set).
pub fn log_sum_exp<I>(xs: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = xs.into_iter();
    let max = iter.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = iter.map(|x| (x - max).exp()).sum();
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that `safe_softplus` agrees with the naïve formula on a moderate
    // grid and stays finite in the tails.
    //
    // Given
    // -----
    // - x in {-30, -5, 0, 5, 19.9} and a large x = 1e4.
    //
    // Expect
    // ------
    // - Agreement within 1e-12 on the grid and softplus(1e4) == 1e4.
    fn safe_softplus_matches_naive_formula_and_is_finite_in_tails() {
        // Arrange
        let grid = [-30.0, -5.0, 0.0, 5.0, 19.9];

        // Act + Assert
        for &x in &grid {
            let naive = (1.0 + f64::exp(x)).ln();
            assert!((safe_softplus(x) - naive).abs() < 1e-12, "x = {x}");
        }
        assert_eq!(safe_softplus(1e4), 1e4);
        assert!(safe_softplus(-1e4) >= 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the softplus inverse recovers its input.
    //
    // Given
    // -----
    // - Positive values spanning several orders of magnitude.
    //
    // Expect
    // ------
    // - softplus(softplus_inv(x)) ≈ x.
    fn safe_softplus_inv_round_trips() {
        for &x in &[1e-6, 0.3, 1.0, 7.5, 42.0] {
            let back = safe_softplus(safe_softplus_inv(x));
            assert!((back - x).abs() < 1e-9 * x.max(1.0), "x = {x}, back = {back}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Confirm logistic/logit are inverse to each other and the logistic
    // saturates without producing NaN.
    //
    // Given
    // -----
    // - A grid of probabilities and extreme logits ±800.
    //
    // Expect
    // ------
    // - Round trip within 1e-9; σ(800) == 1, σ(-800) == 0.
    fn logistic_and_logit_are_inverse_and_saturate_cleanly() {
        for &p in &[0.01, 0.25, 0.5, 0.9, 0.999] {
            assert!((safe_logistic(safe_logit(p)) - p).abs() < 1e-9);
        }
        assert_eq!(safe_logistic(800.0), 1.0);
        assert_eq!(safe_logistic(-800.0), 0.0);
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the max shift keeps log-sum-exp finite for utilities spanning
    // a very wide range.
    //
    // Given
    // -----
    // - Inputs [1e6, 0, -3].
    //
    // Expect
    // ------
    // - Result is finite and equal to 1e6 up to rounding.
    fn log_sum_exp_does_not_overflow_on_wide_ranges() {
        // Act
        let v = log_sum_exp([1e6, 0.0, -3.0]);

        // Assert
        assert!(v.is_finite());
        assert!((v - 1e6).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Compare against the naïve formula where the latter is safe.
    //
    // Given
    // -----
    // - Inputs [0.5, -1.0, 2.0].
    //
    // Expect
    // ------
    // - Agreement within 1e-12; empty input returns -∞.
    fn log_sum_exp_matches_naive_formula_on_safe_inputs() {
        let xs = [0.5, -1.0, 2.0];
        let naive = xs.iter().map(|x: &f64| x.exp()).sum::<f64>().ln();
        assert!((log_sum_exp(xs) - naive).abs() < 1e-12);
        assert_eq!(log_sum_exp(Vec::<f64>::new()), f64::NEG_INFINITY);
    }
}
