//! accessibility::standardize — z-scores with population variance.
use crate::{
    accessibility::errors::{AccessError, AccessResult},
    optimization::numerical_stability::transformations::GENERAL_TOL,
};
use ndarray::{Array1, ArrayView1};

/// `(x − mean) / sd` with `sd` the population (ddof = 0) standard deviation.
///
/// # Errors
/// - `EmptyInput` for an empty vector.
/// - `NonFiniteInput` for NaN/∞ entries.
/// - `ZeroVariance` when the variance is at or below `GENERAL_TOL` relative
///   to the squared mean magnitude.
pub fn standardize(x: ArrayView1<f64>) -> AccessResult<Array1<f64>> {
    let n = x.len();
    if n == 0 {
        return Err(AccessError::EmptyInput { what: "standardize input" });
    }
    if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AccessError::NonFiniteInput { what: "standardize input", index, value });
    }
    let mean = x.sum() / n as f64;
    let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    if var <= GENERAL_TOL * mean.powi(2).max(1.0) {
        return Err(AccessError::ZeroVariance);
    }
    let sd = var.sqrt();
    Ok(x.mapv(|v| (v - mean) / sd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Standardizing twice must not move the vector beyond rounding.
    //
    // Given
    // -----
    // - x = [3, 7, -2, 10, 4.5].
    //
    // Expect
    // ------
    // - z has mean ≈ 0 and variance ≈ 1; standardize(z) ≈ z within 1e-12.
    fn standardization_is_idempotent() {
        // Arrange
        let x = array![3.0, 7.0, -2.0, 10.0, 4.5];

        // Act
        let z = standardize(x.view()).unwrap();
        let zz = standardize(z.view()).unwrap();

        // Assert
        assert!(z.mean().unwrap().abs() < 1e-12);
        assert!((z.mapv(|v| v * v).mean().unwrap() - 1.0).abs() < 1e-12);
        for (a, b) in z.iter().zip(zz.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_and_empty_vectors_are_rejected() {
        assert_eq!(standardize(array![2.0, 2.0, 2.0].view()), Err(AccessError::ZeroVariance));
        assert!(standardize(Array1::<f64>::zeros(0).view()).is_err());
    }
}
