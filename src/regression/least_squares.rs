//! regression::least_squares — Cholesky solves with a collinearity guard.
//!
//! The guard inspects the eigenvalues of the column-scaled Gram matrix
//! `S⁻¹ X'X S⁻¹` (`S` = column norms). This is scale free, so a design is
//! flagged only for genuine (near-)linear dependence between columns.
use crate::regression::errors::{RegressionError, RegressionResult};
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Smallest admissible eigenvalue of the scaled Gram matrix.
pub const COLLINEARITY_TOL: f64 = 1e-10;

/// A factorized `X'X` that can be reused for several right-hand sides.
pub(crate) struct LeastSquares<'a> {
    x: ArrayView2<'a, f64>,
    chol: Cholesky<f64, Dyn>,
}

impl<'a> LeastSquares<'a> {
    /// Factorize `X'X`.
    ///
    /// # Errors
    /// `SingularDesign` for collinear or zero columns.
    pub(crate) fn new(x: ArrayView2<'a, f64>) -> RegressionResult<Self> {
        let k = x.ncols();
        let xtx = x.t().dot(&x);
        let norms: Vec<f64> = (0..k).map(|j| xtx[[j, j]].sqrt()).collect();
        if norms.iter().any(|&s| s <= 0.0 || !s.is_finite()) {
            return Err(RegressionError::SingularDesign { min_eigenvalue: 0.0 });
        }
        let scaled = DMatrix::<f64>::from_fn(k, k, |i, j| xtx[[i, j]] / (norms[i] * norms[j]));
        let min_eigenvalue = scaled.symmetric_eigenvalues().iter().copied().fold(f64::INFINITY, f64::min);
        if min_eigenvalue < COLLINEARITY_TOL {
            return Err(RegressionError::SingularDesign { min_eigenvalue });
        }
        let gram = DMatrix::<f64>::from_fn(k, k, |i, j| xtx[[i, j]]);
        let chol = gram.cholesky().ok_or(RegressionError::SingularDesign { min_eigenvalue })?;
        Ok(LeastSquares { x, chol })
    }

    /// `(X'X)⁻¹ X'y`.
    pub(crate) fn coefficients(&self, y: ArrayView1<f64>) -> Array1<f64> {
        let xty = self.x.t().dot(&y);
        let rhs = DVector::<f64>::from_iterator(xty.len(), xty.iter().copied());
        let sol = self.chol.solve(&rhs);
        sol.iter().copied().collect()
    }

    /// `y − X b` for `b = (X'X)⁻¹ X'y`.
    pub(crate) fn fit(&self, y: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let beta = self.coefficients(y);
        let residuals = &y - &self.x.dot(&beta);
        (beta, residuals)
    }

    pub(crate) fn gram_inverse(&self) -> Array2<f64> {
        let inv = self.chol.inverse();
        Array2::from_shape_fn((inv.nrows(), inv.ncols()), |(i, j)| inv[(i, j)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Recover exact coefficients of a noiseless linear relation.
    //
    // Given
    // -----
    // - y = 2 + 3x on four points.
    //
    // Expect
    // ------
    // - b = [2, 3], zero residuals.
    fn recovers_noiseless_coefficients() {
        // Arrange
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 5.0]];
        let y = array![2.0, 5.0, 8.0, 17.0];

        // Act
        let ls = LeastSquares::new(x.view()).unwrap();
        let (b, e) = ls.fit(y.view());

        // Assert
        assert!((b[0] - 2.0).abs() < 1e-10 && (b[1] - 3.0).abs() < 1e-10);
        assert!(e.iter().all(|r| r.abs() < 1e-10));
        let inv = ls.gram_inverse();
        assert!((inv[[0, 1]] - inv[[1, 0]]).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure collinear columns surface as a singular design.
    //
    // Given
    // -----
    // - Third column equal to twice the second.
    //
    // Expect
    // ------
    // - `SingularDesign`.
    fn collinear_columns_are_rejected() {
        let x = array![[1.0, 1.0, 2.0], [1.0, 2.0, 4.0], [1.0, 3.0, 6.0], [1.0, 5.0, 10.0]];
        assert!(matches!(LeastSquares::new(x.view()), Err(RegressionError::SingularDesign { .. })));
    }
}
