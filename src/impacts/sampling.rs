//! impacts::sampling — seeded multivariate normal draws.
//!
//! The covariance is factored once. A Cholesky factor is used when the
//! matrix is positive definite; otherwise the factor is `Q·diag(√λ⁺)` from a
//! symmetric eigendecomposition with negative eigenvalues clamped to zero.
use crate::impacts::errors::{ImpactError, ImpactResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MvnSampler {
    mean: Array1<f64>,
    factor: Array2<f64>,
    clamped: bool,
}

impl MvnSampler {
    pub(crate) fn new(mean: Array1<f64>, covariance: &Array2<f64>) -> ImpactResult<Self> {
        let k = mean.len();
        if covariance.nrows() != k || covariance.ncols() != k {
            return Err(ImpactError::CovarianceShape {
                expected: k,
                found: (covariance.nrows(), covariance.ncols()),
            });
        }
        if let Some(((row, col), &value)) = covariance.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(ImpactError::NonFiniteCovariance { row, col, value });
        }

        let sym = DMatrix::from_fn(k, k, |i, j| 0.5 * (covariance[[i, j]] + covariance[[j, i]]));
        if let Some(chol) = sym.clone().cholesky() {
            let l = chol.l();
            let factor = Array2::from_shape_fn((k, k), |(i, j)| l[(i, j)]);
            return Ok(MvnSampler { mean, factor, clamped: false });
        }
        let eigen = sym.symmetric_eigen();
        let q = eigen.eigenvectors;
        let roots: Vec<f64> = eigen.eigenvalues.iter().map(|l| l.max(0.0).sqrt()).collect();
        let factor = Array2::from_shape_fn((k, k), |(i, j)| q[(i, j)] * roots[j]);
        Ok(MvnSampler { mean, factor, clamped: true })
    }

    /// Whether the eigenvalue fallback was needed.
    pub(crate) fn clamped(&self) -> bool {
        self.clamped
    }

    pub(crate) fn draw<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        let z: Array1<f64> = (0..self.mean.len()).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        &self.mean + &self.factor.dot(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    // Purpose
    // -------
    // Sample moments of the draws should match the requested mean and
    // covariance.
    //
    // Given
    // -----
    // - μ = (1, −2), Σ = [[1, 0.5], [0.5, 2]], 20 000 draws.
    //
    // Expect
    // ------
    // - Cholesky path; sample mean and covariance within 0.05.
    fn draws_reproduce_mean_and_covariance() {
        // Arrange
        let sigma = array![[1.0, 0.5], [0.5, 2.0]];
        let sampler = MvnSampler::new(array![1.0, -2.0], &sigma).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        // Act
        let draws: Vec<Array1<f64>> = (0..20_000).map(|_| sampler.draw(&mut rng)).collect();

        // Assert
        assert!(!sampler.clamped());
        let n = draws.len() as f64;
        let mean: Array1<f64> = draws.iter().fold(Array1::<f64>::zeros(2), |acc, d| acc + d) / n;
        assert!((mean[0] - 1.0).abs() < 0.05 && (mean[1] + 2.0).abs() < 0.05);
        for i in 0..2 {
            for j in 0..2 {
                let c = draws.iter().map(|d| (d[i] - mean[i]) * (d[j] - mean[j])).sum::<f64>() / n;
                assert!((c - sigma[[i, j]]).abs() < 0.05, "cov[{i},{j}] = {c}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // An indefinite covariance falls back to the clamped eigen factor and
    // never varies along the negative direction.
    //
    // Given
    // -----
    // - Σ = diag(1, −1).
    //
    // Expect
    // ------
    // - `clamped()`; the second coordinate always equals its mean.
    fn indefinite_covariance_is_clamped() {
        let sampler = MvnSampler::new(array![0.0, 3.0], &array![[1.0, 0.0], [0.0, -1.0]]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!(sampler.clamped());
        for _ in 0..10 {
            assert!((sampler.draw(&mut rng)[1] - 3.0).abs() < 1e-12);
        }
        assert!(matches!(
            MvnSampler::new(array![0.0], &array![[f64::NAN]]),
            Err(ImpactError::NonFiniteCovariance { .. })
        ));
    }
}
