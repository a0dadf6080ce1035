//! spatial::weights — row-standardized spatial weights and the lag operator.
//!
//! Purpose
//! -------
//! Hold the `n × n` weights matrix `W` used by every spatial estimator:
//! sparse rows, row-standardized, with isolates kept as all-zero rows. The
//! eigenvalues of `W` are computed once at construction because both the
//! log-determinant `ln|I − ρW| = Σ ln(1 − ρ λ_i)` and the admissible ρ
//! interval depend on them.
//!
//! Key behaviors
//! -------------
//! - [`SpatialWeights::build`] dispatches on [`AdjacencyRule`] over a
//!   [`TractTable`]; [`SpatialWeights::from_adjacency`] accepts any
//!   validated raw adjacency.
//! - [`SpatialWeights::lag`] / [`SpatialWeights::lag_columns`] apply `W`.
//! - [`SpatialWeights::rho_bounds`] returns `(1/λ_min, 1/λ_max)` shrunk by a
//!   small margin.
//!
//! Invariants & assumptions
//! ------------------------
//! - Non-isolate rows sum to 1 within rounding; isolate rows are empty and
//!   their lag is exactly 0.
//! - Raw weights are symmetric, so `W = D⁻¹C` is similar to the symmetric
//!   `D^{-1/2} C D^{-1/2}` and has real eigenvalues.
//! - The diagonal is zero.
//!
//! Conventions
//! -----------
//! - Eigenvalues are stored in ascending order. Isolates contribute an
//!   eigenvalue of exactly 0.
use crate::{
    data::records::TractTable,
    spatial::{
        adjacency::{distance_band, queen_contiguity, Adjacency, AdjacencyRule},
        errors::{SpatialError, SpatialResult},
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Margin kept between ρ and the singular points `1/λ`.
pub const RHO_BOUND_MARGIN: f64 = 1e-6;

/// Row-standardized sparse spatial weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialWeights {
    rows: Vec<Vec<(usize, f64)>>,
    eigenvalues: Vec<f64>,
}

impl SpatialWeights {
    /// Build weights over a tract table.
    ///
    /// Queen contiguity reads tract polygons; distance bands read
    /// population-weighted centroids.
    ///
    /// # Errors
    /// `Data` when the required geometry column is missing, plus any error
    /// of the adjacency builders.
    pub fn build(tracts: &TractTable, rule: &AdjacencyRule) -> SpatialResult<Self> {
        let adjacency = match *rule {
            AdjacencyRule::Queen => queen_contiguity(&tracts.geometries()?)?,
            AdjacencyRule::DistanceBand { radius, power } => {
                distance_band(&tracts.population_centroids()?, radius, power)?
            }
        };
        Self::from_adjacency(&adjacency)
    }

    /// Row-standardize a raw adjacency and compute its spectrum.
    pub fn from_adjacency(adjacency: &Adjacency) -> SpatialResult<Self> {
        let n = adjacency.len();
        if n == 0 {
            return Err(SpatialError::EmptyInput);
        }
        let row_sums: Vec<f64> =
            adjacency.rows().iter().map(|row| row.iter().map(|&(_, w)| w).sum()).collect();

        let rows = adjacency
            .rows()
            .iter()
            .zip(&row_sums)
            .map(|(row, &s)| row.iter().map(|&(j, w)| (j, w / s)).collect())
            .collect();

        // D^{-1/2} C D^{-1/2}; isolates have empty rows so their scale never
        // enters.
        let inv_sqrt: Vec<f64> =
            row_sums.iter().map(|&s| if s > 0.0 { 1.0 / s.sqrt() } else { 0.0 }).collect();
        let mut sym = DMatrix::<f64>::zeros(n, n);
        for (i, row) in adjacency.rows().iter().enumerate() {
            for &(j, w) in row {
                sym[(i, j)] = inv_sqrt[i] * w * inv_sqrt[j];
            }
        }
        let mut eigenvalues: Vec<f64> = sym.symmetric_eigen().eigenvalues.iter().copied().collect();
        eigenvalues.sort_by(f64::total_cmp);

        Ok(SpatialWeights { rows, eigenvalues })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Standardized neighbors of `i`, sorted by index.
    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.rows[i]
            .binary_search_by_key(&j, |&(k, _)| k)
            .map(|pos| self.rows[i][pos].1)
            .unwrap_or(0.0)
    }

    /// Number of neighbors per unit.
    pub fn cardinalities(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Indices of units without neighbors.
    pub fn isolates(&self) -> Vec<usize> {
        self.rows.iter().enumerate().filter(|(_, r)| r.is_empty()).map(|(i, _)| i).collect()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.iter().map(|&(_, w)| w).sum()).collect()
    }

    /// Eigenvalues of `W`, ascending.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Admissible interval for the spatial parameter.
    ///
    /// `(1/λ_min, 1/λ_max)` shrunk inward by [`RHO_BOUND_MARGIN`]. When the
    /// spectrum has no negative (resp. positive) eigenvalue the lower
    /// (resp. upper) end falls back to −1 (resp. 1).
    pub fn rho_bounds(&self) -> (f64, f64) {
        let lambda_min = self.eigenvalues.first().copied().unwrap_or(0.0);
        let lambda_max = self.eigenvalues.last().copied().unwrap_or(0.0);
        let lower = if lambda_min < -RHO_BOUND_MARGIN { 1.0 / lambda_min } else { -1.0 };
        let upper = if lambda_max > RHO_BOUND_MARGIN { 1.0 / lambda_max } else { 1.0 };
        (lower + RHO_BOUND_MARGIN, upper - RHO_BOUND_MARGIN)
    }

    /// `ln|I − ρW| = Σ ln(1 − ρ λ_i)`.
    ///
    /// Returns `-∞` when ρ leaves the admissible interval.
    pub fn log_det(&self, rho: f64) -> f64 {
        let mut acc = 0.0;
        for &l in &self.eigenvalues {
            let a = 1.0 - rho * l;
            if a <= 0.0 {
                return f64::NEG_INFINITY;
            }
            acc += a.ln();
        }
        acc
    }

    /// `d/dρ ln|I − ρW| = −Σ λ_i / (1 − ρ λ_i)`.
    pub fn log_det_derivative(&self, rho: f64) -> f64 {
        -self.eigenvalues.iter().map(|&l| l / (1.0 - rho * l)).sum::<f64>()
    }

    /// Spatial lag `W x`.
    ///
    /// # Errors
    /// `DimensionMismatch` if `x.len() != n`.
    pub fn lag(&self, x: ArrayView1<f64>) -> SpatialResult<Array1<f64>> {
        self.check_len(x.len())?;
        Ok(self.lag_unchecked(x))
    }

    /// Spatial lag applied to every column of `x`.
    pub fn lag_columns(&self, x: ArrayView2<f64>) -> SpatialResult<Array2<f64>> {
        self.check_len(x.nrows())?;
        let mut out = Array2::<f64>::zeros(x.raw_dim());
        for (c, col) in x.columns().into_iter().enumerate() {
            out.column_mut(c).assign(&self.lag_unchecked(col));
        }
        Ok(out)
    }

    /// Dense copy, mainly for diagnostics and tests.
    pub fn to_dense(&self) -> Array2<f64> {
        let n = self.len();
        let mut out = Array2::<f64>::zeros((n, n));
        for (i, row) in self.rows.iter().enumerate() {
            for &(j, w) in row {
                out[[i, j]] = w;
            }
        }
        out
    }

    /// `tr(W²) = Σ_ij w_ij w_ji`.
    pub fn trace_of_square(&self) -> f64 {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| row.iter().map(|&(j, w)| w * self.weight(j, i)).sum::<f64>())
            .sum()
    }

    pub(crate) fn lag_unchecked(&self, x: ArrayView1<f64>) -> Array1<f64> {
        self.rows.iter().map(|row| row.iter().map(|&(j, w)| w * x[j]).sum()).collect()
    }

    fn check_len(&self, found: usize) -> SpatialResult<()> {
        if found != self.len() {
            return Err(SpatialError::DimensionMismatch { expected: self.len(), found });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn path_with_isolate() -> SpatialWeights {
        // 0 - 1 - 2 chain plus isolated unit 3.
        let adj = Adjacency::from_entries(4, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0)])
            .unwrap();
        SpatialWeights::from_adjacency(&adj).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify row standardization and the isolate policy.
    //
    // Given
    // -----
    // - A three-unit chain plus one isolate.
    //
    // Expect
    // ------
    // - Non-isolate rows sum to 1 within 1e-9; the isolate row is all zero
    //   and listed by `isolates()`; the diagonal is zero.
    fn rows_sum_to_one_and_isolates_stay_zero() {
        // Arrange + Act
        let w = path_with_isolate();

        // Assert
        let sums = w.row_sums();
        for &s in &sums[..3] {
            assert!((s - 1.0).abs() < 1e-9);
        }
        assert_eq!(sums[3], 0.0);
        assert_eq!(w.isolates(), vec![3]);
        assert_eq!(w.cardinalities(), vec![1, 2, 1, 0]);
        let dense = w.to_dense();
        for i in 0..4 {
            assert_eq!(dense[[i, i]], 0.0);
        }
        assert!((w.weight(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check the spatial lag and its zero value at isolates.
    //
    // Given
    // -----
    // - x = [1, 2, 3, 100] on the chain-plus-isolate weights.
    //
    // Expect
    // ------
    // - Wx = [2, 2, 2, 0].
    fn lag_averages_neighbors_and_is_zero_at_isolates() {
        // Arrange
        let w = path_with_isolate();
        let x = array![1.0, 2.0, 3.0, 100.0];

        // Act
        let wx = w.lag(x.view()).unwrap();

        // Assert
        assert_eq!(wx, array![2.0, 2.0, 2.0, 0.0]);
        assert!(w.lag(array![1.0].view()).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Confirm the eigenvalues match a dense computation and the ρ interval
    // follows from the extreme eigenvalues.
    //
    // Given
    // -----
    // - The chain W, whose eigenvalues are {-1, 0, 0, 1} (isolate adds 0).
    //
    // Expect
    // ------
    // - Eigenvalues within 1e-10; ρ bounds ≈ (-1, 1); trace of W² equals
    //   Σ λ².
    fn eigenvalues_and_rho_bounds_match_chain_spectrum() {
        // Arrange + Act
        let w = path_with_isolate();

        // Assert
        let expected = [-1.0, 0.0, 0.0, 1.0];
        for (l, e) in w.eigenvalues().iter().zip(expected) {
            assert!((l - e).abs() < 1e-10, "{l} vs {e}");
        }
        let (lo, hi) = w.rho_bounds();
        assert!((lo + 1.0).abs() < 1e-5 && lo > -1.0);
        assert!((hi - 1.0).abs() < 1e-5 && hi < 1.0);
        let sum_sq: f64 = w.eigenvalues().iter().map(|l| l * l).sum();
        assert!((w.trace_of_square() - sum_sq).abs() < 1e-10);
        assert!((w.log_det(0.0)).abs() < 1e-12);
        assert_eq!(w.log_det(1.5), f64::NEG_INFINITY);
    }
}
