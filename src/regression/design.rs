//! regression::design — named design matrices.
//!
//! Purpose
//! -------
//! Carry the regressor matrix together with its column names so fitted
//! coefficients can be reported and looked up by name. A design is
//! immutable: [`Design::augment`] and [`Design::lagged`] return new designs,
//! which is how the calibrator attaches a fresh accessibility column on
//! every proposal without touching the base design.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one row and one column; names unique; every entry finite.
//! - The intercept, when present, is the first column and is named
//!   [`INTERCEPT`].
use crate::{
    data::records::TractTable,
    regression::errors::{RegressionError, RegressionResult},
    spatial::weights::SpatialWeights,
};
use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashSet;

pub const INTERCEPT: &str = "(intercept)";

/// Prefix of spatially lagged covariate names in Durbin designs.
pub const LAG_PREFIX: &str = "W_";

#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    names: Vec<String>,
    matrix: Array2<f64>,
    has_intercept: bool,
}

impl Design {
    /// Design without an intercept.
    ///
    /// # Errors
    /// `EmptyDesign`, `DimensionMismatch` (names vs columns),
    /// `DuplicateColumn`, `NonFiniteValue`.
    pub fn new(names: Vec<String>, matrix: Array2<f64>) -> RegressionResult<Self> {
        Self::validated(names, matrix, false)
    }

    /// Design with a leading column of ones named [`INTERCEPT`].
    pub fn with_intercept(names: Vec<String>, matrix: Array2<f64>) -> RegressionResult<Self> {
        let ones = Array2::<f64>::ones((matrix.nrows(), 1));
        let full = concatenate(Axis(1), &[ones.view(), matrix.view()]).map_err(|_| {
            RegressionError::DimensionMismatch {
                what: "intercept column",
                expected: matrix.nrows(),
                found: ones.nrows(),
            }
        })?;
        let mut all_names = Vec::with_capacity(names.len() + 1);
        all_names.push(INTERCEPT.to_string());
        all_names.extend(names);
        Self::validated(all_names, full, true)
    }

    /// Intercept plus every covariate of the table, in header order.
    pub fn from_tracts(tracts: &TractTable) -> RegressionResult<Self> {
        Self::with_intercept(tracts.covariate_names().to_vec(), tracts.covariate_matrix())
    }

    fn validated(
        names: Vec<String>, matrix: Array2<f64>, has_intercept: bool,
    ) -> RegressionResult<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(RegressionError::EmptyDesign);
        }
        if names.len() != matrix.ncols() {
            return Err(RegressionError::DimensionMismatch {
                what: "column names",
                expected: matrix.ncols(),
                found: names.len(),
            });
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(RegressionError::DuplicateColumn { name: name.clone() });
            }
        }
        if let Some((index, &value)) = matrix.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegressionError::NonFiniteValue { what: "design", index, value });
        }
        Ok(Design { names, matrix, has_intercept })
    }

    pub fn n_obs(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.position(name).map(|j| self.matrix.column(j))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// New design with `column` appended under `name`.
    ///
    /// # Errors
    /// `DimensionMismatch`, `DuplicateColumn`, `NonFiniteValue`.
    pub fn augment(&self, name: &str, column: ArrayView1<f64>) -> RegressionResult<Design> {
        if column.len() != self.n_obs() {
            return Err(RegressionError::DimensionMismatch {
                what: "augmented column",
                expected: self.n_obs(),
                found: column.len(),
            });
        }
        let col = column.to_owned().insert_axis(Axis(1));
        let matrix = concatenate(Axis(1), &[self.matrix.view(), col.view()]).map_err(|_| {
            RegressionError::DimensionMismatch {
                what: "augmented column",
                expected: self.n_obs(),
                found: column.len(),
            }
        })?;
        let mut names = self.names.clone();
        names.push(name.to_string());
        Self::validated(names, matrix, self.has_intercept)
    }

    /// Durbin design `[X, WX]`; the intercept is not lagged.
    ///
    /// Returns the design together with `(base, lagged)` column index pairs.
    pub fn lagged(&self, weights: &SpatialWeights) -> RegressionResult<(Design, Vec<(usize, usize)>)> {
        if weights.len() != self.n_obs() {
            return Err(RegressionError::WeightsSizeMismatch {
                expected: self.n_obs(),
                found: weights.len(),
            });
        }
        let start = usize::from(self.has_intercept);
        let base = self.matrix.slice(ndarray::s![.., start..]);
        let lagged = weights.lag_columns(base)?;

        let mut names = self.names.clone();
        let mut pairs = Vec::with_capacity(lagged.ncols());
        for (offset, name) in self.names[start..].iter().enumerate() {
            pairs.push((start + offset, self.n_cols() + offset));
            names.push(format!("{LAG_PREFIX}{name}"));
        }
        let matrix = if lagged.ncols() == 0 {
            self.matrix.clone()
        } else {
            concatenate(Axis(1), &[self.matrix.view(), lagged.view()]).map_err(|_| {
                RegressionError::DimensionMismatch {
                    what: "lagged covariates",
                    expected: self.n_obs(),
                    found: lagged.nrows(),
                }
            })?
        };
        Ok((Self::validated(names, matrix, self.has_intercept)?, pairs))
    }

    /// `X β`.
    pub fn predict(&self, beta: ArrayView1<f64>) -> Array1<f64> {
        self.matrix.dot(&beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::adjacency::Adjacency;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify augmentation returns a new design and leaves the base intact.
    //
    // Given
    // -----
    // - Intercept design with one covariate; augment with "access".
    //
    // Expect
    // ------
    // - Base keeps 2 columns; augmented has 3 with the new name last;
    //   re-adding the same name is rejected.
    fn augment_returns_fresh_design_and_rejects_duplicates() {
        // Arrange
        let base = Design::with_intercept(vec!["x".into()], array![[1.0], [2.0], [3.0]]).unwrap();

        // Act
        let aug = base.augment("access", array![0.5, -0.5, 0.0].view()).unwrap();

        // Assert
        assert_eq!(base.n_cols(), 2);
        assert_eq!(aug.names(), &[INTERCEPT.to_string(), "x".into(), "access".into()]);
        assert_eq!(aug.column("access").unwrap(), array![0.5, -0.5, 0.0]);
        assert!(matches!(
            aug.augment("access", array![1.0, 1.0, 1.0].view()),
            Err(RegressionError::DuplicateColumn { .. })
        ));
        assert!(base.augment("bad", array![1.0, f64::NAN, 0.0].view()).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check Durbin lagging skips the intercept and names lagged columns.
    //
    // Given
    // -----
    // - Two units that are mutual neighbors; covariate x = [1, 3].
    //
    // Expect
    // ------
    // - Columns [(intercept), x, W_x] with W_x = [3, 1]; pair (1, 2).
    fn lagged_design_skips_intercept() {
        // Arrange
        let w = SpatialWeights::from_adjacency(
            &Adjacency::from_entries(2, &[(0, 1, 1.0), (1, 0, 1.0)]).unwrap(),
        )
        .unwrap();
        let d = Design::with_intercept(vec!["x".into()], array![[1.0], [3.0]]).unwrap();

        // Act
        let (lagged, pairs) = d.lagged(&w).unwrap();

        // Assert
        assert_eq!(lagged.names()[2], "W_x");
        assert_eq!(lagged.column("W_x").unwrap(), array![3.0, 1.0]);
        assert_eq!(pairs, vec![(1, 2)]);
    }
}
