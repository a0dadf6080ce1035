//! accessibility::logsum — the logsum accessibility engine.
//!
//! Purpose
//! -------
//! Compute, for every tract `i`, the expected maximum utility over parks
//!
//! ```text
//! A_i = ln Σ_j exp(V_ij),   V_ij = β_d d_ij + β_s s_j + β_t t_j
//! ```
//!
//! where the `β_t t_j` term is present only when both a signal vector and a
//! signal coefficient are supplied.
//!
//! Key behaviors
//! -------------
//! - Shapes and finiteness are validated once in [`LogsumInputs::new`]; the
//!   calibrator then evaluates [`LogsumInputs::accessibility`] many times.
//! - The park term `β_s s_j + β_t t_j` is computed once per call and shared
//!   by all rows.
//! - Each row is reduced with the max-shifted [`log_sum_exp`], so utilities
//!   of magnitude 1e6 neither overflow nor lose the dominant term.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are used as given (callers pass log distance and log size when
//!   that is the intended specification); nothing is transformed here.
//! - A missing signal, or a missing signal coefficient, is silently ignored.
//! - The dominant (nearest, largest) park is never smoothed away.
use crate::{
    accessibility::{
        coefficients::LogsumCoefficients,
        errors::{AccessError, AccessResult},
    },
    optimization::numerical_stability::transformations::log_sum_exp,
};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Validated, borrowed inputs of the logsum engine.
#[derive(Debug, Clone, Copy)]
pub struct LogsumInputs<'a> {
    distances: ArrayView2<'a, f64>,
    sizes: ArrayView1<'a, f64>,
    signal: Option<ArrayView1<'a, f64>>,
}

impl<'a> LogsumInputs<'a> {
    /// # Errors
    /// - `EmptyInput` when there are no tracts or no parks.
    /// - `DimensionMismatch` when `sizes` or `signal` length differs from
    ///   the number of distance columns.
    /// - `NonFiniteInput` for NaN/∞ in any input.
    pub fn new(
        distances: ArrayView2<'a, f64>, sizes: ArrayView1<'a, f64>,
        signal: Option<ArrayView1<'a, f64>>,
    ) -> AccessResult<Self> {
        let (n, p) = distances.dim();
        if n == 0 {
            return Err(AccessError::EmptyInput { what: "tracts" });
        }
        if p == 0 {
            return Err(AccessError::EmptyInput { what: "parks" });
        }
        if sizes.len() != p {
            return Err(AccessError::DimensionMismatch { what: "park sizes", expected: p, found: sizes.len() });
        }
        if let Some(t) = signal {
            if t.len() != p {
                return Err(AccessError::DimensionMismatch { what: "park signal", expected: p, found: t.len() });
            }
            check_finite(t.iter(), "park signal")?;
        }
        check_finite(distances.iter(), "distance")?;
        check_finite(sizes.iter(), "park size")?;
        Ok(LogsumInputs { distances, sizes, signal })
    }

    pub fn n_tracts(&self) -> usize {
        self.distances.nrows()
    }

    pub fn n_parks(&self) -> usize {
        self.distances.ncols()
    }

    pub fn has_signal(&self) -> bool {
        self.signal.is_some()
    }

    /// Per-tract logsum `A_i` for the given coefficients.
    pub fn accessibility(&self, betas: &LogsumCoefficients) -> Array1<f64> {
        let park_term: Array1<f64> = match (self.signal, betas.signal) {
            (Some(t), Some(bt)) => {
                self.sizes.iter().zip(t.iter()).map(|(s, t)| betas.size * s + bt * t).collect()
            }
            _ => self.sizes.mapv(|s| betas.size * s),
        };
        self.distances
            .rows()
            .into_iter()
            .map(|row| {
                log_sum_exp(row.iter().zip(park_term.iter()).map(|(d, a)| betas.distance * d + a))
            })
            .collect()
    }
}

/// accessibility — one-shot logsum over validated inputs.
///
/// Parameters
/// ----------
/// - `distances`: `ArrayView2<f64>` (`n × p`)
/// - `sizes`: `ArrayView1<f64>` (`p`)
/// - `signal`: `Option<ArrayView1<f64>>` (`p`)
/// - `betas`: `&LogsumCoefficients`
///
/// Returns
/// -------
/// `Array1<f64>` of length `n`.
pub fn accessibility<'a>(
    distances: ArrayView2<'a, f64>, sizes: ArrayView1<'a, f64>, signal: Option<ArrayView1<'a, f64>>,
    betas: &LogsumCoefficients,
) -> AccessResult<Array1<f64>> {
    Ok(LogsumInputs::new(distances, sizes, signal)?.accessibility(betas))
}

fn check_finite<'b, I>(values: I, what: &'static str) -> AccessResult<()>
where
    I: Iterator<Item = &'b f64>,
{
    for (index, &value) in values.enumerate() {
        if !value.is_finite() {
            return Err(AccessError::NonFiniteInput { what, index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The tract farthest from both parks has the lowest accessibility.
    //
    // Given
    // -----
    // - d = [[1,2],[2,1],[5,5]], s = [10, 1], β = (−1, 0.5).
    //
    // Expect
    // ------
    // - A_3 < A_1 and A_3 < A_2.
    fn farthest_tract_has_lowest_accessibility() {
        // Arrange
        let d = array![[1.0, 2.0], [2.0, 1.0], [5.0, 5.0]];
        let s = array![10.0, 1.0];
        let betas = LogsumCoefficients::new(-1.0, 0.5, None);

        // Act
        let a = accessibility(d.view(), s.view(), None, &betas).unwrap();

        // Assert
        assert!(a[2] < a[0] && a[2] < a[1], "{a:?}");
        let expected0 = ((-1.0f64 + 5.0).exp() + (-2.0f64 + 0.5).exp()).ln();
        assert!((a[0] - expected0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Monotonicity in distance (β_d < 0) and size (β_s > 0).
    //
    // Given
    // -----
    // - A 2×3 problem; perturb one distance up and one size up.
    //
    // Expect
    // ------
    // - The affected tract's score does not increase / does not decrease.
    fn logsum_is_monotone_in_distance_and_size() {
        // Arrange
        let d = array![[1.0, 3.0, 0.5], [2.0, 2.0, 4.0]];
        let s = array![1.0, 2.0, 0.3];
        let betas = LogsumCoefficients::new(-0.8, 0.6, None);
        let base = accessibility(d.view(), s.view(), None, &betas).unwrap();

        // Act
        let mut d_far = d.clone();
        d_far[[0, 2]] += 1.5;
        let farther = accessibility(d_far.view(), s.view(), None, &betas).unwrap();
        let mut s_big = s.clone();
        s_big[1] += 2.0;
        let bigger = accessibility(d.view(), s_big.view(), None, &betas).unwrap();

        // Assert
        assert!(farther[0] <= base[0]);
        assert_eq!(farther[1], base[1]);
        assert!(bigger[0] >= base[0] && bigger[1] >= base[1]);
    }

    #[test]
    // Purpose
    // -------
    // A utility of 1e6 must not overflow.
    //
    // Given
    // -----
    // - One distance of −1e6 with β_d = −1, others near zero.
    //
    // Expect
    // ------
    // - Finite score ≈ 1e6.
    fn huge_utilities_do_not_overflow() {
        let d = array![[-1e6, 0.1, 0.2]];
        let s = array![0.0, 0.0, 0.0];
        let a = accessibility(d.view(), s.view(), None, &LogsumCoefficients::new(-1.0, 0.0, None))
            .unwrap();
        assert!(a[0].is_finite());
        assert!((a[0] - 1e6).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The signal term applies only when both the vector and coefficient are
    // present; any other combination is silent.
    //
    // Given
    // -----
    // - A 1×2 problem with signal [1, 0] and β_t ∈ {None, Some(2)}.
    //
    // Expect
    // ------
    // - β_t = None matches the no-signal result; Some(2) raises the score.
    fn signal_is_applied_only_when_supplied() {
        let d = array![[1.0, 1.0]];
        let s = array![0.0, 0.0];
        let t = array![1.0, 0.0];
        let without = LogsumCoefficients::new(-1.0, 1.0, None);
        let with = LogsumCoefficients::new(-1.0, 1.0, Some(2.0));

        let a_none = accessibility(d.view(), s.view(), None, &with).unwrap();
        let a_silent = accessibility(d.view(), s.view(), Some(t.view()), &without).unwrap();
        let a_sig = accessibility(d.view(), s.view(), Some(t.view()), &with).unwrap();

        assert_eq!(a_none, a_silent);
        assert!(a_sig[0] > a_none[0]);
        assert!(accessibility(d.view(), array![1.0].view(), None, &with).is_err());
    }
}
