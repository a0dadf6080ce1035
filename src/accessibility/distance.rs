//! accessibility::distance — floored planar tract-to-park distances.
use crate::accessibility::errors::{AccessError, AccessResult};
use geo::{Distance, Euclidean, Point};
use ndarray::Array2;

/// Default minimum distance between any tract and park.
pub const DEFAULT_DISTANCE_FLOOR: f64 = 0.1;

/// `n × p` Euclidean distances, origins by destinations, floored.
///
/// Entries below the floor are clamped up to exactly the floor so no pair
/// is modeled as zero distance.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
    floor: f64,
}

impl DistanceMatrix {
    pub fn compute(origins: &[Point<f64>], destinations: &[Point<f64>]) -> AccessResult<Self> {
        Self::compute_with_floor(origins, destinations, DEFAULT_DISTANCE_FLOOR)
    }

    /// # Errors
    /// `EmptyInput`, `InvalidFloor`, `NonFiniteInput` for NaN/∞ coordinates.
    pub fn compute_with_floor(
        origins: &[Point<f64>], destinations: &[Point<f64>], floor: f64,
    ) -> AccessResult<Self> {
        if origins.is_empty() {
            return Err(AccessError::EmptyInput { what: "origins" });
        }
        if destinations.is_empty() {
            return Err(AccessError::EmptyInput { what: "destinations" });
        }
        if !floor.is_finite() || floor <= 0.0 {
            return Err(AccessError::InvalidFloor(floor));
        }
        check_points(origins, "origin coordinate")?;
        check_points(destinations, "destination coordinate")?;

        let values = Array2::from_shape_fn((origins.len(), destinations.len()), |(i, j)| {
            Euclidean.distance(origins[i], destinations[j]).max(floor)
        });
        Ok(DistanceMatrix { values, floor })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn n_origins(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_destinations(&self) -> usize {
        self.values.ncols()
    }

    /// Natural log of every entry; finite because entries are ≥ floor > 0.
    pub fn ln(&self) -> Array2<f64> {
        self.values.mapv(f64::ln)
    }
}

fn check_points(points: &[Point<f64>], what: &'static str) -> AccessResult<()> {
    for (index, p) in points.iter().enumerate() {
        for value in [p.x(), p.y()] {
            if !value.is_finite() {
                return Err(AccessError::NonFiniteInput { what, index, value });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that sub-floor distances equal the floor exactly and others are
    // plain Euclidean.
    //
    // Given
    // -----
    // - Origin (0,0); parks at (0,0), (0.05,0), (3,4).
    //
    // Expect
    // ------
    // - Row = [0.1, 0.1, 5.0] with exact equality on the floored entries.
    fn entries_below_floor_equal_floor_exactly() {
        // Arrange
        let origins = [Point::new(0.0, 0.0)];
        let parks = [Point::new(0.0, 0.0), Point::new(0.05, 0.0), Point::new(3.0, 4.0)];

        // Act
        let d = DistanceMatrix::compute(&origins, &parks).unwrap();

        // Assert
        assert_eq!(d.values()[[0, 0]], DEFAULT_DISTANCE_FLOOR);
        assert_eq!(d.values()[[0, 1]], DEFAULT_DISTANCE_FLOOR);
        assert!((d.values()[[0, 2]] - 5.0).abs() < 1e-12);
        assert_eq!((d.n_origins(), d.n_destinations()), (1, 3));
    }

    #[test]
    fn rejects_bad_floor_and_empty_sides() {
        let p = [Point::new(0.0, 0.0)];
        assert_eq!(DistanceMatrix::compute_with_floor(&p, &p, 0.0), Err(AccessError::InvalidFloor(0.0)));
        assert!(DistanceMatrix::compute(&[], &p).is_err());
        assert!(DistanceMatrix::compute(&[Point::new(f64::NAN, 0.0)], &p).is_err());
    }
}
