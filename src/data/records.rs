//! data::records — validated tract and park tables.
//!
//! Purpose
//! -------
//! Hold the cleaned, reprojected, complete-case inputs of one analysis run:
//! census tracts with covariates and outcomes, and parks with size and
//! social-signal attributes. Construction validates every invariant once so
//! the numerical layers can assume well-formed inputs.
//!
//! Key behaviors
//! -------------
//! - [`TractTable::new`] checks unique ids, header/row lengths, and finite
//!   covariates, outcomes, and coordinates.
//! - [`ParkTable::new`] checks unique ids, finite coordinates, area above a
//!   minimum threshold, and all-or-nothing signal counts.
//! - Column extraction into `ndarray` containers for the regression and
//!   accessibility layers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Coordinates are planar and distance-preserving; no reprojection here.
//! - Tables are immutable after construction; joins return new tables.
use crate::data::errors::{DataError, DataResult};
use geo::{MultiPolygon, Point};
use ndarray::{Array1, Array2};
use std::collections::HashSet;

/// One census tract.
#[derive(Debug, Clone, PartialEq)]
pub struct Tract {
    pub id: String,
    /// Geometric centroid.
    pub centroid: Point<f64>,
    /// Population-weighted centroid; filled by the join in `data::join`.
    pub population_centroid: Option<Point<f64>>,
    /// Polygon boundary; required only for contact adjacency.
    pub geometry: Option<MultiPolygon<f64>>,
    pub covariates: Vec<f64>,
    pub outcomes: Vec<f64>,
}

/// Validated collection of tracts sharing one covariate/outcome header.
#[derive(Debug, Clone, PartialEq)]
pub struct TractTable {
    covariate_names: Vec<String>,
    outcome_names: Vec<String>,
    tracts: Vec<Tract>,
}

impl TractTable {
    /// Build a table, validating every row against the header.
    ///
    /// # Errors
    /// - `EmptyTable`, `DuplicateId`, `DuplicateColumn`,
    ///   `ColumnCountMismatch`, `NonFiniteValue`.
    pub fn new(
        covariate_names: Vec<String>, outcome_names: Vec<String>, tracts: Vec<Tract>,
    ) -> DataResult<Self> {
        if tracts.is_empty() {
            return Err(DataError::EmptyTable { table: "tract" });
        }
        check_unique_names(covariate_names.iter().chain(outcome_names.iter()))?;
        let mut seen = HashSet::with_capacity(tracts.len());
        for tract in &tracts {
            if !seen.insert(tract.id.as_str()) {
                return Err(DataError::DuplicateId { table: "tract", id: tract.id.clone() });
            }
            check_row(&tract.id, &covariate_names, &tract.covariates)?;
            check_row(&tract.id, &outcome_names, &tract.outcomes)?;
            check_point(&tract.id, "centroid", &tract.centroid)?;
            if let Some(p) = &tract.population_centroid {
                check_point(&tract.id, "population_centroid", p)?;
            }
        }
        Ok(Self { covariate_names, outcome_names, tracts })
    }

    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    pub fn tracts(&self) -> &[Tract] {
        &self.tracts
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    pub fn outcome_names(&self) -> &[String] {
        &self.outcome_names
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tracts.iter().map(|t| t.id.as_str()).collect()
    }

    /// `n × k` covariate matrix in header order.
    pub fn covariate_matrix(&self) -> Array2<f64> {
        let k = self.covariate_names.len();
        Array2::from_shape_fn((self.tracts.len(), k), |(i, j)| self.tracts[i].covariates[j])
    }

    /// Outcome column by name.
    ///
    /// # Errors
    /// `UnknownColumn` if `name` is not an outcome.
    pub fn outcome(&self, name: &str) -> DataResult<Array1<f64>> {
        let j = self
            .outcome_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
        Ok(self.tracts.iter().map(|t| t.outcomes[j]).collect())
    }

    pub fn centroids(&self) -> Vec<Point<f64>> {
        self.tracts.iter().map(|t| t.centroid).collect()
    }

    /// Population-weighted centroids, requiring the join to have run.
    ///
    /// # Errors
    /// `MissingPopulationCentroid` for the first tract without one.
    pub fn population_centroids(&self) -> DataResult<Vec<Point<f64>>> {
        self.tracts
            .iter()
            .map(|t| {
                t.population_centroid
                    .ok_or_else(|| DataError::MissingPopulationCentroid { id: t.id.clone() })
            })
            .collect()
    }

    /// Polygon geometries, requiring every tract to carry one.
    ///
    /// # Errors
    /// `MissingGeometry` for the first tract without a polygon.
    pub fn geometries(&self) -> DataResult<Vec<&MultiPolygon<f64>>> {
        self.tracts
            .iter()
            .map(|t| t.geometry.as_ref().ok_or_else(|| DataError::MissingGeometry { id: t.id.clone() }))
            .collect()
    }

    /// Same header, new rows. Used by joins.
    pub(crate) fn with_tracts(&self, tracts: Vec<Tract>) -> DataResult<Self> {
        Self::new(self.covariate_names.clone(), self.outcome_names.clone(), tracts)
    }
}

/// One park.
#[derive(Debug, Clone, PartialEq)]
pub struct Park {
    pub id: String,
    pub location: Point<f64>,
    pub area_acres: f64,
    /// Raw social-signal count (e.g. check-ins); `None` when not collected.
    pub signal_count: Option<f64>,
}

/// Validated collection of parks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkTable {
    parks: Vec<Park>,
    min_area: f64,
}

impl ParkTable {
    /// Build a table; every park must exceed `min_area` acres.
    ///
    /// # Errors
    /// - `EmptyTable`, `DuplicateId`, `NonFiniteValue`.
    /// - `ParkBelowMinimumArea` for slivers that should have been removed
    ///   upstream.
    /// - `PartialSignal` when only some parks carry a signal count.
    pub fn new(parks: Vec<Park>, min_area: f64) -> DataResult<Self> {
        if parks.is_empty() {
            return Err(DataError::EmptyTable { table: "park" });
        }
        let has_signal = parks[0].signal_count.is_some();
        let mut seen = HashSet::with_capacity(parks.len());
        for park in &parks {
            if !seen.insert(park.id.as_str()) {
                return Err(DataError::DuplicateId { table: "park", id: park.id.clone() });
            }
            check_point(&park.id, "location", &park.location)?;
            check_value(&park.id, "area_acres", park.area_acres)?;
            if park.area_acres <= min_area {
                return Err(DataError::ParkBelowMinimumArea {
                    id: park.id.clone(),
                    area: park.area_acres,
                    minimum: min_area,
                });
            }
            match park.signal_count {
                Some(s) if has_signal => check_value(&park.id, "signal_count", s)?,
                None if !has_signal => {}
                _ => return Err(DataError::PartialSignal { id: park.id.clone() }),
            }
        }
        Ok(Self { parks, min_area })
    }

    pub fn len(&self) -> usize {
        self.parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parks.is_empty()
    }

    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    pub fn locations(&self) -> Vec<Point<f64>> {
        self.parks.iter().map(|p| p.location).collect()
    }

    /// Raw areas in acres.
    pub fn areas(&self) -> Array1<f64> {
        self.parks.iter().map(|p| p.area_acres).collect()
    }

    /// Raw signal counts, or `None` when the table carries none.
    pub fn signal_counts(&self) -> Option<Array1<f64>> {
        self.parks.iter().map(|p| p.signal_count).collect::<Option<Vec<f64>>>().map(Array1::from)
    }
}

// ---- Helper methods ----

fn check_unique_names<'a>(names: impl Iterator<Item = &'a String>) -> DataResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DataError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

fn check_row(id: &str, header: &[String], values: &[f64]) -> DataResult<()> {
    if values.len() != header.len() {
        return Err(DataError::ColumnCountMismatch {
            id: id.to_string(),
            expected: header.len(),
            found: values.len(),
        });
    }
    for (name, &value) in header.iter().zip(values) {
        check_value(id, name, value)?;
    }
    Ok(())
}

fn check_point(id: &str, column: &str, p: &Point<f64>) -> DataResult<()> {
    check_value(id, column, p.x())?;
    check_value(id, column, p.y())
}

fn check_value(id: &str, column: &str, value: f64) -> DataResult<()> {
    if !value.is_finite() {
        return Err(DataError::NonFiniteValue {
            id: id.to_string(),
            column: column.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tract(id: &str, x: f64, covs: Vec<f64>) -> Tract {
        Tract {
            id: id.to_string(),
            centroid: Point::new(x, 0.0),
            population_centroid: None,
            geometry: None,
            covariates: covs,
            outcomes: vec![0.3],
        }
    }

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify the tract table extracts matrices and columns in header order.
    //
    // Given
    // -----
    // - Two tracts with covariates (density, income) and one outcome.
    //
    // Expect
    // ------
    // - 2×2 covariate matrix in row order; outcome column by name.
    fn tract_table_extracts_columns_in_header_order() {
        // Arrange
        let table = TractTable::new(
            names(&["density", "income"]),
            names(&["obesity"]),
            vec![tract("a", 0.0, vec![1.0, 2.0]), tract("b", 1.0, vec![3.0, 4.0])],
        )
        .unwrap();

        // Act
        let x = table.covariate_matrix();
        let y = table.outcome("obesity").unwrap();

        // Assert
        assert_eq!(x, ndarray::array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(y.len(), 2);
        assert!(matches!(table.outcome("bmi"), Err(DataError::UnknownColumn(_))));
        assert!(matches!(
            table.population_centroids(),
            Err(DataError::MissingPopulationCentroid { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Ensure malformed tract rows are rejected.
    //
    // Given
    // -----
    // - Duplicate ids; a short covariate row; a NaN covariate.
    //
    // Expect
    // ------
    // - DuplicateId, ColumnCountMismatch, NonFiniteValue respectively.
    fn tract_table_rejects_malformed_rows() {
        let h = names(&["density"]);
        let o = names(&["obesity"]);
        assert!(matches!(
            TractTable::new(h.clone(), o.clone(), vec![tract("a", 0.0, vec![1.0]), tract("a", 1.0, vec![2.0])]),
            Err(DataError::DuplicateId { .. })
        ));
        assert!(matches!(
            TractTable::new(h.clone(), o.clone(), vec![tract("a", 0.0, vec![])]),
            Err(DataError::ColumnCountMismatch { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            TractTable::new(h, o, vec![tract("a", 0.0, vec![f64::NAN])]),
            Err(DataError::NonFiniteValue { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check the park invariants: minimum area and all-or-nothing signals.
    //
    // Given
    // -----
    // - A sliver park at the threshold; parks with partial signal counts.
    //
    // Expect
    // ------
    // - ParkBelowMinimumArea and PartialSignal; a valid table exposes signals.
    fn park_table_enforces_area_and_signal_invariants() {
        let park = |id: &str, area: f64, signal: Option<f64>| Park {
            id: id.to_string(),
            location: Point::new(0.0, 0.0),
            area_acres: area,
            signal_count: signal,
        };
        assert!(matches!(
            ParkTable::new(vec![park("p", 0.5, None)], 0.5),
            Err(DataError::ParkBelowMinimumArea { .. })
        ));
        assert!(matches!(
            ParkTable::new(vec![park("p", 2.0, Some(3.0)), park("q", 2.0, None)], 0.5),
            Err(DataError::PartialSignal { .. })
        ));
        let ok = ParkTable::new(vec![park("p", 2.0, Some(3.0)), park("q", 4.0, Some(0.0))], 0.5)
            .unwrap();
        assert_eq!(ok.signal_counts().unwrap().to_vec(), vec![3.0, 0.0]);
        assert_eq!(ok.areas().to_vec(), vec![2.0, 4.0]);
    }
}
