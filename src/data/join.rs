//! data::join — attach population-weighted centroids to tracts.
//!
//! The lookup is keyed by the tract's geographic id. A tract without an
//! entry is a fatal input error; extra lookup rows are ignored.
use crate::data::{
    errors::{DataError, DataResult},
    records::TractTable,
};
use geo::Point;
use std::collections::HashMap;

/// Return a new table whose tracts carry `population_centroid`.
///
/// # Errors
/// - `MissingJoinKey` for the first tract id absent from `lookup`.
/// - `NonFiniteValue` if a joined coordinate is not finite.
pub fn join_population_centroids(
    tracts: &TractTable, lookup: &HashMap<String, Point<f64>>,
) -> DataResult<TractTable> {
    let joined = tracts
        .tracts()
        .iter()
        .map(|t| {
            let p = lookup.get(&t.id).ok_or_else(|| DataError::MissingJoinKey { id: t.id.clone() })?;
            let mut tract = t.clone();
            tract.population_centroid = Some(*p);
            Ok(tract)
        })
        .collect::<DataResult<Vec<_>>>()?;
    tracts.with_tracts(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::Tract;

    fn table() -> TractTable {
        let tract = |id: &str| Tract {
            id: id.to_string(),
            centroid: Point::new(0.0, 0.0),
            population_centroid: None,
            geometry: None,
            covariates: vec![],
            outcomes: vec![],
        };
        TractTable::new(vec![], vec![], vec![tract("06001"), tract("06003")]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the join fills centroids without touching the input table.
    //
    // Given
    // -----
    // - A lookup covering both tracts plus one extra key.
    //
    // Expect
    // ------
    // - New table has both centroids; original still has none.
    fn join_fills_centroids_and_leaves_input_untouched() {
        // Arrange
        let base = table();
        let lookup: HashMap<String, Point<f64>> = [
            ("06001".to_string(), Point::new(1.0, 2.0)),
            ("06003".to_string(), Point::new(3.0, 4.0)),
            ("99999".to_string(), Point::new(0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        // Act
        let joined = join_population_centroids(&base, &lookup).unwrap();

        // Assert
        let pts = joined.population_centroids().unwrap();
        assert_eq!(pts, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert!(base.tracts()[0].population_centroid.is_none());
    }

    #[test]
    // Purpose
    // -------
    // A missing join key is fatal.
    //
    // Given
    // -----
    // - A lookup lacking "06003".
    //
    // Expect
    // ------
    // - `MissingJoinKey { id: "06003" }`.
    fn join_fails_on_missing_key() {
        let lookup: HashMap<String, Point<f64>> =
            [("06001".to_string(), Point::new(1.0, 2.0))].into_iter().collect();
        assert_eq!(
            join_population_centroids(&table(), &lookup),
            Err(DataError::MissingJoinKey { id: "06003".to_string() })
        );
    }
}
