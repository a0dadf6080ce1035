//! spatial::adjacency — raw (unstandardized) neighbor structures.
//!
//! Purpose
//! -------
//! Decide which tracts are neighbors and with what raw weight, before row
//! standardization. Two rules are supported:
//!
//! - **Queen contiguity** on tract polygons: any shared boundary point or
//!   edge makes two tracts neighbors with weight 1.
//! - **Distance band** on population-weighted centroids: every pair within
//!   `radius` is connected with inverse-distance weight `1 / d^power`.
//!
//! Key behaviors
//! -------------
//! - Candidate pairs come from an R-tree over bounding boxes (queen) or
//!   points (band); exact tests run only on candidates.
//! - [`Adjacency::from_entries`] accepts user-supplied symmetric weights and
//!   applies the same validation as the built-in rules.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output is symmetric with an empty diagonal and strictly positive
//!   finite weights; rows are sorted by neighbor index.
//! - A tract with no neighbors keeps an empty row (isolate).
//! - Coordinates are planar; distances are Euclidean.
use crate::spatial::errors::{SpatialError, SpatialResult};
use geo::{BoundingRect, Distance, Euclidean, MultiPolygon, Point, Rect, Relate};
use rstar::{primitives::GeomWithData, RTree, RTreeObject, AABB};
use serde::Deserialize;

/// Default exponent of inverse-distance band weights.
pub const DEFAULT_BAND_POWER: f64 = 1.0;

/// How neighbors are defined.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjacencyRule {
    /// Shared boundary (edge or vertex) between tract polygons.
    Queen,
    /// Population centroids within `radius`, weighted `1 / d^power`.
    DistanceBand {
        radius: f64,
        #[serde(default = "default_band_power")]
        power: f64,
    },
}

fn default_band_power() -> f64 {
    DEFAULT_BAND_POWER
}

impl AdjacencyRule {
    pub fn distance_band(radius: f64) -> SpatialResult<Self> {
        Self::distance_band_with_power(radius, DEFAULT_BAND_POWER)
    }

    pub fn distance_band_with_power(radius: f64, power: f64) -> SpatialResult<Self> {
        validate_band(radius, power)?;
        Ok(AdjacencyRule::DistanceBand { radius, power })
    }
}

/// Symmetric raw weights in sparse row form.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    rows: Vec<Vec<(usize, f64)>>,
}

impl Adjacency {
    /// Build from explicit `(i, j, w)` entries. Each unordered pair must be
    /// listed in both directions with equal weight.
    ///
    /// # Errors
    /// `EmptyInput`, `IndexOutOfRange`, `SelfNeighbor`, `DuplicateNeighbor`,
    /// `InvalidWeight`, `AsymmetricWeights`.
    pub fn from_entries(n: usize, entries: &[(usize, usize, f64)]) -> SpatialResult<Self> {
        if n == 0 {
            return Err(SpatialError::EmptyInput);
        }
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for &(i, j, w) in entries {
            for index in [i, j] {
                if index >= n {
                    return Err(SpatialError::IndexOutOfRange { index, n });
                }
            }
            if i == j {
                return Err(SpatialError::SelfNeighbor { index: i });
            }
            if !w.is_finite() || w <= 0.0 {
                return Err(SpatialError::InvalidWeight { i, j, value: w });
            }
            rows[i].push((j, w));
        }
        for (i, row) in rows.iter_mut().enumerate() {
            row.sort_by_key(|&(j, _)| j);
            if let Some(pair) = row.windows(2).find(|p| p[0].0 == p[1].0) {
                return Err(SpatialError::DuplicateNeighbor { i, j: pair[0].0 });
            }
        }
        let adjacency = Adjacency { rows };
        adjacency.check_symmetry()?;
        Ok(adjacency)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Neighbors of `i` with raw weights, sorted by index.
    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[Vec<(usize, f64)>] {
        &self.rows
    }

    /// Raw weight of pair `(i, j)`, zero when not neighbors.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.rows[i]
            .binary_search_by_key(&j, |&(k, _)| k)
            .map(|pos| self.rows[i][pos].1)
            .unwrap_or(0.0)
    }

    fn check_symmetry(&self) -> SpatialResult<()> {
        for (i, row) in self.rows.iter().enumerate() {
            for &(j, w) in row {
                let back = self.weight(j, i);
                if (w - back).abs() > 1e-12 * w.abs().max(back.abs()).max(1.0) {
                    return Err(SpatialError::AsymmetricWeights { i, j });
                }
            }
        }
        Ok(())
    }

    fn from_pairs(n: usize, pairs: Vec<(usize, usize, f64)>) -> Self {
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for (i, j, w) in pairs {
            rows[i].push((j, w));
            rows[j].push((i, w));
        }
        for row in rows.iter_mut() {
            row.sort_by_key(|&(j, _)| j);
        }
        Adjacency { rows }
    }
}

// ---- Queen contiguity ----

#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// queen_contiguity — neighbors sharing at least one boundary point.
///
/// Parameters
/// ----------
/// - `geometries`: `&[&MultiPolygon<f64>]`
///   One polygon per tract, in table order.
///
/// Returns
/// -------
/// Binary symmetric [`Adjacency`].
///
/// Errors
/// ------
/// - `EmptyInput` for no geometries.
/// - `EmptyGeometry` for a polygon without coordinates.
///
/// Notes
/// -----
/// - Overlapping polygons also count as neighbors; inputs are assumed to
///   form a planar partition.
pub fn queen_contiguity(geometries: &[&MultiPolygon<f64>]) -> SpatialResult<Adjacency> {
    if geometries.is_empty() {
        return Err(SpatialError::EmptyInput);
    }
    let boxes = geometries
        .iter()
        .enumerate()
        .map(|(idx, poly)| {
            poly.bounding_rect()
                .map(|bbox| BoundingBox { idx, bbox })
                .ok_or(SpatialError::EmptyGeometry { index: idx })
        })
        .collect::<SpatialResult<Vec<_>>>()?;
    let rects: Vec<Rect<f64>> = boxes.iter().map(|b| b.bbox).collect();
    let rtree = RTree::bulk_load(boxes);

    let mut pairs = Vec::new();
    for (i, rect) in rects.iter().enumerate() {
        let search = AABB::from_corners(rect.min().into(), rect.max().into());
        for cand in rtree.locate_in_envelope_intersecting(&search) {
            let j = cand.idx;
            if j <= i {
                continue;
            }
            if geometries[i].relate(geometries[j]).is_intersects() {
                pairs.push((i, j, 1.0));
            }
        }
    }
    Ok(Adjacency::from_pairs(geometries.len(), pairs))
}

// ---- Distance band ----

/// distance_band — inverse-distance weights within a radius.
///
/// Parameters
/// ----------
/// - `points`: `&[Point<f64>]`
///   Population-weighted centroids in table order.
/// - `radius`: `f64`
///   Inclusive cutoff distance, finite and `> 0`.
/// - `power`: `f64`
///   Exponent `p` in `w_ij = 1 / d_ij^p`; `0` gives binary weights.
///
/// Errors
/// ------
/// - `EmptyInput`, `InvalidRadius`, `InvalidPower`.
/// - `CoincidentPoints` when two units within the band share a location.
/// - `InvalidWeight` when `d_ij^-p` overflows for nearly coincident units.
pub fn distance_band(points: &[Point<f64>], radius: f64, power: f64) -> SpatialResult<Adjacency> {
    if points.is_empty() {
        return Err(SpatialError::EmptyInput);
    }
    validate_band(radius, power)?;
    let rtree = RTree::bulk_load(
        points.iter().enumerate().map(|(i, p)| GeomWithData::new([p.x(), p.y()], i)).collect(),
    );

    let mut pairs = Vec::new();
    for (i, p) in points.iter().enumerate() {
        for entry in rtree.locate_within_distance([p.x(), p.y()], radius * radius) {
            let j = entry.data;
            if j <= i {
                continue;
            }
            let d = Euclidean.distance(*p, points[j]);
            if d <= 0.0 {
                return Err(SpatialError::CoincidentPoints { i, j });
            }
            let w = d.powf(-power);
            if !w.is_finite() {
                return Err(SpatialError::InvalidWeight { i, j, value: w });
            }
            pairs.push((i, j, w));
        }
    }
    Ok(Adjacency::from_pairs(points.len(), pairs))
}

fn validate_band(radius: f64, power: f64) -> SpatialResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SpatialError::InvalidRadius(radius));
    }
    if !power.is_finite() || power < 0.0 {
        return Err(SpatialError::InvalidPower(power));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn unit_square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
            (x: x, y: y),
        ]])
    }

    #[test]
    // Purpose
    // -------
    // Verify queen contiguity links edge and corner neighbors and leaves a
    // detached polygon isolated.
    //
    // Given
    // -----
    // - Squares at (0,0), (1,0), (1,1) and a far square at (5,5).
    //
    // Expect
    // ------
    // - (0,1) edge, (1,2) edge, (0,2) corner are neighbors; tract 3 has none.
    fn queen_links_edges_and_corners_and_isolates_detached_polygons() {
        // Arrange
        let polys = [unit_square(0.0, 0.0), unit_square(1.0, 0.0), unit_square(1.0, 1.0), unit_square(5.0, 5.0)];
        let refs: Vec<&MultiPolygon<f64>> = polys.iter().collect();

        // Act
        let adj = queen_contiguity(&refs).unwrap();

        // Assert
        assert_eq!(adj.weight(0, 1), 1.0);
        assert_eq!(adj.weight(1, 2), 1.0);
        assert_eq!(adj.weight(0, 2), 1.0);
        assert_eq!(adj.weight(2, 0), 1.0);
        assert!(adj.row(3).is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Check inverse-distance weights and the inclusive radius cutoff.
    //
    // Given
    // -----
    // - Points at x = 0, 2, 5 on a line; radius 3; power 1.
    //
    // Expect
    // ------
    // - w01 = 1/2, w12 = 1/3, pair (0,2) excluded at distance 5.
    fn distance_band_uses_inverse_distance_within_radius() {
        // Arrange
        let pts = [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(5.0, 0.0)];

        // Act
        let adj = distance_band(&pts, 3.0, 1.0).unwrap();

        // Assert
        assert!((adj.weight(0, 1) - 0.5).abs() < 1e-12);
        assert!((adj.weight(2, 1) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(adj.weight(0, 2), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure explicit entries are validated for symmetry and self loops.
    //
    // Given
    // -----
    // - A one-directional entry and a self loop.
    //
    // Expect
    // ------
    // - `AsymmetricWeights` and `SelfNeighbor` respectively.
    fn from_entries_rejects_asymmetric_and_self_loops() {
        assert_eq!(
            Adjacency::from_entries(2, &[(0, 1, 1.0)]),
            Err(SpatialError::AsymmetricWeights { i: 0, j: 1 })
        );
        assert_eq!(
            Adjacency::from_entries(2, &[(1, 1, 1.0)]),
            Err(SpatialError::SelfNeighbor { index: 1 })
        );
        assert!(Adjacency::from_entries(3, &[(0, 1, 2.0), (1, 0, 2.0)]).is_ok());
    }

    #[test]
    fn distance_band_rejects_coincident_points_and_bad_radius() {
        let pts = [Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
        assert_eq!(distance_band(&pts, 1.0, 1.0), Err(SpatialError::CoincidentPoints { i: 0, j: 1 }));
        assert_eq!(distance_band(&pts, 0.0, 1.0), Err(SpatialError::InvalidRadius(0.0)));
    }

    #[test]
    // Purpose
    // -------
    // Nearly coincident centroids must not produce an infinite weight.
    //
    // Given
    // -----
    // - Two points 1e-150 apart, radius 1, power 3 (so d^-p overflows).
    //
    // Expect
    // ------
    // - `InvalidWeight` for the pair (0, 1) with an infinite value.
    fn distance_band_rejects_overflowing_weights() {
        let pts = [Point::new(0.0, 0.0), Point::new(1e-150, 0.0)];
        match distance_band(&pts, 1.0, 3.0) {
            Err(SpatialError::InvalidWeight { i: 0, j: 1, value }) => assert!(value.is_infinite()),
            other => panic!("expected InvalidWeight, got {other:?}"),
        }
    }
}
