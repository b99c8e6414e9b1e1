//! Spatial index over sky positions.
//!
//! Positions are embedded on the unit sphere ([`UnitVector`]) and bulk-loaded
//! into an R*-tree. Chord length between embedded points is a monotonic
//! function of angular separation, so the tree's Euclidean nearest neighbor is
//! the angular nearest neighbor, with no special cases at the RA = 0/360 seam
//! or at the poles. Reported separations are recomputed with the Vincenty
//! formula from the original positions.
//!
//! The index is immutable once built and can be shared across threads.
//!
//! [`UnitVector`]: celestial_core::UnitVector

use std::cmp::Ordering;
use std::time::Instant;

use celestial_core::constants::{ARCSEC_TO_RAD, MAX_SEPARATION_ARCSEC};
use celestial_core::math::chord_from_angle;
use celestial_core::SkyPoint;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::Serialize;

use crate::errors::{XMatchError, XMatchResult};

type IndexedPoint = GeomWithData<[f64; 3], usize>;

// Widens a chord distance so rounding in the embedding cannot exclude a point
// whose Vincenty separation is exactly on the boundary.
const CHORD_RELATIVE_PAD: f64 = 1e-6;
const CHORD_ABSOLUTE_PAD: f64 = 1e-12;

/// A position found by a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Index of the position in the slice the index was built from.
    pub index: usize,
    pub separation_arcsec: f64,
}

pub struct CoordinateIndex {
    tree: RTree<IndexedPoint>,
    positions: Vec<SkyPoint>,
}

impl CoordinateIndex {
    /// Build the index over `positions`. Indices reported by queries are
    /// offsets into this slice.
    ///
    /// # Errors
    /// [`XMatchError::EmptyInput`] if `positions` is empty.
    pub fn build(positions: &[SkyPoint]) -> XMatchResult<Self> {
        if positions.is_empty() {
            return Err(XMatchError::empty_input("CoordinateIndex::build"));
        }

        let start = Instant::now();
        let points: Vec<IndexedPoint> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(p.to_unit_vector().to_array(), i))
            .collect();
        let tree = RTree::bulk_load(points);

        log::debug!(
            "indexed {} positions in {:.2} ms",
            positions.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            tree,
            positions: positions.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false` for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<&SkyPoint> {
        self.positions.get(index)
    }

    pub fn positions(&self) -> &[SkyPoint] {
        &self.positions
    }

    /// Closest indexed position to `point`.
    ///
    /// Candidates are ranked by their reported separation, and positions at
    /// the same separation resolve to the lowest index, the same order
    /// [`CoordinateIndex::query_radius`] returns.
    pub fn query_nearest(&self, point: &SkyPoint) -> XMatchResult<Neighbor> {
        let query = point.to_unit_vector().to_array();
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_distance_2) = candidates
            .next()
            .ok_or_else(|| XMatchError::empty_input("CoordinateIndex::query_nearest"))?;

        // Chord distances that differ only by embedding rounding may still be
        // equal separations; every candidate in that band gets an exact check.
        let reach = padded_chord(best_distance_2.sqrt());
        let reach_2 = reach * reach;

        let mut best = self.neighbor(point, first.data);
        for (candidate, distance_2) in candidates {
            if distance_2 > reach_2 {
                break;
            }
            let neighbor = self.neighbor(point, candidate.data);
            if neighbor_order(&neighbor, &best).is_lt() {
                best = neighbor;
            }
        }

        Ok(best)
    }

    /// All indexed positions within `max_separation_arcsec` of `point`
    /// (inclusive), ascending by separation and then by index.
    ///
    /// # Errors
    /// [`XMatchError::InvalidParameter`] unless the radius is finite and positive.
    pub fn query_radius(
        &self,
        point: &SkyPoint,
        max_separation_arcsec: f64,
    ) -> XMatchResult<Vec<Neighbor>> {
        validate_radius(max_separation_arcsec)?;

        let mut found: Vec<Neighbor> = if max_separation_arcsec >= MAX_SEPARATION_ARCSEC {
            (0..self.positions.len())
                .map(|i| self.neighbor(point, i))
                .collect()
        } else {
            let padded = padded_chord(chord_from_angle(max_separation_arcsec * ARCSEC_TO_RAD));
            let query = point.to_unit_vector().to_array();
            self.tree
                .locate_within_distance(query, padded * padded)
                .map(|candidate| self.neighbor(point, candidate.data))
                .filter(|n| n.separation_arcsec <= max_separation_arcsec)
                .collect()
        };

        found.sort_by(neighbor_order);
        Ok(found)
    }

    fn neighbor(&self, point: &SkyPoint, index: usize) -> Neighbor {
        Neighbor {
            index,
            separation_arcsec: point.separation_arcsec(&self.positions[index]),
        }
    }
}

fn padded_chord(chord: f64) -> f64 {
    chord * (1.0 + CHORD_RELATIVE_PAD) + CHORD_ABSOLUTE_PAD
}

/// Ascending separation, then ascending index.
fn neighbor_order(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.separation_arcsec
        .total_cmp(&b.separation_arcsec)
        .then(a.index.cmp(&b.index))
}

pub(crate) fn validate_radius(max_separation_arcsec: f64) -> XMatchResult<()> {
    if max_separation_arcsec.is_finite() && max_separation_arcsec > 0.0 {
        return Ok(());
    }
    Err(XMatchError::invalid_parameter(format!(
        "max_separation_arcsec must be finite and > 0, got {}",
        max_separation_arcsec
    )))
}
