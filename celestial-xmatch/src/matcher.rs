//! Runs [`CoordinateIndex`] queries for every position of a source table.
//!
//! Two modes:
//!
//! - [`MatchMode::Nearest`]: exactly one [`MatchRecord`] per source row, the
//!   closest target regardless of distance. Separations are reported, never
//!   filtered; thresholding belongs to [`JoinBuilder`](crate::JoinBuilder).
//! - [`MatchMode::Radius`]: every target within `max_separation_arcsec`,
//!   zero or more records per source row.
//!
//! Source rows are independent and are queried in parallel against the
//! read-only index. Records come back ordered by source index, then by
//! separation, then by target index.

use std::time::Instant;

use celestial_core::SkyPoint;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{XMatchError, XMatchResult};
use crate::index::{validate_radius, CoordinateIndex, Neighbor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Nearest,
    Radius,
}

/// Pairing of a source row with a target row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchRecord {
    pub source_index: usize,
    pub target_index: usize,
    pub separation_arcsec: f64,
}

impl MatchRecord {
    fn from_neighbor(source_index: usize, neighbor: Neighbor) -> Self {
        Self {
            source_index,
            target_index: neighbor.index,
            separation_arcsec: neighbor.separation_arcsec,
        }
    }
}

/// Match every source position against `index`.
///
/// `max_separation_arcsec` is required in radius mode and ignored in nearest
/// mode.
///
/// # Errors
/// - [`XMatchError::EmptyInput`] if `source_positions` is empty
/// - [`XMatchError::InvalidParameter`] if radius mode has no radius, or a
///   radius that is not finite and positive
pub fn match_all(
    source_positions: &[SkyPoint],
    index: &CoordinateIndex,
    mode: MatchMode,
    max_separation_arcsec: Option<f64>,
) -> XMatchResult<Vec<MatchRecord>> {
    if source_positions.is_empty() {
        return Err(XMatchError::empty_input("match_all"));
    }
    if index.is_empty() {
        return Err(XMatchError::empty_input("match_all target index"));
    }
    let radius = resolve_radius(mode, max_separation_arcsec)?;

    let start = Instant::now();
    let per_row: Vec<Vec<MatchRecord>> = source_positions
        .par_iter()
        .enumerate()
        .map(|(i, point)| query_row(i, point, index, radius))
        .collect::<XMatchResult<_>>()?;
    let records: Vec<MatchRecord> = per_row.into_iter().flatten().collect();

    log::debug!(
        "{:?} match: {} sources against {} targets -> {} records in {:.2} ms",
        mode,
        source_positions.len(),
        index.len(),
        records.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(records)
}

/// Match a single position, labelling the records with `source_index`.
///
/// Lets a caller drive its own loop (and stop early) instead of
/// [`match_all`].
pub fn match_one(
    source_index: usize,
    point: &SkyPoint,
    index: &CoordinateIndex,
    mode: MatchMode,
    max_separation_arcsec: Option<f64>,
) -> XMatchResult<Vec<MatchRecord>> {
    let radius = resolve_radius(mode, max_separation_arcsec)?;
    query_row(source_index, point, index, radius)
}

fn resolve_radius(mode: MatchMode, max_separation_arcsec: Option<f64>) -> XMatchResult<Option<f64>> {
    match mode {
        MatchMode::Nearest => {
            if let Some(max) = max_separation_arcsec {
                log::debug!(
                    "nearest mode reports every separation; ignoring max_separation_arcsec={}",
                    max
                );
            }
            Ok(None)
        }
        MatchMode::Radius => {
            let max = max_separation_arcsec.ok_or_else(|| {
                XMatchError::invalid_parameter("radius mode requires max_separation_arcsec")
            })?;
            validate_radius(max)?;
            Ok(Some(max))
        }
    }
}

fn query_row(
    source_index: usize,
    point: &SkyPoint,
    index: &CoordinateIndex,
    radius: Option<f64>,
) -> XMatchResult<Vec<MatchRecord>> {
    match radius {
        None => {
            let nearest = index.query_nearest(point)?;
            Ok(vec![MatchRecord::from_neighbor(source_index, nearest)])
        }
        Some(max) => Ok(index
            .query_radius(point, max)?
            .into_iter()
            .map(|n| MatchRecord::from_neighbor(source_index, n))
            .collect()),
    }
}
