//! Proximity filtering and ordering of a dustbin snapshot around an observer.

use std::cmp::Ordering;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoError};
use crate::model::{AnnotatedDustbin, DustbinId, ProximityQuery};
use crate::severity::{clamp_fill_level, classify};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Why a record was left out of a ranking.
pub enum SkipReason {
    /// Location is non-finite or out of range.
    InvalidCoordinate,
    /// The source supplied no usable fill level.
    MissingFillLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A snapshot record that could not be ranked.
pub struct SkippedRecord {
    /// Identifier of the skipped record.
    pub id: DustbinId,
    /// Reason the record was skipped.
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Result of ranking a snapshot.
pub struct Ranking {
    /// In-radius dustbins, nearest first, ties ordered by id.
    pub entries: Vec<AnnotatedDustbin>,
    /// Records excluded because they were malformed, in snapshot order.
    pub skipped: Vec<SkippedRecord>,
    /// Ranked dustbins whose fill level had to be clamped into `[0, 100]`.
    pub clamped: Vec<DustbinId>,
}

impl Ranking {
    /// Whether no dustbin is in range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records left out as malformed.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Rank the dustbins of `query` by distance from its observer.
///
/// Every record is validated, malformed ones are reported in
/// [`Ranking::skipped`], and only records within the radius are kept. A
/// non-positive or NaN radius keeps nothing. An invalid observer ranks
/// nothing and blames no record.
#[must_use]
pub fn rank(query: &ProximityQuery<'_>) -> Ranking {
    let radius = query.radius_meters;
    let radius_usable = !radius.is_nan() && radius > 0.0;

    let mut ranking = Ranking::default();

    if let Err(err) = query.observer.validate() {
        warn!("Not ranking {} dustbins: observer {err}", query.dustbins.len());
        return ranking;
    }

    for record in query.dustbins {
        let distance_meters = match geo::distance(query.observer, record.location) {
            Ok(meters) => meters,
            Err(GeoError::InvalidCoordinate { lat, lng }) => {
                warn!(
                    "Skipping dustbin {}: invalid coordinate ({lat}, {lng})",
                    record.id
                );
                ranking.skipped.push(SkippedRecord {
                    id: record.id.clone(),
                    reason: SkipReason::InvalidCoordinate,
                });
                continue;
            }
        };

        let Some(fill_level) = record.fill_level else {
            warn!("Skipping dustbin {}: missing fill level", record.id);
            ranking.skipped.push(SkippedRecord {
                id: record.id.clone(),
                reason: SkipReason::MissingFillLevel,
            });
            continue;
        };

        if !radius_usable || distance_meters > radius {
            continue;
        }

        let fill_percent = clamp_fill_level(fill_level);
        if i32::from(fill_percent) != fill_level {
            debug!(
                "Clamped fill level of dustbin {} from {fill_level} to {fill_percent}",
                record.id
            );
            ranking.clamped.push(record.id.clone());
        }

        ranking.entries.push(AnnotatedDustbin {
            record: record.clone(),
            fill_percent,
            distance_meters,
            severity: classify(fill_level),
        });
    }

    ranking.entries.sort_by(by_distance_then_id);

    debug!(
        "Ranked {} of {} dustbins within {radius} m of {} ({} skipped)",
        ranking.entries.len(),
        query.dustbins.len(),
        query.observer,
        ranking.skipped.len()
    );

    ranking
}

/// Ordering used for ranked output: nearest first, then by id.
pub(crate) fn by_distance_then_id(left: &AnnotatedDustbin, right: &AnnotatedDustbin) -> Ordering {
    left.distance_meters
        .total_cmp(&right.distance_meters)
        .then_with(|| left.id().cmp(right.id()))
}
