//! Domain data structures for dustbins, observers, and snapshot sources.

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoError;
use crate::severity::Severity;

/// Built-in snapshot sources shipped with the application.
pub enum Sources {
    /// The municipal REST backend.
    Municipal,
    /// Offline seed dataset.
    Seed,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier for a source of dustbin snapshots.
pub struct SourceId(pub String);

impl fmt::Display for Sources {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Sources::Municipal => "municipal",
            Sources::Seed => "seed",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Sources> for SourceId {
    fn from(source: Sources) -> Self {
        SourceId(source.to_string())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a snapshot source and its human-friendly name.
pub struct SourceMeta {
    /// Unique identifier.
    pub id: SourceId,
    /// Display name.
    pub name: String,
}

/// A latitude/longitude pair in signed degrees.
///
/// Construction through the public fields is unchecked so that untrusted
/// provider data can be carried as-is; use [`Coordinate::new`] or
/// [`Coordinate::validate`] to enforce the valid domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, valid within [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, valid within [-180, 180].
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] when either component is outside its domain.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both components are finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] when either component is outside its domain.
    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Stable identifier of a physical dustbin, unique within a snapshot.
///
/// Ids order naturally: numeric ids compare as numbers and sort before
/// textual ones, so `"9"` comes before `"10"`.
pub struct DustbinId(pub String);

impl DustbinId {
    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<&str> for DustbinId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for DustbinId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for DustbinId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Ord for DustbinId {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_kind = match (self.numeric(), other.numeric()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        // "07" and "7" are distinct ids, so fall back to the raw text
        by_kind.then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DustbinId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DustbinId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One collection bin as delivered by a snapshot source.
pub struct DustbinRecord {
    /// Identifier of the bin.
    pub id: DustbinId,
    /// Where the bin stands. Not validated by the source.
    pub location: Coordinate,
    /// Fill percentage; `None` when the source did not supply a usable value.
    pub fill_level: Option<i32>,
    /// Last time the bin reported, for display only.
    pub last_updated: Option<DateTime<Utc>>,
}

impl DustbinRecord {
    /// Convenience constructor for a record without a timestamp.
    #[must_use]
    pub fn new<I: Into<DustbinId>>(id: I, location: Coordinate, fill_level: i32) -> Self {
        Self {
            id: id.into(),
            location,
            fill_level: Some(fill_level),
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A record enriched with values derived for one observer.
pub struct AnnotatedDustbin {
    /// The untouched source record.
    pub record: DustbinRecord,
    /// Fill level after clamping into [0, 100].
    pub fill_percent: u8,
    /// Great-circle distance from the observer, in meters.
    pub distance_meters: f64,
    /// Severity derived from the fill level.
    pub severity: Severity,
}

impl AnnotatedDustbin {
    /// Identifier of the underlying record.
    #[must_use]
    pub fn id(&self) -> &DustbinId {
        &self.record.id
    }
}

#[derive(Debug, Clone, Copy)]
/// Input envelope for a single ranking call.
pub struct ProximityQuery<'snapshot> {
    /// Point distances are measured from.
    pub observer: Coordinate,
    /// Inclusive search radius in meters.
    pub radius_meters: f64,
    /// Snapshot to rank; never modified.
    pub dustbins: &'snapshot [DustbinRecord],
}

impl<'snapshot> ProximityQuery<'snapshot> {
    /// Construct a new query.
    #[must_use]
    pub fn new(
        observer: Coordinate,
        radius_meters: f64,
        dustbins: &'snapshot [DustbinRecord],
    ) -> Self {
        Self {
            observer,
            radius_meters,
            dustbins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_new_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(21.0932, 78.9816).is_ok());
    }

    #[test]
    fn coordinate_new_rejects_out_of_range_and_non_finite() {
        assert!(Coordinate::new(999.0, 78.0).is_err());
        assert!(Coordinate::new(21.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn source_ids_from_builtins() {
        assert_eq!(SourceId::from(Sources::Seed), SourceId("seed".to_owned()));
        assert_eq!(
            SourceId::from(Sources::Municipal).to_string(),
            "municipal"
        );
    }

    #[test]
    fn dustbin_ids_order_naturally() {
        let mut ids: Vec<DustbinId> = ["b", "10", "a", "9", "DB-2", "09"]
            .into_iter()
            .map(DustbinId::from)
            .collect();
        ids.sort();
        let ordered: Vec<&str> = ids.iter().map(|id| id.0.as_str()).collect();
        assert_eq!(ordered, ["09", "9", "10", "DB-2", "a", "b"]);
    }

    #[test]
    fn numeric_ids_keep_their_text() {
        assert_eq!(DustbinId::from(7).to_string(), "7");
        assert_ne!(DustbinId::from("07"), DustbinId::from("7"));
    }
}
