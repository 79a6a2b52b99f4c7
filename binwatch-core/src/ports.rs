//! Traits describing provider capabilities and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::geo::GeoError;
use crate::model::{Coordinate, DustbinRecord, SourceMeta};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to snapshot or location providers.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The source has no registered plugin.
    #[error("Unsupported source")]
    UnsupportedSource,
    /// The observer location is unusable.
    #[error("Invalid observer: {0}")]
    InvalidObserver(#[from] GeoError),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for backends that deliver the current state of all dustbins.
pub trait SnapshotPort: Send + Sync {
    /// Metadata describing the source handled by this port.
    fn source(&self) -> &SourceMeta;

    /// Fetch a fresh snapshot of every dustbin the source knows about.
    ///
    /// Records are returned as delivered; malformed coordinates or fill
    /// levels are left for the ranker to report.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn snapshot(&self) -> Result<Vec<DustbinRecord>, PortError>;
}

#[async_trait]
/// Trait for anything that can tell where the observer currently is.
pub trait ObserverPort: Send + Sync {
    /// Current observer location.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when no location can be determined.
    async fn locate(&self) -> Result<Coordinate, PortError>;
}

#[derive(Debug, Clone, Copy)]
/// Observer pinned to a configured coordinate.
pub struct FixedObserver {
    location: Coordinate,
}

impl FixedObserver {
    /// Pin the observer to `location`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidObserver`] if the coordinate is outside the valid domain.
    pub fn new(location: Coordinate) -> Result<Self, PortError> {
        location.validate()?;
        Ok(Self { location })
    }
}

#[async_trait]
impl ObserverPort for FixedObserver {
    async fn locate(&self) -> Result<Coordinate, PortError> {
        Ok(self.location)
    }
}
