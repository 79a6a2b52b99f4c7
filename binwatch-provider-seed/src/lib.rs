//! Offline provider serving the municipality's seed dataset.
//!
//! The bins mirror what the municipal backend is initially seeded with, so
//! the engine can be exercised without a running server.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use binwatch_core::{
    model::{Coordinate, DustbinRecord, SourceMeta, Sources},
    plugin::SourcePlugin,
    ports::{PortError, SnapshotPort},
};

/// Seed bins as `(id, lat, lng, fill level)`.
const SEED_BINS: [(&str, f64, f64, i32); 8] = [
    ("1", 21.094_99, 78.980_26, 20),
    ("2", 21.093_90, 78.977_50, 35),
    ("3", 21.093_88, 78.976_09, 45),
    ("4", 21.094_50, 78.979_00, 30),
    ("5", 21.095_50, 78.979_50, 50),
    ("6", 21.095_10, 78.981_00, 15),
    ("7", 21.095_50, 78.980_50, 60),
    ("8", 21.095_80, 78.978_00, 25),
];

const DEFAULT_OBSERVER: Coordinate = Coordinate {
    lat: 21.0932,
    lng: 78.9816,
};

/// Fallback observer location for the seeded area, used when no device
/// location is available.
#[must_use]
pub fn default_observer() -> Coordinate {
    DEFAULT_OBSERVER
}

/// The seed bins as snapshot records.
#[must_use]
pub fn seed_records() -> Vec<DustbinRecord> {
    SEED_BINS
        .iter()
        .map(|&(id, lat, lng, fill_level)| {
            DustbinRecord::new(id, Coordinate { lat, lng }, fill_level)
        })
        .collect()
}

/// Snapshot port returning the seed dataset.
pub struct SeedSnapshotPort {
    meta: SourceMeta,
    records: Vec<DustbinRecord>,
}

impl SeedSnapshotPort {
    /// Create a port serving the seed bins.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(seed_records())
    }

    /// Create a port serving a custom set of records under the seed source id.
    #[must_use]
    pub fn with_records(records: Vec<DustbinRecord>) -> Self {
        Self {
            meta: source_meta(),
            records,
        }
    }
}

impl Default for SeedSnapshotPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotPort for SeedSnapshotPort {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn snapshot(&self) -> Result<Vec<DustbinRecord>, PortError> {
        debug!("Serving {} seed dustbins", self.records.len());
        Ok(self.records.clone())
    }
}

/// Build the plugin bundle for the seed provider.
#[must_use]
pub fn plugin() -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        snapshot_port: Arc::new(SeedSnapshotPort::new()),
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: Sources::Seed.into(),
        name: String::from("Seed dataset (offline)"),
    }
}
