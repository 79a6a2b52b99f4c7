//! High-level service facade combining snapshot sources and the triage engine.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::model::{AnnotatedDustbin, Coordinate, ProximityQuery, SourceId};
use crate::plugin::SourceRegistry;
use crate::ports::{ObserverPort, PortError};
use crate::ranker::{Ranking, rank};
use crate::triage::{SeveritySummary, select_highlight};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Everything a client needs to render one triage view.
pub struct TriageReport {
    /// Source the snapshot came from.
    pub source: SourceId,
    /// Observer distances were measured from.
    pub observer: Coordinate,
    /// Radius used for filtering, in meters.
    pub radius_meters: f64,
    /// Ranked in-range dustbins plus validity diagnostics.
    pub ranking: Ranking,
    /// Dustbin to emphasize, if any is in range.
    pub highlight: Option<AnnotatedDustbin>,
    /// Per-severity counts of the ranked dustbins.
    pub summary: SeveritySummary,
}

/// Public entry point for listing sources and triaging their dustbins.
pub struct BinwatchService {
    registry: Arc<SourceRegistry>,
}

impl BinwatchService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// List all available sources and their display names.
    #[must_use]
    pub fn sources(&self) -> Vec<(SourceId, String)> {
        self.registry
            .sources()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Fetch a snapshot from `source` and triage it around `observer`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the source is unsupported, the observer is
    /// not a valid coordinate, or the provider call fails. Malformed records
    /// and empty results are reported inside the [`TriageReport`] instead.
    pub async fn triage(
        &self,
        source: SourceId,
        observer: Coordinate,
        radius_meters: f64,
    ) -> Result<TriageReport, PortError> {
        observer.validate()?;
        let plugin = self.registry.plugin(&source)?;
        let snapshot = plugin.snapshot_port.snapshot().await?;

        let ranking = rank(&ProximityQuery::new(observer, radius_meters, &snapshot));
        let highlight = select_highlight(&ranking.entries).cloned();
        let summary = SeveritySummary::from_ranked(&ranking.entries);

        info!(
            "Triaged {} dustbins from {source}: {} in range, {} skipped, highlight {}",
            snapshot.len(),
            ranking.entries.len(),
            ranking.skipped.len(),
            highlight
                .as_ref()
                .map_or_else(|| "none".to_owned(), |entry| entry.id().to_string())
        );

        Ok(TriageReport {
            source,
            observer,
            radius_meters,
            ranking,
            highlight,
            summary,
        })
    }

    /// Like [`BinwatchService::triage`], asking `observer` for the location first.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the observer cannot be located or
    /// [`BinwatchService::triage`] fails.
    pub async fn triage_located(
        &self,
        source: SourceId,
        observer: &dyn ObserverPort,
        radius_meters: f64,
    ) -> Result<TriageReport, PortError> {
        let location = observer.locate().await?;
        self.triage(source, location, radius_meters).await
    }
}
