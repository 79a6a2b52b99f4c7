//! Core types, triage engine, and service wiring for the binwatch dustbin monitor.

/// Great-circle distance between coordinates.
pub mod geo;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Registry for plugging snapshot sources into the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Proximity filtering and ordering of dustbin snapshots.
pub mod ranker;
/// High-level service facade used by clients.
pub mod service;
/// Fill-level classification.
pub mod severity;
/// Selection of the dustbin to highlight.
pub mod triage;

pub use geo::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use ranker::*;
pub use service::*;
pub use severity::*;
pub use triage::*;
