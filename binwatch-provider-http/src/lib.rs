//! Provider implementation for the municipal waste-management REST backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use binwatch_core::{
    model::{Coordinate, DustbinId, DustbinRecord, SourceMeta, Sources},
    plugin::SourcePlugin,
    ports::{PortError, SnapshotPort},
};

/// Default backend address used during development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Single bin from GET /dustbins
#[derive(Debug, Deserialize)]
struct DustbinEntry {
    // numeric in the backend schema, but textual ids are accepted too
    #[serde(default, deserialize_with = "lenient")]
    dustbin_id: Option<RawId>,

    #[serde(default, deserialize_with = "lenient")]
    coordinates: Option<CoordinatesEntry>,

    // numbers only; anything else is treated as missing
    #[serde(default, deserialize_with = "lenient")]
    level: Option<f64>,

    #[serde(default, rename = "updatedAt", deserialize_with = "lenient")]
    updated_at: Option<String>,
    // createdAt and _id exist but are not needed
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct CoordinatesEntry {
    #[serde(default, deserialize_with = "lenient")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    lng: Option<f64>,
}

/// Snapshot implementation backed by the municipal REST API.
pub struct HttpSnapshotPort {
    client: Client,
    base_url: String,
    meta: SourceMeta,
}

impl HttpSnapshotPort {
    /// Create a new snapshot port bound to the given HTTP client and backend URL.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            meta: source_meta(),
        }
    }
}

#[async_trait]
impl SnapshotPort for HttpSnapshotPort {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn snapshot(&self) -> Result<Vec<DustbinRecord>, PortError> {
        let url = format!("{}/dustbins", self.base_url);
        debug!("Fetching dustbin snapshot from {url}");

        let entries = fetch_json::<Vec<Value>>(self.client.get(url)).await?;
        let records = decode_entries(entries);

        info!("Fetched {} dustbins from {}", records.len(), self.base_url);
        Ok(records)
    }
}

/// Build the plugin bundle for the municipal backend.
#[must_use]
pub fn plugin<S: Into<String>>(client: Client, base_url: S) -> SourcePlugin {
    let snapshot_port = Arc::new(HttpSnapshotPort::new(client, base_url));

    SourcePlugin {
        meta: source_meta(),
        snapshot_port,
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: Sources::Municipal.into(),
        name: String::from("Municipal backend"),
    }
}

/// Decode every array element on its own so one broken entry cannot sink the snapshot.
///
/// Entries that are not objects or carry no usable `dustbin_id` are kept as
/// records with a positional id (`entry#<index>`) and no location, so the
/// ranker reports them as skipped.
fn decode_entries(entries: Vec<Value>) -> Vec<DustbinRecord> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| match serde_json::from_value::<DustbinEntry>(value) {
            Ok(entry) => into_record(index, entry),
            Err(err) => {
                warn!("Unreadable dustbin entry #{index}: {err}");
                unreadable_record(index)
            }
        })
        .collect()
}

/// Map a backend entry onto a snapshot record.
///
/// Missing coordinates become NaN and missing levels become `None`, so the
/// ranker reports them instead of them vanishing here.
fn into_record(index: usize, entry: DustbinEntry) -> DustbinRecord {
    let id = match entry.dustbin_id {
        Some(RawId::Number(number)) => DustbinId::from(number),
        Some(RawId::Text(text)) if !text.trim().is_empty() => DustbinId::from(text),
        Some(RawId::Text(_)) | None => {
            warn!("Dustbin entry #{index} has no usable dustbin_id");
            return unreadable_record(index);
        }
    };

    let (lat, lng) = entry
        .coordinates
        .map_or((None, None), |coords| (coords.lat, coords.lng));

    let last_updated = entry
        .updated_at
        .and_then(|raw| match DateTime::parse_from_rfc3339(&raw) {
            Ok(stamp) => Some(stamp.with_timezone(&Utc)),
            Err(err) => {
                warn!("Ignoring updatedAt {raw:?} of dustbin {id}: {err}");
                None
            }
        });

    DustbinRecord {
        id,
        location: Coordinate {
            lat: lat.unwrap_or(f64::NAN),
            lng: lng.unwrap_or(f64::NAN),
        },
        fill_level: entry.level.and_then(level_percent),
        last_updated,
    }
}

fn unreadable_record(index: usize) -> DustbinRecord {
    DustbinRecord {
        id: DustbinId(format!("entry#{index}")),
        location: Coordinate {
            lat: f64::NAN,
            lng: f64::NAN,
        },
        fill_level: None,
        last_updated: None,
    }
}

/// Round a reported level to whole percent; out-of-range values are kept for clamping.
fn level_percent(level: f64) -> Option<i32> {
    if !level.is_finite() {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate and the level is clamped downstream"
    )]
    let percent = level.round() as i32;
    Some(percent)
}

/// Decode a field as `T`, treating a value of any other shape as missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<V> {
        Value(V),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Value(value)) => Some(value),
        Some(Lenient::Other(_)) | None => None,
    })
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
