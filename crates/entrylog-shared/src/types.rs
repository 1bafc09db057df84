//! Domain model structs for buildings and visit records.
//!
//! Field names serialize in camelCase to match the remote log store's sheet
//! columns, so these structs decode the wire payload directly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ENTRANCES_MAX;

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// A campus building with one or more entrances to be logged.
///
/// Immutable once loaded; sourced from the remote store or the bundled
/// fallback list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Unique building identifier, e.g. `LIB-01`.
    pub id: String,
    /// Human-readable building name.
    pub name: String,
    /// Number of entrances, when the source declares it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrances_max: Option<u32>,
}

impl Building {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entrances_max: None,
        }
    }

    /// Declared entrance count, or the default when the source omits it.
    pub fn entrance_count(&self) -> u32 {
        self.entrances_max.unwrap_or(DEFAULT_ENTRANCES_MAX)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A geolocation fix: coordinates plus the reported accuracy radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Latitude in degrees, [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, [-180, 180].
    pub lng: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64, accuracy: f64) -> Self {
        Self { lat, lng, accuracy }
    }
}

// ---------------------------------------------------------------------------
// VisitRecord
// ---------------------------------------------------------------------------

/// One observed entrance-visit event with geolocation.
///
/// Append-only: a record is never mutated after creation and is removed only
/// via an explicit delete/undo operation against the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// When the visit was recorded, as an RFC 3339 string.
    ///
    /// Kept as a string rather than a parsed datetime: the remote store
    /// orders records by lexical comparison of this field, and round-tripping
    /// through a datetime type could silently change precision. All local
    /// producers stamp via [`wire_timestamp`] so the format stays uniform.
    pub timestamp: String,
    /// Stable anonymous id of the device that logged the visit.
    pub user_id: String,
    pub building_id: String,
    pub building_name: String,
    /// 1-based entrance number.
    pub entrance: u32,
    pub lat: f64,
    pub lng: f64,
    /// Accuracy radius of the fix, in meters.
    pub accuracy: f64,
    /// Whether the entrance was marked as under construction.
    #[serde(default)]
    pub under_construction: bool,
}

impl VisitRecord {
    /// Build a record for a visit observed now at `position`.
    pub fn new(
        user_id: impl Into<String>,
        building: &Building,
        entrance: u32,
        position: Position,
        under_construction: bool,
    ) -> Self {
        Self {
            timestamp: wire_timestamp(Utc::now()),
            user_id: user_id.into(),
            building_id: building.id.clone(),
            building_name: building.name.clone(),
            entrance,
            lat: position.lat,
            lng: position.lng,
            accuracy: position.accuracy,
            under_construction,
        }
    }
}

/// Format a timestamp the way every producer in the system does.
///
/// Millisecond precision, UTC, `Z` suffix. With a single fixed format,
/// lexical order over the strings equals chronological order, which the
/// remote store's latest/undo selection depends on.
pub fn wire_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
