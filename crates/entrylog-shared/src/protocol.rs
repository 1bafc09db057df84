//! Wire protocol for the remote log store.
//!
//! Every operation is a plain HTTP GET with query parameters and a JSON
//! response body; encoding writes as GETs keeps browser callers free of
//! CORS preflight requests, which the endpoint cannot answer. This module
//! holds the request encodings and the response envelopes.

use serde::{Deserialize, Serialize};

use crate::types::{Building, VisitRecord};

/// A query-parameter list ready to hand to the HTTP client.
pub type Query = Vec<(&'static str, String)>;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `mode=data`: fetch the building list and the full visit log.
pub fn fetch_query() -> Query {
    vec![("mode", "data".to_string())]
}

/// `mode=log&...`: append one visit record.
///
/// The timestamp is deliberately absent: the remote store stamps rows itself
/// when it appends them.
pub fn append_query(record: &VisitRecord) -> Query {
    vec![
        ("mode", "log".to_string()),
        ("buildingId", record.building_id.clone()),
        ("buildingName", record.building_name.clone()),
        ("entrance", record.entrance.to_string()),
        ("lat", record.lat.to_string()),
        ("lng", record.lng.to_string()),
        ("accuracy", record.accuracy.to_string()),
        ("userId", record.user_id.clone()),
        ("underConstruction", record.under_construction.to_string()),
    ]
}

/// A delete operation against the remote visit log.
///
/// Built through the constructors so the flag combinations stay the ones the
/// remote endpoint understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub building_id: Option<String>,
    pub entrance: Option<u32>,
    pub latest: bool,
    pub undo_last: bool,
}

impl DeleteRequest {
    /// Delete every record for a building, or only those for one entrance.
    pub fn all_matching(building_id: impl Into<String>, entrance: Option<u32>) -> Self {
        Self {
            building_id: Some(building_id.into()),
            entrance,
            latest: false,
            undo_last: false,
        }
    }

    /// Delete the chronologically-latest record matching the filter.
    pub fn latest_matching(building_id: impl Into<String>, entrance: Option<u32>) -> Self {
        Self {
            building_id: Some(building_id.into()),
            entrance,
            latest: true,
            undo_last: false,
        }
    }

    /// Delete the single most recent record across all buildings.
    pub fn undo_last() -> Self {
        Self {
            building_id: None,
            entrance: None,
            latest: false,
            undo_last: true,
        }
    }

    /// `mode=delete&...` encoding. Absent options are omitted, not sent empty.
    pub fn to_query(&self) -> Query {
        let mut query: Query = vec![("mode", "delete".to_string())];
        if let Some(ref id) = self.building_id {
            query.push(("buildingId", id.clone()));
        }
        if let Some(entrance) = self.entrance {
            query.push(("entrance", entrance.to_string()));
        }
        if self.latest {
            query.push(("latest", "true".to_string()));
        }
        if self.undo_last {
            query.push(("undoLast", "true".to_string()));
        }
        query
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response to `mode=data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataResponse {
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub logs: Vec<VisitRecord>,
}

/// Response to `mode=log`: `{ok:true}` or `{ok:false,error}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppendResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response to `mode=delete`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub ok: bool,
    #[serde(default)]
    pub deleted_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Building, Position};

    #[test]
    fn append_query_carries_every_field() {
        let record = VisitRecord::new(
            "device-1",
            &Building::new("LIB-01", "Main Library"),
            2,
            Position::new(40.0, -75.0, 8.0),
            true,
        );

        let query = append_query(&record);
        let get = |k: &str| {
            query
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("log"));
        assert_eq!(get("buildingId"), Some("LIB-01"));
        assert_eq!(get("buildingName"), Some("Main Library"));
        assert_eq!(get("entrance"), Some("2"));
        assert_eq!(get("lat"), Some("40"));
        assert_eq!(get("lng"), Some("-75"));
        assert_eq!(get("userId"), Some("device-1"));
        assert_eq!(get("underConstruction"), Some("true"));
        assert_eq!(get("timestamp"), None);
    }

    #[test]
    fn delete_query_omits_absent_options() {
        let query = DeleteRequest::undo_last().to_query();
        assert_eq!(
            query,
            vec![
                ("mode", "delete".to_string()),
                ("undoLast", "true".to_string()),
            ]
        );

        let query = DeleteRequest::latest_matching("LIB-01", Some(2)).to_query();
        assert_eq!(
            query,
            vec![
                ("mode", "delete".to_string()),
                ("buildingId", "LIB-01".to_string()),
                ("entrance", "2".to_string()),
                ("latest", "true".to_string()),
            ]
        );
    }

    #[test]
    fn delete_response_decodes_camel_case_count() {
        let resp: DeleteResponse =
            serde_json::from_str(r#"{"ok":true,"deletedCount":2}"#).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.deleted_count, 2);

        let resp: DeleteResponse = serde_json::from_str(
            r#"{"ok":false,"error":"buildingId required (unless undoLast=true)"}"#,
        )
        .unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.deleted_count, 0);
    }
}
