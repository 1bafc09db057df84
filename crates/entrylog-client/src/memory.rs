//! In-memory model of the remote log store.
//!
//! Implements [`LogStore`] with the same observable behavior as the real
//! collaborator: the same validation rules, the same delete selection, the
//! same in-band rejection messages. It is the executable description of the
//! endpoint this client is written against, and the double the sync-engine
//! tests run against, including its failure modes, via [`set_online`] and
//! [`fail_appends_after`].
//!
//! [`set_online`]: MemoryRemote::set_online
//! [`fail_appends_after`]: MemoryRemote::fail_appends_after

use std::sync::{Arc, Mutex};

use chrono::Utc;
use entrylog_shared::protocol::{DataResponse, DeleteRequest};
use entrylog_shared::types::{wire_timestamp, Building, VisitRecord};
use entrylog_shared::validation::{validate_record, ValidationError};

use crate::error::ClientError;
use crate::remote::LogStore;

#[derive(Debug, Default)]
struct Inner {
    buildings: Vec<Building>,
    logs: Vec<VisitRecord>,
    offline: bool,
    /// When set, appends succeed this many more times, then fail.
    append_budget: Option<u32>,
}

/// An in-memory [`LogStore`]. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buildings(buildings: Vec<Building>) -> Self {
        let remote = Self::new();
        remote.lock().buildings = buildings;
        remote
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate losing (false) or regaining (true) connectivity.
    pub fn set_online(&self, online: bool) {
        self.lock().offline = !online;
    }

    /// Let the next `remaining` appends succeed, then fail each one after.
    pub fn fail_appends_after(&self, remaining: u32) {
        self.lock().append_budget = Some(remaining);
    }

    /// Seed a log row as-is, timestamp included. Test setup helper.
    pub fn insert_log(&self, record: VisitRecord) {
        self.lock().logs.push(record);
    }

    /// Current log rows, oldest first.
    pub fn logs(&self) -> Vec<VisitRecord> {
        self.lock().logs.clone()
    }

    fn check_online(inner: &Inner) -> Result<(), ClientError> {
        if inner.offline {
            return Err(ClientError::Network("simulated connection loss".into()));
        }
        Ok(())
    }

    /// The endpoint reports validation rejections in-band, with its own
    /// wording.
    fn remote_rejection(error: ValidationError) -> ClientError {
        let body = match error {
            ValidationError::LatitudeOutOfRange(_) | ValidationError::LongitudeOutOfRange(_) => {
                "Lat/Lng out of range"
            }
            _ => "Missing or invalid fields",
        };
        ClientError::Remote {
            status: 200,
            body: body.into(),
        }
    }
}

impl LogStore for MemoryRemote {
    async fn fetch_all(&self) -> Result<DataResponse, ClientError> {
        let inner = self.lock();
        Self::check_online(&inner)?;
        Ok(DataResponse {
            buildings: inner.buildings.clone(),
            logs: inner.logs.clone(),
        })
    }

    async fn append_log(&self, record: &VisitRecord) -> Result<(), ClientError> {
        let mut inner = self.lock();
        Self::check_online(&inner)?;

        if let Some(budget) = inner.append_budget {
            if budget == 0 {
                return Err(ClientError::Network("simulated connection loss".into()));
            }
            inner.append_budget = Some(budget - 1);
        }

        validate_record(record).map_err(Self::remote_rejection)?;

        // The endpoint stamps rows itself when appending.
        let mut row = record.clone();
        row.timestamp = wire_timestamp(Utc::now());
        inner.logs.push(row);
        Ok(())
    }

    async fn delete_logs(&self, request: &DeleteRequest) -> Result<u32, ClientError> {
        let mut inner = self.lock();
        Self::check_online(&inner)?;

        let logs = &mut inner.logs;
        let before = logs.len();

        if request.undo_last {
            // The single chronologically-latest row across all buildings,
            // latest meaning greatest timestamp string.
            let Some(target) = logs.iter().max_by(|a, b| a.timestamp.cmp(&b.timestamp)) else {
                return Ok(0);
            };
            let (timestamp, building_id, entrance) = (
                target.timestamp.clone(),
                target.building_id.clone(),
                target.entrance,
            );
            logs.retain(|r| {
                !(r.timestamp == timestamp
                    && r.building_id == building_id
                    && r.entrance == entrance)
            });
            return Ok((before - logs.len()) as u32);
        }

        let Some(building_id) = request.building_id.as_deref() else {
            return Err(ClientError::Remote {
                status: 200,
                body: "buildingId required (unless undoLast=true)".into(),
            });
        };

        let matches = |r: &VisitRecord| {
            r.building_id == building_id && request.entrance.map_or(true, |e| r.entrance == e)
        };

        if request.latest {
            let Some(target) = logs
                .iter()
                .filter(|r| matches(r))
                .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
            else {
                return Ok(0);
            };
            let timestamp = target.timestamp.clone();
            logs.retain(|r| !(matches(r) && r.timestamp == timestamp));
        } else {
            logs.retain(|r| !matches(r));
        }

        Ok((before - logs.len()) as u32)
    }
}
