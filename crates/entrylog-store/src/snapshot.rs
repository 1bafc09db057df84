//! Cached remote snapshot.
//!
//! The last `mode=data` payload fetched from the remote store, persisted so
//! the client can still render the building list when the endpoint is
//! unreachable. A single row; each save replaces the previous snapshot.

use chrono::{DateTime, Utc};
use entrylog_shared::types::{Building, VisitRecord};
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::Snapshot;

impl Database {
    /// Replace the cached snapshot with a freshly fetched payload.
    pub fn save_snapshot(
        &self,
        buildings: &[Building],
        logs: &[VisitRecord],
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO snapshot (id, buildings, logs, fetched_at)
             VALUES (1, ?1, ?2, ?3)",
            params![
                serde_json::to_string(buildings)?,
                serde_json::to_string(logs)?,
                fetched_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The cached snapshot, if one has ever been saved.
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let row = self
            .conn()
            .query_row(
                "SELECT buildings, logs, fetched_at FROM snapshot WHERE id = 1",
                [],
                |row| {
                    let buildings: String = row.get(0)?;
                    let logs: String = row.get(1)?;
                    let fetched_at: String = row.get(2)?;
                    Ok((buildings, logs, fetched_at))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let Some((buildings, logs, fetched_at)) = row else {
            return Ok(None);
        };

        Ok(Some(Snapshot {
            buildings: serde_json::from_str(&buildings)?,
            logs: serde_json::from_str(&logs)?,
            fetched_at: DateTime::parse_from_rfc3339(&fetched_at)?.with_timezone(&Utc),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrylog_shared::types::Position;

    #[test]
    fn load_returns_none_before_first_save() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let db = Database::open_in_memory().unwrap();

        let buildings = vec![Building::new("LIB-01", "Main Library")];
        let logs = vec![VisitRecord::new(
            "device-1",
            &buildings[0],
            1,
            Position::new(40.0, -75.0, 8.0),
            false,
        )];
        let fetched_at = Utc::now();

        db.save_snapshot(&buildings, &logs, fetched_at).unwrap();

        let snapshot = db.load_snapshot().unwrap().expect("snapshot saved");
        assert_eq!(snapshot.buildings, buildings);
        assert_eq!(snapshot.logs, logs);
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let db = Database::open_in_memory().unwrap();

        db.save_snapshot(&[Building::new("A", "First")], &[], Utc::now())
            .unwrap();
        db.save_snapshot(&[Building::new("B", "Second")], &[], Utc::now())
            .unwrap();

        let snapshot = db.load_snapshot().unwrap().unwrap();
        assert_eq!(snapshot.buildings.len(), 1);
        assert_eq!(snapshot.buildings[0].id, "B");
    }
}
