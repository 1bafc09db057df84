//! The durable offline submission queue.
//!
//! Invariants enforced here and relied on by the sync engine:
//! - FIFO: `pending` returns rows in insertion order (ascending rowid).
//! - A row leaves the queue only through [`Database::remove`], which the
//!   engine calls after the remote write for that row succeeded.

use chrono::{DateTime, Utc};
use entrylog_shared::types::VisitRecord;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::QueuedSubmission;

impl Database {
    /// Append a record to the tail of the queue. Returns the queue id.
    pub fn enqueue(&self, record: &VisitRecord, queued_at: DateTime<Utc>) -> Result<i64> {
        let payload = serde_json::to_string(record)?;
        self.conn().execute(
            "INSERT INTO queue (record, queued_at) VALUES (?1, ?2)",
            params![payload, queued_at.to_rfc3339()],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// All queued submissions, head first.
    pub fn pending(&self) -> Result<Vec<QueuedSubmission>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, record, queued_at FROM queue ORDER BY id ASC")?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let payload: String = row.get(1)?;
            let queued_at: String = row.get(2)?;
            Ok((id, payload, queued_at))
        })?;

        let mut submissions = Vec::new();
        for row in rows {
            let (queue_id, payload, queued_at) = row?;
            submissions.push(QueuedSubmission {
                queue_id,
                record: serde_json::from_str(&payload)?,
                queued_at: DateTime::parse_from_rfc3339(&queued_at)?.with_timezone(&Utc),
            });
        }
        Ok(submissions)
    }

    /// Remove a synced submission. Returns whether a row was deleted.
    pub fn remove(&self, queue_id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM queue WHERE id = ?1", params![queue_id])?;
        Ok(affected > 0)
    }

    /// Number of submissions currently queued.
    pub fn queue_len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM queue", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrylog_shared::types::{Building, Position};

    fn record(building_id: &str) -> VisitRecord {
        VisitRecord::new(
            "device-1",
            &Building::new(building_id, format!("Building {building_id}")),
            1,
            Position::new(40.0, -75.0, 8.0),
            false,
        )
    }

    #[test]
    fn pending_preserves_insertion_order() {
        let db = Database::open_in_memory().unwrap();

        db.enqueue(&record("A"), Utc::now()).unwrap();
        db.enqueue(&record("B"), Utc::now()).unwrap();
        db.enqueue(&record("C"), Utc::now()).unwrap();

        let ids: Vec<String> = db
            .pending()
            .unwrap()
            .into_iter()
            .map(|s| s.record.building_id)
            .collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn remove_deletes_only_the_given_row() {
        let db = Database::open_in_memory().unwrap();

        let first = db.enqueue(&record("A"), Utc::now()).unwrap();
        db.enqueue(&record("B"), Utc::now()).unwrap();

        assert!(db.remove(first).unwrap());
        assert!(!db.remove(first).unwrap());

        let remaining = db.pending().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].record.building_id, "B");
    }

    #[test]
    fn queue_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");

        {
            let db = Database::open_at(&path).unwrap();
            db.enqueue(&record("A"), Utc::now()).unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.queue_len().unwrap(), 1);
        assert_eq!(db.pending().unwrap()[0].record.building_id, "A");
    }
}
