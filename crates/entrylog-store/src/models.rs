//! Structs persisted in the local database.

use chrono::{DateTime, Utc};
use entrylog_shared::types::{Building, VisitRecord};

/// A visit record not yet confirmed persisted remotely.
///
/// `queue_id` is the SQLite rowid and doubles as the FIFO position:
/// submissions are replayed strictly in ascending id.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedSubmission {
    pub queue_id: i64,
    pub record: VisitRecord,
    /// When the submission entered the queue.
    pub queued_at: DateTime<Utc>,
}

/// The last successfully fetched remote payload, kept for offline fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub buildings: Vec<Building>,
    pub logs: Vec<VisitRecord>,
    pub fetched_at: DateTime<Utc>,
}
