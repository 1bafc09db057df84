//! The offline-tolerant sync engine.
//!
//! One implementation of the apply/attempt/enqueue pattern, invoked
//! uniformly for every logged visit:
//!
//! 1. validate the record locally (a bad record never reaches state, queue,
//!    or wire),
//! 2. attempt the remote append,
//! 3. on success, apply the record to view state as confirmed,
//! 4. on a network or remote failure, enqueue it durably and apply it to
//!    view state as queued, a soft success from the user's point of view.
//!
//! Draining replays the queue head-first and halts at the first failure, so
//! entries are never applied out of order relative to an earlier failed one.
//! Delivery is at-least-once: if the process dies between a successful
//! remote write and the local dequeue, the record is resubmitted on the next
//! drain and the remote log ends up with a duplicate row.
//!
//! The queue is touched only under `db`'s async mutex, which serializes
//! enqueue against drain when callers run on multiple tasks.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use chrono::Utc;
use entrylog_shared::protocol::DeleteRequest;
use entrylog_shared::types::{Building, Position, VisitRecord};
use entrylog_shared::validation::validate_record;
use entrylog_store::{Database, QueuedSubmission};
use tokio::sync::{watch, Mutex};

use crate::bundled;
use crate::error::ClientError;
use crate::remote::LogStore;
use crate::state::{AppState, Phase};

/// How a logged visit was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// The remote store confirmed the append.
    Synced,
    /// The remote write failed; the record is queued locally.
    Queued,
}

impl LogOutcome {
    pub fn user_message(&self) -> &'static str {
        match self {
            LogOutcome::Synced => "Visit logged.",
            LogOutcome::Queued => "Visit logged offline; it will sync when connectivity returns.",
        }
    }
}

/// Result of draining the offline queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Submissions confirmed remotely during this drain.
    pub synced: usize,
    /// Submissions still queued (the failed head and everything behind it).
    pub remaining: usize,
    /// Whether a post-drain refresh ran and succeeded.
    pub refreshed: bool,
}

/// The application core: remote store, durable queue, and view state.
pub struct SyncEngine<S> {
    remote: S,
    db: Mutex<Database>,
    state: Arc<StdMutex<AppState>>,
}

impl<S: LogStore> SyncEngine<S> {
    pub fn new(remote: S, db: Database) -> Self {
        Self {
            remote,
            db: Mutex::new(db),
            state: Arc::new(StdMutex::new(AppState::new())),
        }
    }

    /// Handle to the shared view state.
    pub fn state(&self) -> Arc<StdMutex<AppState>> {
        Arc::clone(&self.state)
    }

    fn state_guard(&self) -> MutexGuard<'_, AppState> {
        // A poisoned state lock still holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The stable anonymous user id for this device.
    pub async fn device_user_id(&self) -> Result<String, ClientError> {
        Ok(self.db.lock().await.device_user_id()?)
    }

    /// Number of submissions currently in the durable queue.
    pub async fn queue_len(&self) -> Result<usize, ClientError> {
        Ok(self.db.lock().await.queue_len()?)
    }

    /// The queued submissions, head first.
    pub async fn pending(&self) -> Result<Vec<QueuedSubmission>, ClientError> {
        Ok(self.db.lock().await.pending()?)
    }

    /// Log a visit at `building`: build the record with this device's user
    /// id and submit it.
    pub async fn log_visit(
        &self,
        building: &Building,
        entrance: u32,
        position: Position,
        under_construction: bool,
    ) -> Result<LogOutcome, ClientError> {
        let user_id = self.db.lock().await.device_user_id()?;
        let record = VisitRecord::new(user_id, building, entrance, position, under_construction);
        self.submit(record).await
    }

    /// Submit one record: attempt the remote write, queue on failure.
    ///
    /// Geolocation never reaches this point (a record carries a position by
    /// construction), and validation failures abort before the record is
    /// applied anywhere.
    pub async fn submit(&self, record: VisitRecord) -> Result<LogOutcome, ClientError> {
        validate_record(&record)?;

        match self.remote.append_log(&record).await {
            Ok(()) => {
                self.state_guard().push_confirmed(record);
                Ok(LogOutcome::Synced)
            }
            Err(e) if e.is_queueable() => {
                tracing::warn!(
                    building = %record.building_id,
                    error = %e,
                    "remote write failed, queuing locally"
                );
                self.db.lock().await.enqueue(&record, Utc::now())?;
                self.state_guard().push_queued(record);
                Ok(LogOutcome::Queued)
            }
            Err(e) => Err(e),
        }
    }

    /// Replay the queue against the remote store, strictly head-first.
    ///
    /// Stops at the first failure; later entries stay queued untouched. If
    /// anything synced, follows up with a full refresh so the view reflects
    /// the remote log rather than the optimistic rows.
    pub async fn drain(&self) -> Result<DrainReport, ClientError> {
        let db = self.db.lock().await;

        let pending = db.pending()?;
        let mut synced = 0;

        for submission in &pending {
            match self.remote.append_log(&submission.record).await {
                Ok(()) => {
                    db.remove(submission.queue_id)?;
                    synced += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        queue_id = submission.queue_id,
                        building = %submission.record.building_id,
                        error = %e,
                        "drain halted at first failure"
                    );
                    break;
                }
            }
        }

        let remaining = db.queue_len()?;
        let still_queued: Vec<VisitRecord> =
            db.pending()?.into_iter().map(|s| s.record).collect();
        drop(db);

        self.state_guard().set_queued(still_queued);

        let refreshed = if synced > 0 { self.refresh().await } else { false };

        tracing::info!(synced, remaining, refreshed, "queue drain finished");
        Ok(DrainReport {
            synced,
            remaining,
            refreshed,
        })
    }

    /// Re-fetch buildings and logs from the remote store.
    ///
    /// Never leaves the state unusable: on failure it falls back to the
    /// cached snapshot, then to the bundled building list, and records a
    /// degraded-mode banner. Returns whether fresh remote data was applied.
    pub async fn refresh(&self) -> bool {
        self.state_guard().phase = Phase::Loading;

        match self.remote.fetch_all().await {
            Ok(data) => {
                let db = self.db.lock().await;
                if let Err(e) = db.save_snapshot(&data.buildings, &data.logs, Utc::now()) {
                    tracing::warn!(error = %e, "failed to cache snapshot");
                }
                let queued = queued_records(&db);
                drop(db);

                let mut state = self.state_guard();
                state.apply_snapshot(data.buildings, data.logs);
                state.set_queued(queued);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed, falling back to local data");

                let db = self.db.lock().await;
                let snapshot = db.load_snapshot().unwrap_or_default();
                let queued = queued_records(&db);
                drop(db);

                let (buildings, logs) = match snapshot {
                    Some(s) => (s.buildings, s.logs),
                    None => (bundled::fallback_buildings(), Vec::new()),
                };

                let mut state = self.state_guard();
                state.apply_fallback(buildings, logs, e.to_string());
                state.set_queued(queued);
                false
            }
        }
    }

    /// Delete remote records, then refresh so derived status reverts.
    pub async fn delete(&self, request: &DeleteRequest) -> Result<u32, ClientError> {
        let deleted = self.remote.delete_logs(request).await?;
        self.refresh().await;
        Ok(deleted)
    }

    /// Drain the queue every time connectivity transitions offline → online.
    ///
    /// Runs until the sender side of the channel is dropped.
    pub async fn watch_connectivity(&self, mut rx: watch::Receiver<bool>) {
        let mut online = *rx.borrow();
        while rx.changed().await.is_ok() {
            let now_online = *rx.borrow();
            if now_online && !online {
                tracing::info!("connectivity restored, draining offline queue");
                if let Err(e) = self.drain().await {
                    tracing::error!(error = %e, "drain failed");
                }
            }
            online = now_online;
        }
    }
}

fn queued_records(db: &Database) -> Vec<VisitRecord> {
    match db.pending() {
        Ok(pending) => pending.into_iter().map(|s| s.record).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read pending queue");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRemote;
    use entrylog_shared::ValidationError;

    fn building(id: &str) -> Building {
        Building::new(id, format!("Building {id}"))
    }

    fn fix() -> Position {
        Position::new(40.0, -75.0, 8.0)
    }

    fn engine(remote: &MemoryRemote) -> SyncEngine<MemoryRemote> {
        SyncEngine::new(remote.clone(), Database::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn synced_submission_is_immediately_done() {
        let remote = MemoryRemote::with_buildings(vec![building("LIB-01")]);
        let engine = engine(&remote);

        let outcome = engine
            .log_visit(&building("LIB-01"), 1, fix(), false)
            .await
            .unwrap();

        assert_eq!(outcome, LogOutcome::Synced);
        assert!(engine.state().lock().unwrap().is_done("LIB-01"));
        assert_eq!(engine.queue_len().await.unwrap(), 0);
        assert_eq!(remote.logs().len(), 1);
    }

    #[tokio::test]
    async fn offline_submission_queues_and_is_still_done() {
        let remote = MemoryRemote::with_buildings(vec![building("LIB-01")]);
        remote.set_online(false);
        let engine = engine(&remote);

        let outcome = engine
            .log_visit(&building("LIB-01"), 1, fix(), false)
            .await
            .unwrap();

        assert_eq!(outcome, LogOutcome::Queued);
        assert!(engine.state().lock().unwrap().is_done("LIB-01"));
        assert_eq!(engine.queue_len().await.unwrap(), 1);
        assert!(remote.logs().is_empty());
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_not_queued() {
        let remote = MemoryRemote::new();
        let engine = engine(&remote);

        let mut record = VisitRecord::new("device-1", &building("LIB-01"), 1, fix(), false);
        record.lat = 91.0;

        let err = engine.submit(record).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::LatitudeOutOfRange(_))
        ));
        assert_eq!(engine.queue_len().await.unwrap(), 0);
        assert!(!engine.state().lock().unwrap().is_done("LIB-01"));
    }

    #[tokio::test]
    async fn drain_halts_at_first_failure_without_reordering() {
        let remote = MemoryRemote::new();
        remote.set_online(false);
        let engine = engine(&remote);

        for id in ["A", "B", "C"] {
            engine.log_visit(&building(id), 1, fix(), false).await.unwrap();
        }
        assert_eq!(engine.queue_len().await.unwrap(), 3);

        // Connectivity returns, but only the first append goes through.
        remote.set_online(true);
        remote.fail_appends_after(1);

        let report = engine.drain().await.unwrap();

        assert_eq!(report.synced, 1);
        assert_eq!(report.remaining, 2);
        assert!(report.refreshed);

        let queued: Vec<String> = engine
            .state()
            .lock()
            .unwrap()
            .queued
            .iter()
            .map(|r| r.building_id.clone())
            .collect();
        assert_eq!(queued, ["B", "C"]);

        let applied: Vec<String> = remote.logs().into_iter().map(|r| r.building_id).collect();
        assert_eq!(applied, ["A"]);
    }

    #[tokio::test]
    async fn online_event_drains_and_refreshes() {
        let remote = MemoryRemote::with_buildings(vec![building("LIB-01")]);
        remote.set_online(false);
        let engine = Arc::new(engine(&remote));

        engine
            .log_visit(&building("LIB-01"), 1, fix(), false)
            .await
            .unwrap();
        assert_eq!(engine.queue_len().await.unwrap(), 1);

        let (tx, rx) = watch::channel(false);
        let watcher = Arc::clone(&engine);
        let task = tokio::spawn(async move { watcher.watch_connectivity(rx).await });

        remote.set_online(true);
        tx.send(true).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        assert_eq!(engine.queue_len().await.unwrap(), 0);
        assert_eq!(remote.logs().len(), 1);
        {
            let state = engine.state();
            let state = state.lock().unwrap();
            assert!(state.queued.is_empty());
            assert!(state.is_done("LIB-01"));
            assert_eq!(state.phase, Phase::Ready);
        }

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn refresh_falls_back_to_bundled_list_without_cache() {
        let remote = MemoryRemote::new();
        remote.set_online(false);
        let engine = engine(&remote);

        assert!(!engine.refresh().await);

        let state = engine.state();
        let state = state.lock().unwrap();
        assert_eq!(state.buildings, bundled::fallback_buildings());
        assert!(state.degraded.is_some());
        assert_eq!(state.phase, Phase::Ready);
    }

    #[tokio::test]
    async fn refresh_prefers_cached_snapshot_over_bundled_list() {
        let remote = MemoryRemote::with_buildings(vec![building("X-01")]);
        let engine = engine(&remote);

        assert!(engine.refresh().await);

        remote.set_online(false);
        assert!(!engine.refresh().await);

        let state = engine.state();
        let state = state.lock().unwrap();
        assert_eq!(state.buildings.len(), 1);
        assert_eq!(state.buildings[0].id, "X-01");
        assert!(state.degraded.is_some());
    }

    #[tokio::test]
    async fn delete_refreshes_so_status_reverts() {
        let remote = MemoryRemote::with_buildings(vec![building("LIB-01")]);
        let engine = engine(&remote);

        engine
            .log_visit(&building("LIB-01"), 1, fix(), false)
            .await
            .unwrap();

        let deleted = engine
            .delete(&DeleteRequest::all_matching("LIB-01", None))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let state = engine.state();
        let state = state.lock().unwrap();
        assert!(!state.is_done("LIB-01"));
    }
}
