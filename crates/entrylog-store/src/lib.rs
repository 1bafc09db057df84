//! # entrylog-store
//!
//! Local durable storage for the entrylog client, backed by SQLite.
//!
//! Holds everything the client must not lose when the process exits: the
//! offline submission queue, the last snapshot of buildings and logs fetched
//! from the remote store (the offline fallback), and small device metadata
//! such as the stable anonymous user id. The crate exposes a synchronous
//! `Database` handle that wraps a `rusqlite::Connection` and provides typed
//! helpers per concern.

pub mod database;
pub mod meta;
pub mod migrations;
pub mod models;
pub mod queue;
pub mod snapshot;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::{QueuedSubmission, Snapshot};
