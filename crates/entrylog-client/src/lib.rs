//! # entrylog-client
//!
//! The application core of the campus entrance logger: position acquisition
//! with a retry policy, the HTTP client for the remote log store, the
//! offline-tolerant sync engine, the session gate, and the pure view-state
//! derivation the UI layer renders from.
//!
//! The engine follows one pattern everywhere a visit is logged: apply the
//! record to local state optimistically, attempt the remote write, and on a
//! network or remote failure enqueue the record in the durable local queue.
//! A connectivity-restored signal replays the queue strictly in FIFO order,
//! halting at the first failure so earlier submissions are never overtaken.

pub mod bundled;
pub mod config;
pub mod geo;
pub mod memory;
pub mod remote;
pub mod session;
pub mod state;
pub mod sync;

mod error;

pub use config::ClientConfig;
pub use error::ClientError;
pub use geo::{GeolocationError, LocationSource, PositionProvider};
pub use memory::MemoryRemote;
pub use remote::{LogStore, RemoteStore};
pub use session::Session;
pub use state::{AppState, Phase};
pub use sync::{DrainReport, LogOutcome, SyncEngine};
