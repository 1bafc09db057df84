//! # entrylog-shared
//!
//! Domain types and wire protocol shared between the entrylog client, the
//! local store, and the command-line binary: buildings, visit records, the
//! query-parameter encoding understood by the remote log store, and the
//! input validation rules the remote endpoint applies on its side as well.

pub mod constants;
pub mod protocol;
pub mod types;
pub mod validation;

pub use protocol::{AppendResponse, DataResponse, DeleteRequest, DeleteResponse};
pub use types::{Building, Position, VisitRecord};
pub use validation::ValidationError;
