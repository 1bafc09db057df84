use entrylog_shared::ValidationError;
use entrylog_store::StoreError;
use thiserror::Error;

use crate::geo::GeolocationError;

/// Errors produced by the client layer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Bad input shape or range. Rejected before any network call.
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not complete. Triggers queuing for writes.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote store answered, but with a failure. Triggers queuing for
    /// writes, same as [`ClientError::Network`].
    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// Position acquisition failed. Surfaced to the user immediately; a
    /// record is never created without a position.
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// Local durable storage failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Whether a failed write should land in the offline queue.
    pub fn is_queueable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Remote { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_and_remote_failures_queue() {
        assert!(ClientError::Network("connection refused".into()).is_queueable());
        assert!(ClientError::Remote {
            status: 500,
            body: "oops".into()
        }
        .is_queueable());

        assert!(!ClientError::Validation(ValidationError::EmptyBuildingId).is_queueable());
        assert!(!ClientError::Geolocation(GeolocationError::Timeout).is_queueable());
    }
}
