//! Position acquisition.
//!
//! Wraps a device location source behind the [`LocationSource`] trait and
//! layers the retry policy on top: a single-shot mode that issues one
//! request, and an enhanced mode that retries while the reported accuracy is
//! worse than the target, keeping the best reading seen.

use std::future::Future;
use std::time::Duration;

use entrylog_shared::constants::{
    ACCURACY_TARGET_METERS, LOCATE_MAX_ATTEMPTS, LOCATE_RETRY_DELAY_SECS, LOCATE_TIMEOUT_SECS,
};
use entrylog_shared::types::Position;
use thiserror::Error;

/// Position acquisition failed.
///
/// Surfaced to the user immediately; never queued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("device has no geolocation capability")]
    Unsupported,

    #[error("geolocation failed: {0}")]
    Unknown(String),
}

impl GeolocationError {
    /// Message shown to the user when the action is aborted.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Location permission was denied. Enable location access and try again."
            }
            GeolocationError::PositionUnavailable => {
                "Your position could not be determined. Move to an open area and try again."
            }
            GeolocationError::Timeout => "Timed out waiting for a position fix. Try again.",
            GeolocationError::Unsupported => "This device has no geolocation capability.",
            GeolocationError::Unknown(_) => "Something went wrong while acquiring your position.",
        }
    }
}

/// A source of device position fixes.
///
/// One call is one device location request: a single suspend point awaiting
/// the hardware callback. Retrying lives in [`PositionProvider`], not here.
pub trait LocationSource {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Position, GeolocationError>> + Send;
}

/// A source that always reports the same fix.
///
/// Used by the CLI, where coordinates arrive as flags rather than from a
/// positioning device.
#[derive(Debug, Clone, Copy)]
pub struct StaticSource {
    position: Position,
}

impl StaticSource {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

impl LocationSource for StaticSource {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.position)
    }
}

/// Acquires positions from a [`LocationSource`] with timeout and retry.
pub struct PositionProvider<S> {
    source: S,
    accuracy_target_m: f64,
    max_attempts: u32,
    retry_delay: Duration,
    attempt_timeout: Duration,
}

impl<S: LocationSource> PositionProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            accuracy_target_m: ACCURACY_TARGET_METERS,
            max_attempts: LOCATE_MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(LOCATE_RETRY_DELAY_SECS),
            attempt_timeout: Duration::from_secs(LOCATE_TIMEOUT_SECS),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_accuracy_target(mut self, meters: f64) -> Self {
        self.accuracy_target_m = meters;
        self
    }

    /// Single-shot mode: one device request, bounded by the attempt timeout.
    pub async fn acquire(&self) -> Result<Position, GeolocationError> {
        match tokio::time::timeout(self.attempt_timeout, self.source.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout),
        }
    }

    /// Enhanced mode: retry while the best accuracy exceeds the target.
    ///
    /// Returns as soon as a reading meets the target. If the target is never
    /// met, returns the best reading seen across all attempts; only when
    /// every attempt failed is the last error propagated.
    pub async fn acquire_enhanced(&self) -> Result<Position, GeolocationError> {
        let mut best: Option<Position> = None;
        let mut last_error = GeolocationError::Unsupported;

        for attempt in 1..=self.max_attempts {
            match self.acquire().await {
                Ok(position) => {
                    tracing::debug!(
                        attempt,
                        accuracy = position.accuracy,
                        "position fix acquired"
                    );
                    if best.map_or(true, |b| position.accuracy < b.accuracy) {
                        best = Some(position);
                    }
                    if position.accuracy <= self.accuracy_target_m {
                        return Ok(position);
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "position attempt failed");
                    last_error = e;
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        best.ok_or(last_error)
    }
}
