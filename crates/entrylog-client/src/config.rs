//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration for local development (against an in-memory remote).

use std::time::Duration;

use entrylog_shared::constants::DEFAULT_HTTP_TIMEOUT_SECS;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the remote log store web app.
    /// Env: `ENTRYLOG_ENDPOINT`
    /// Default: empty (remote calls will fail; offline queue still works).
    pub endpoint: String,

    /// Shared team password the login gate compares against.
    /// Env: `ENTRYLOG_TEAM_PASSWORD`
    /// Default: empty (login always fails until configured).
    pub team_password: String,

    /// Timeout applied to each HTTP call to the remote store.
    /// Env: `ENTRYLOG_HTTP_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            team_password: String::new(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("ENTRYLOG_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(password) = std::env::var("ENTRYLOG_TEAM_PASSWORD") {
            config.team_password = password;
        }

        if let Ok(val) = std::env::var("ENTRYLOG_HTTP_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid ENTRYLOG_HTTP_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert!(config.endpoint.is_empty());
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
