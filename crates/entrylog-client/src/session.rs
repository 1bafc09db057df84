//! The login gate.
//!
//! A single shared team password, compared against the configured value. On
//! success the session holds an ephemeral authenticated flag plus an
//! optional display name; nothing outlives the process.

use crate::config::ClientConfig;

/// Session context for the current process.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
    display_name: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to authenticate. Returns whether the password matched.
    ///
    /// An empty configured password never matches: a deployment without
    /// `ENTRYLOG_TEAM_PASSWORD` set stays locked rather than open.
    pub fn login(
        &mut self,
        config: &ClientConfig,
        password: &str,
        display_name: Option<String>,
    ) -> bool {
        if config.team_password.is_empty() || password != config.team_password {
            tracing::warn!("login rejected");
            return false;
        }

        self.authenticated = true;
        self.display_name = display_name;
        tracing::info!(display_name = ?self.display_name, "login accepted");
        true
    }

    /// Drop authentication and any session-scoped identity.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.display_name = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}
