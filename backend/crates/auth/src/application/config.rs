//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Storage key of the persisted session
pub const SESSION_STORAGE_KEY: &str = "auth.session";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Durable storage key for the current session
    pub session_storage_key: String,
    /// Whether the session survives a restart
    pub persist_session: bool,
    /// Refresh the access token this long before it expires
    pub refresh_margin: Duration,
    /// Auth event channel capacity per subscriber
    pub event_capacity: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_storage_key: SESSION_STORAGE_KEY.to_string(),
            persist_session: true,
            refresh_margin: Duration::from_secs(60),
            event_capacity: 16,
        }
    }
}

impl AuthConfig {
    /// Create config for development (sessions are not persisted)
    pub fn development() -> Self {
        Self {
            persist_session: false,
            ..Default::default()
        }
    }

    /// Refresh margin as a chrono delta
    pub fn refresh_margin_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::from_std(self.refresh_margin).unwrap_or(chrono::TimeDelta::zero())
    }
}
