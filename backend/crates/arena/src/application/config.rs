//! Application Configuration
//!
//! Configuration for the challenge cache.

use std::time::Duration;

/// Storage key of the builder's accepted challenges
pub const ACCEPTED_STORAGE_KEY: &str = "acceptedChallenges";

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Period of the additive refresh
    pub refresh_interval: Duration,
    /// Write created challenges to the backend; `false` keeps them local
    pub persist_created_remotely: bool,
    /// Durable storage key for accepted challenges
    pub accepted_storage_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            persist_created_remotely: true,
            accepted_storage_key: ACCEPTED_STORAGE_KEY.to_string(),
        }
    }
}

impl CacheConfig {
    /// Local-only authoring, as in the demo build
    pub fn development() -> Self {
        Self {
            persist_created_remotely: false,
            ..Default::default()
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        // A zero period would make the ticker panic
        self.refresh_interval = interval.max(Duration::from_millis(1));
        self
    }
}
