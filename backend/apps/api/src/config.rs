//! Server Configuration
//!
//! Everything the composition root reads from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use platform::config::{EnvError, flag, or_default, parse_or, require};
use platform::rest::RestConfig;

const DEFAULT_STORAGE_DIR: &str = ".arena";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_REFRESH_SECS: u64 = 10;

/// Which backend the services talk to
#[derive(Debug, Clone)]
pub enum Backend {
    Hosted(RestConfig),
    /// In-memory repositories; nothing leaves the process
    Offline,
}

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub backend: Backend,
    pub listen_addr: SocketAddr,
    pub storage_dir: PathBuf,
    pub refresh_interval: Duration,
    pub frontend_origins: Vec<String>,
}

impl ArenaConfig {
    pub fn from_env() -> Result<Self, EnvError> {
        let backend = if flag("ARENA_OFFLINE", false) {
            Backend::Offline
        } else {
            Backend::Hosted(RestConfig::new(
                require("SUPABASE_URL")?,
                require("SUPABASE_ANON_KEY")?,
            ))
        };

        let listen_addr = parse_or("ARENA_LISTEN_ADDR", default_listen_addr())?;
        let refresh_secs: u64 = parse_or("ARENA_REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_SECS)?;

        Ok(Self {
            backend,
            listen_addr,
            storage_dir: PathBuf::from(or_default("ARENA_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            refresh_interval: Duration::from_secs(refresh_secs),
            frontend_origins: split_origins(&or_default("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)),
        })
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.backend, Backend::Offline)
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 31113))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
