//! Environment Configuration Helpers
//!
//! Thin typed accessors over `std::env`, shared by the composition root.

use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{0} must be set in environment")]
    Missing(String),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

/// Required variable; empty counts as missing
pub fn require(name: &str) -> Result<String, EnvError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}

/// Optional variable with a default
pub fn or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Optional variable parsed into `T`, falling back to `default` when unset
pub fn parse_or<T>(name: &str, default: T) -> Result<T, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| EnvError::Invalid {
                name: name.to_string(),
                value,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}

/// `1`, `true`, `yes`, `on` (any case) are true; unset is `default`
pub fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
