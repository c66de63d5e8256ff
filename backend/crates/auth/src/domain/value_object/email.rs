//! Email Value Object
//!
//! Sign-up and sign-in identifier. Format checks only; ownership is proven
//! by the hosted backend's confirmation mail.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Lower-cased, trimmed email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(raw: &str) -> AppResult<Self> {
        let email = raw.trim().to_lowercase();
        match shape_problem(&email) {
            Some(problem) => Err(AppError::bad_request(problem)
                .with_action("Enter an address like name@company.com")),
            None => Ok(Self(email)),
        }
    }

    /// Wrap an address the backend already accepted
    pub fn from_trusted(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after `@`, logged on sign-up instead of the full address
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

/// First reason `email` is not a usable address, if any
fn shape_problem(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("Email is required");
    }
    if email.len() > MAX_LEN {
        return Some("Email is too long");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Some("Email must contain @");
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN || local.contains(char::is_whitespace) {
        return Some("Email has an invalid name before @");
    }
    let labels_ok = domain.split('.').count() > 1
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !labels_ok {
        return Some("Email has an invalid domain");
    }
    None
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
