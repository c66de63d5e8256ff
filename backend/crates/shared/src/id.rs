//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.
//!
//! Identifiers are opaque strings. Backend rows carry UUIDs, demo fixtures
//! carry short numeric ids (`"1"`, `"2"`) and locally created challenges carry
//! a `local-<millis>` tag until the backend assigns the real one.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type ChallengeId = Id<markers::Challenge>;
/// let id = ChallengeId::from("local-1718000000000");
/// assert_eq!(id.as_str(), "local-1718000000000");
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Id<T> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_string(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier string
    pub fn from_string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Whether the id parses as a UUID (i.e. was assigned by the backend)
    pub fn is_uuid(&self) -> bool {
        Uuid::parse_str(&self.value).is_ok()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::from_string(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_string(uuid.to_string())
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for user (auth identity / profile) IDs
    pub struct User;

    /// Marker for Challenge IDs
    pub struct Challenge;

    /// Marker for Submission IDs
    pub struct Submission;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type ChallengeId = Id<markers::Challenge>;
pub type SubmissionId = Id<markers::Submission>;
