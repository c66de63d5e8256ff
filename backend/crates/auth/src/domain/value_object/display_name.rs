//! Display Name Value Object
//!
//! The human-readable name shown on challenges (sponsor) and submissions
//! (builder). Stored remotely as `profiles.full_name` and sent as the
//! `full_name` sign-up metadata.
//!
//! ## Invariants
//! - NFKC normalized, trimmed, inner whitespace runs collapsed to one space
//! - 1..=80 characters (code points) after normalization
//! - No control characters

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameError {
    Empty,
    TooLong { length: usize, max: usize },
    ControlCharacter,
}

impl fmt::Display for DisplayNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Display name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Display name is too long ({length} chars, maximum {max})")
            }
            Self::ControlCharacter => write!(f, "Display name cannot contain control characters"),
        }
    }
}

impl std::error::Error for DisplayNameError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized: String = input.as_ref().nfkc().collect();

        if normalized.chars().any(char::is_control) {
            return Err(DisplayNameError::ControlCharacter);
        }

        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = collapsed.chars().count();
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }

        Ok(Self(collapsed))
    }

    /// Wrap a name read back from the backend without re-validating
    pub fn from_trusted(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
