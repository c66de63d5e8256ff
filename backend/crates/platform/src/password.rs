//! Password Policy
//!
//! Checks a sign-up password before it leaves the process. The hosted auth
//! service owns hashing; this module only normalizes (NFKC), bounds the
//! length in code points and keeps the clear text zeroized.

use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Accepted length, counted in code points after normalization
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Password cannot be blank")]
    Blank,

    #[error("Password contains control characters")]
    ControlCharacter,
}

/// Clear text password, wiped from memory on drop
///
/// Not `Clone`; `Debug` is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("Arena#Builder2025".to_string()).unwrap();
/// assert_eq!(password.expose(), "Arena#Builder2025");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize and apply the sign-up policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unchecked(raw);
        password.check()?;
        Ok(password)
    }

    /// Normalize only. Sign-in uses this so older accounts still get in
    pub fn unchecked(mut raw: String) -> Self {
        let normalized = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn check(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        let len = self.0.chars().count();
        if len < *PASSWORD_LENGTH.start() {
            return Err(PasswordPolicyError::TooShort {
                min: *PASSWORD_LENGTH.start(),
            });
        }
        if len > *PASSWORD_LENGTH.end() {
            return Err(PasswordPolicyError::TooLong {
                max: *PASSWORD_LENGTH.end(),
            });
        }
        if self.0.chars().any(char::is_control) {
            return Err(PasswordPolicyError::ControlCharacter);
        }
        Ok(())
    }

    /// The normalized clear text, for the request body only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword(***)")
    }
}
