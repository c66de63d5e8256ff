//! Profile Entity
//!
//! The marketplace-facing identity of a user. Created by the backend at
//! sign-up, patched by the owner, never deleted from the client.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: Email,
    pub display_name: DisplayName,
    pub role: UserRole,
    pub portfolio_link: Option<String>,
    pub company_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update
///
/// Outer `None` leaves a field unchanged; `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub display_name: Option<DisplayName>,
    pub portfolio_link: Option<Option<String>>,
    pub company_name: Option<Option<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.portfolio_link.is_none() && self.company_name.is_none()
    }

    /// Apply in place and stamp `updated_at`
    pub fn apply_to(&self, profile: &mut Profile, now: DateTime<Utc>) {
        if let Some(name) = &self.display_name {
            profile.display_name = name.clone();
        }
        if let Some(link) = &self.portfolio_link {
            profile.portfolio_link = link.clone();
        }
        if let Some(company) = &self.company_name {
            profile.company_name = company.clone();
        }
        profile.updated_at = now;
    }
}
