//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::session_store::{ProfileState, SessionState};
use crate::domain::entity::{AuthUser, Profile};
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    /// False when the email still has to be confirmed
    pub signed_in: bool,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Option<UserRole>,
}

impl From<&AuthUser> for UserResponse {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub portfolio_link: Option<String>,
    pub company_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email.to_string(),
            full_name: profile.display_name.to_string(),
            role: profile.role,
            portfolio_link: profile.portfolio_link.clone(),
            company_name: profile.company_name.clone(),
            updated_at: profile.updated_at,
        }
    }
}

/// Profile update request; omitted fields stay unchanged, `""` clears
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub portfolio_link: Option<String>,
    pub company_name: Option<String>,
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Initializing,
    Anonymous,
    Authenticated,
}

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub status: SessionStatus,
    pub loading: bool,
    pub role: Option<UserRole>,
    pub user: Option<UserResponse>,
    pub profile: Option<ProfileResponse>,
}

impl From<&SessionState> for SessionResponse {
    fn from(state: &SessionState) -> Self {
        let status = match state {
            SessionState::Initializing => SessionStatus::Initializing,
            SessionState::Anonymous => SessionStatus::Anonymous,
            SessionState::Authenticated { .. } => SessionStatus::Authenticated,
        };
        let profile = match state {
            SessionState::Authenticated {
                profile: ProfileState::Loaded(profile),
                ..
            } => Some(ProfileResponse::from(profile)),
            _ => None,
        };

        Self {
            status,
            loading: state.is_loading(),
            role: state.role(),
            user: state.user().map(UserResponse::from),
            profile,
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateQuery {
    pub path: String,
}
