//! Arena Error Types
//!
//! This module provides challenge/submission error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::models::UserRole;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::ChallengeId;
use platform::link::LinkError;
use platform::rest::RestError;
use platform::storage::StorageError;
use thiserror::Error;

/// Arena-specific result type alias
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Arena-specific error variants
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Operation needs a signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Signed in, but with the wrong role
    #[error("Only a {0} may perform this operation")]
    RoleNotPermitted(UserRole),

    /// Sponsor tried to change a challenge posted by another sponsor
    #[error("Only the sponsor who posted challenge {0} may change it")]
    NotChallengeOwner(ChallengeId),

    /// Builder tried to submit on behalf of someone else
    #[error("Submissions can only be made for the signed-in builder")]
    ActingAsOtherUser,

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(ChallengeId),

    /// Demo fixtures cannot be edited or deleted
    #[error("Challenge {0} is a built-in fixture and cannot be modified")]
    SeedReadOnly(ChallengeId),

    /// Input rejected before reaching the backend
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid submission link: {0}")]
    InvalidLink(#[from] LinkError),

    /// Backend request failed
    #[error("Arena backend error: {0}")]
    Remote(#[from] RestError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArenaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArenaError::NotAuthenticated => ErrorKind::Unauthorized,
            ArenaError::RoleNotPermitted(_)
            | ArenaError::NotChallengeOwner(_)
            | ArenaError::ActingAsOtherUser => ErrorKind::Forbidden,
            ArenaError::ChallengeNotFound(_) => ErrorKind::NotFound,
            ArenaError::SeedReadOnly(_) => ErrorKind::Conflict,
            ArenaError::Validation(_) | ArenaError::InvalidLink(_) => ErrorKind::BadRequest,
            ArenaError::Remote(e) if e.is_unavailable() => ErrorKind::ServiceUnavailable,
            ArenaError::Remote(_) => ErrorKind::BadGateway,
            ArenaError::Storage(_) | ArenaError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let app = AppError::new(self.kind(), self.to_string());
        match self {
            ArenaError::NotAuthenticated => app.with_action("Sign in to continue"),
            ArenaError::Remote(_) => app.with_action("Try again in a moment"),
            _ => app,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ArenaError::Remote(e) => {
                tracing::error!(error = %e, status = ?e.status(), "Arena backend error");
            }
            ArenaError::Storage(e) => {
                tracing::error!(error = %e, "Arena storage error");
            }
            ArenaError::Internal(msg) => {
                tracing::error!(message = %msg, "Arena internal error");
            }
            ArenaError::RoleNotPermitted(role) => {
                tracing::warn!(required = %role, "Arena operation rejected for role");
            }
            _ => {
                tracing::debug!(error = %self, "Arena error");
            }
        }
    }
}

impl IntoResponse for ArenaError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ArenaError> for AppError {
    fn from(err: ArenaError) -> Self {
        err.to_app_error()
    }
}
