//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rest::RestError;
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email/password pair
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Account exists but the confirmation mail was not followed yet
    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    /// Sign-up with an email that already has an account
    #[error("User already registered")]
    UserAlreadyRegistered,

    /// Operation needs a signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Input rejected before reaching the backend
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backend request failed
    #[error("Auth backend error: {0}")]
    Remote(#[from] RestError),

    /// Persisted session could not be written or removed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
            AuthError::EmailNotConfirmed => ErrorKind::Forbidden,
            AuthError::UserAlreadyRegistered => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Remote(e) if e.is_unavailable() => ErrorKind::ServiceUnavailable,
            AuthError::Remote(_) => ErrorKind::BadGateway,
            AuthError::Storage(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let app = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::EmailNotConfirmed => {
                app.with_action("Follow the link in the confirmation email, then sign in again")
            }
            AuthError::NotAuthenticated => app.with_action("Sign in to continue"),
            _ => app,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Remote(e) => {
                tracing::error!(error = %e, status = ?e.status(), "Auth backend error");
            }
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Session storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<crate::domain::value_object::display_name::DisplayNameError> for AuthError {
    fn from(err: crate::domain::value_object::display_name::DisplayNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::link::LinkError> for AuthError {
    fn from(err: platform::link::LinkError) -> Self {
        AuthError::Validation(err.to_string())
    }
}
