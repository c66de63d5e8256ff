//! Auth (Identity) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the session store
//! - `infra/` - Hosted backend client and in-memory double
//! - `presentation/` - Access gate, HTTP handlers, DTOs, router
//!
//! ## Features
//! - Email + password sign up / sign in against the hosted auth service
//! - Builder and Sponsor roles, carried in sign-up metadata and the profile row
//! - Session persistence across restarts with refresh before expiry
//! - Reactive session state (`watch`) fed by backend auth events
//! - Access gate deciding allow / redirect / loading per route

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_store::{ProfileState, SessionHandle, SessionState, SessionStore};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAuthRepository, SupabaseAuthRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::{
        display_name::DisplayName, email::Email, user_role::UserRole,
    };
    pub use crate::presentation::dto::*;
}

pub mod gate {
    pub use crate::presentation::gate::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
