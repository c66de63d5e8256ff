//! Arena Backend Module
//!
//! Challenge/Submission Cache for the EliteArena marketplace.
//!
//! Clean Architecture structure:
//! - `domain/` - Challenges, submissions, merge rules, repository traits
//! - `application/` - The reactive cache, seed fixtures, acting user
//! - `infra/` - Hosted-backend and in-memory repositories
//! - `presentation/` - HTTP handlers behind the access gate
//!
//! ## Consistency Model
//! - The remote collection is merged additively; nothing is updated or removed by a refresh
//! - Seed challenges are always present and read-only
//! - Sponsor writes apply locally first and roll back when the backend refuses
//! - Accepted challenges survive restarts through durable key-value storage

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::cache::{CacheHandle, CacheState, ChallengeCache, SubmitSolutionInput};
pub use application::config::CacheConfig;
pub use error::{ArenaError, ArenaResult};
pub use infra::{MemoryArenaRepository, SupabaseArenaRepository};
pub use presentation::router::arena_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
