//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AuthEvent, AuthStateChange, AuthUser, Profile, ProfilePatch, Registration, Session};
pub use repository::{AuthGateway, ProfileRepository};
