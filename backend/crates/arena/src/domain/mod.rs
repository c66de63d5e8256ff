//! Domain Layer
//!
//! Contains entities, value objects, domain services, and repository traits.

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

// Re-exports
pub use entities::{Challenge, ChallengeDraft, ChallengePatch, NewSubmission, Resource, Submission};
pub use repository::{ChallengeRepository, SubmissionRepository};
pub use value_objects::{ChallengeStatus, Difficulty, SubmissionStatus};
