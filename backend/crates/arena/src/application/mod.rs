//! Application Layer
//!
//! The challenge cache and the pieces it is built from.

pub mod actor;
pub mod cache;
pub mod config;
pub mod seed;

// Re-exports
pub use actor::Actor;
pub use cache::{CacheHandle, CacheState, ChallengeCache, SubmitSolutionInput};
pub use config::CacheConfig;
pub use seed::seed_challenges;
