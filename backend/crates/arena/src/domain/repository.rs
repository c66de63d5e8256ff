//! Repository Traits
//!
//! Interfaces to the hosted backend tables. Implementations are in the
//! infrastructure layer. Expected absence is `None`/`false`/empty, never an
//! error; the methods never retry.

use kernel::id::{ChallengeId, UserId};

use crate::domain::entities::{Challenge, NewSubmission, Submission};
use crate::error::ArenaResult;

/// Challenge repository trait
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Every challenge, newest first, with the sponsor display name joined
    async fn list_challenges(&self) -> ArenaResult<Vec<Challenge>>;

    /// Challenges owned by one sponsor, newest first
    async fn list_challenges_by_sponsor(&self, sponsor_id: &UserId) -> ArenaResult<Vec<Challenge>>;

    async fn get_challenge(&self, id: &ChallengeId) -> ArenaResult<Option<Challenge>>;

    /// Insert and return the stored record with its backend id
    async fn create_challenge(&self, challenge: &Challenge) -> ArenaResult<Option<Challenge>>;

    /// Overwrite the editable columns; `None` when no row matched
    async fn update_challenge(
        &self,
        id: &ChallengeId,
        challenge: &Challenge,
    ) -> ArenaResult<Option<Challenge>>;

    async fn delete_challenge(&self, id: &ChallengeId) -> ArenaResult<bool>;
}

/// Submission repository trait
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Insert with remote status `submitted`
    async fn create_submission(&self, submission: &NewSubmission) -> ArenaResult<Option<Submission>>;

    /// Newest first, with the builder display name joined
    async fn list_submissions_for_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> ArenaResult<Vec<Submission>>;

    async fn list_submissions_by_builder(&self, builder_id: &UserId) -> ArenaResult<Vec<Submission>>;
}
