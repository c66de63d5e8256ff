//! Builder submissions and the submission ledger

use auth::models::UserRole;
use kernel::id::{ChallengeId, UserId};
use platform::link::parse_http_link;

use super::ChallengeCache;
use crate::domain::entities::{NewSubmission, Submission, UNKNOWN_USER};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::error::{ArenaError, ArenaResult};

/// A builder's solution for a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSolutionInput {
    pub challenge_id: ChallengeId,
    pub builder_id: UserId,
    pub builder_name: String,
    pub link: String,
}

impl<R> ChallengeCache<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    /// Record a submission remotely, then in the ledger and on the challenge
    ///
    /// The link is validated before anything is written. Submitting again
    /// for the same challenge appends; the latest entry is the current one.
    pub async fn submit_challenge(&self, input: SubmitSolutionInput) -> ArenaResult<Submission> {
        let actor = self.require_role(UserRole::Builder)?;
        if actor.id != input.builder_id {
            return Err(ArenaError::ActingAsOtherUser);
        }

        let link = parse_http_link(&input.link)?;
        if self.get_challenge_by_id(&input.challenge_id).is_none() {
            return Err(ArenaError::ChallengeNotFound(input.challenge_id));
        }

        let builder_name = Some(input.builder_name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or(actor.display_name)
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let new = NewSubmission {
            challenge_id: input.challenge_id,
            builder_id: input.builder_id,
            builder_display_name: builder_name,
            project_link: link.to_string(),
        };

        let mut submission = self
            .repo
            .create_submission(&new)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    challenge_id = %new.challenge_id,
                    builder_id = %new.builder_id,
                    error = %e,
                    "Failed to record submission"
                );
            })?
            .ok_or_else(|| ArenaError::Internal("Backend returned no row for the submission".to_string()))?;
        // Insert responses carry no profile join
        submission.builder_display_name = new.builder_display_name;

        self.state
            .send_modify(|state| state.attach_submission(&submission));

        tracing::info!(
            submission_id = %submission.id,
            challenge_id = %submission.challenge_id,
            builder_id = %submission.builder_id,
            "Submitted solution"
        );
        Ok(submission)
    }

    /// Read-through; failures degrade to an empty list
    pub async fn get_submissions_for_challenge(&self, challenge_id: &ChallengeId) -> Vec<Submission> {
        match self.repo.list_submissions_for_challenge(challenge_id).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::warn!(challenge_id = %challenge_id, error = %e, "Failed to fetch challenge submissions");
                Vec::new()
            }
        }
    }

    /// Read-through; failures degrade to an empty list
    pub async fn get_user_submissions(&self, builder_id: &UserId) -> Vec<Submission> {
        let mut submissions = match self.repo.list_submissions_by_builder(builder_id).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::warn!(builder_id = %builder_id, error = %e, "Failed to fetch builder submissions");
                return Vec::new();
            }
        };

        // Own submissions show the signed-in name when the join came back empty
        if let Some(actor) = self.actor().filter(|a| &a.id == builder_id) {
            if let Some(name) = actor.display_name {
                for submission in &mut submissions {
                    if submission.builder_display_name == UNKNOWN_USER {
                        submission.builder_display_name = name.clone();
                    }
                }
            }
        }
        submissions
    }

    /// Latest ledger entry for the pair
    pub fn current_submission(
        &self,
        challenge_id: &ChallengeId,
        builder_id: &UserId,
    ) -> Option<Submission> {
        self.state
            .borrow()
            .current_submission(challenge_id, builder_id)
            .cloned()
    }

    /// Every submission made through this cache, oldest first
    pub fn submissions(&self) -> Vec<Submission> {
        self.state.borrow().submissions.clone()
    }
}
