//! Sponsor authoring: create, update and delete with optimistic apply

use auth::models::UserRole;
use chrono::Utc;
use kernel::id::ChallengeId;

use super::ChallengeCache;
use super::state::Copies;
use crate::application::actor::Actor;
use crate::application::seed::is_seed_id;
use crate::domain::entities::{Challenge, ChallengeDraft, ChallengePatch, UNKNOWN_SPONSOR};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::services::{is_local_id, local_challenge_id};
use crate::error::{ArenaError, ArenaResult};

impl<R> ChallengeCache<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    pub(super) fn require_role(&self, role: UserRole) -> ArenaResult<Actor> {
        Actor::require(&self.session.borrow(), role)
    }

    /// Fixtures are read-only; other records may only be changed by their sponsor
    fn check_editable(&self, actor: &Actor, id: &ChallengeId) -> ArenaResult<()> {
        if is_seed_id(id) {
            return Err(ArenaError::SeedReadOnly(id.clone()));
        }

        let state = self.state.borrow();
        let record = state
            .find_any(id)
            .ok_or_else(|| ArenaError::ChallengeNotFound(id.clone()))?;
        match &record.sponsor_id {
            Some(owner) if owner != &actor.id => Err(ArenaError::NotChallengeOwner(id.clone())),
            _ => Ok(()),
        }
    }

    /// Add a challenge under a local id, then persist it remotely
    ///
    /// The local record becomes visible in `all` and `created` at once. When
    /// the backend accepts it the record is re-keyed to the backend id; when
    /// it refuses, the record is removed again and the error returned.
    pub async fn create_challenge(&self, draft: ChallengeDraft) -> ArenaResult<Challenge> {
        let actor = self.require_role(UserRole::Sponsor)?;
        draft.validate()?;

        let sponsor_name = actor
            .display_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_SPONSOR.to_string());
        let now = Utc::now().timestamp_millis();

        // Id is assigned inside the transition so concurrent creates cannot collide
        let mut challenge = draft.into_challenge(ChallengeId::from(""), actor.id.clone(), sponsor_name);
        self.state.send_modify(|state| {
            challenge.id = local_challenge_id(now, |id| state.knows(id));
            state.insert_created(challenge.clone());
        });
        tracing::info!(challenge_id = %challenge.id, sponsor_id = %actor.id, "Created challenge");

        if !self.config.persist_created_remotely {
            return Ok(challenge);
        }

        let stored = match self.repo.create_challenge(&challenge).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                self.discard_local(&challenge.id);
                return Err(ArenaError::Internal(
                    "Backend returned no row for the new challenge".to_string(),
                ));
            }
            Err(e) => {
                tracing::warn!(challenge_id = %challenge.id, error = %e, "Remote create failed, rolling back");
                self.discard_local(&challenge.id);
                return Err(e);
            }
        };

        let local_id = challenge.id.clone();
        let mut accepted_changed = false;
        self.state.send_modify(|state| {
            // Edits made while the request ran are kept; only the id changes
            if let Some(current) = state.find_any(&local_id) {
                challenge = Challenge {
                    id: stored.id.clone(),
                    ..current.clone()
                };
                accepted_changed = state.rekey(&local_id, &challenge);
            }
        });
        if accepted_changed {
            self.persist_accepted();
        }

        tracing::debug!(local_id = %local_id, challenge_id = %stored.id, "Reconciled challenge id");
        Ok(challenge)
    }

    fn discard_local(&self, id: &ChallengeId) {
        let mut copies = Copies::default();
        self.state.send_modify(|state| copies = state.remove_everywhere(id));
        if copies.in_accepted() {
            self.persist_accepted();
        }
    }

    /// Merge `patch` into the challenge everywhere it is held
    ///
    /// Applied locally first; a backend failure restores the previous copies.
    pub async fn update_challenge(
        &self,
        id: &ChallengeId,
        patch: ChallengePatch,
    ) -> ArenaResult<Challenge> {
        let actor = self.require_role(UserRole::Sponsor)?;
        patch.validate()?;
        self.check_editable(&actor, id)?;

        let mut copies = Copies::default();
        let mut merged = None;
        self.state.send_if_modified(|state| {
            copies = state.copies(id);
            let Some(existing) = copies.record() else {
                return false;
            };
            let next = patch.apply_to(existing);
            state.replace_everywhere(&next);
            merged = Some(next);
            true
        });
        let Some(merged) = merged else {
            return Err(ArenaError::ChallengeNotFound(id.clone()));
        };
        let touches_accepted = copies.in_accepted();
        if touches_accepted {
            self.persist_accepted();
        }

        if is_local_id(id) {
            tracing::info!(challenge_id = %id, "Updated local challenge");
            return Ok(merged);
        }

        let canonical = match self.repo.update_challenge(id, &merged).await {
            Ok(Some(canonical)) => canonical,
            Ok(None) => {
                self.rollback(copies, touches_accepted);
                return Err(ArenaError::ChallengeNotFound(id.clone()));
            }
            Err(e) => {
                tracing::warn!(challenge_id = %id, error = %e, "Remote update failed, rolling back");
                self.rollback(copies, touches_accepted);
                return Err(e);
            }
        };

        let mut updated = canonical;
        self.state.send_modify(|state| {
            // The update response has no joins; keep what only the cache knows
            let current = state.find_any(id).unwrap_or(&merged);
            updated.submissions = current.submissions.clone();
            if updated.sponsor_display_name == UNKNOWN_SPONSOR {
                updated.sponsor_display_name = current.sponsor_display_name.clone();
            }
            state.replace_everywhere(&updated);
        });
        if touches_accepted {
            self.persist_accepted();
        }

        tracing::info!(challenge_id = %id, "Updated challenge");
        Ok(updated)
    }

    /// Remove the challenge from all three collections
    ///
    /// Returns `Ok(false)` when the backend reported nothing deleted; the
    /// local copies are restored in that case and on error.
    pub async fn delete_challenge(&self, id: &ChallengeId) -> ArenaResult<bool> {
        let actor = self.require_role(UserRole::Sponsor)?;
        self.check_editable(&actor, id)?;

        let mut copies = Copies::default();
        self.state.send_if_modified(|state| {
            copies = state.remove_everywhere(id);
            !copies.is_empty()
        });
        if copies.is_empty() {
            return Err(ArenaError::ChallengeNotFound(id.clone()));
        }
        let touches_accepted = copies.in_accepted();
        if touches_accepted {
            self.persist_accepted();
        }

        if is_local_id(id) {
            tracing::info!(challenge_id = %id, "Deleted local challenge");
            return Ok(true);
        }

        match self.repo.delete_challenge(id).await {
            Ok(true) => {
                // A refresh during the request may have merged it back
                self.state
                    .send_if_modified(|state| !state.remove_everywhere(id).is_empty());
                tracing::info!(challenge_id = %id, "Deleted challenge");
                Ok(true)
            }
            Ok(false) => {
                tracing::warn!(challenge_id = %id, "Backend deleted nothing, restoring challenge");
                self.rollback(copies, touches_accepted);
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(challenge_id = %id, error = %e, "Remote delete failed, restoring challenge");
                self.rollback(copies, touches_accepted);
                Err(e)
            }
        }
    }

    fn rollback(&self, copies: Copies, touches_accepted: bool) {
        self.state.send_modify(|state| state.restore(copies));
        if touches_accepted {
            self.persist_accepted();
        }
    }
}
