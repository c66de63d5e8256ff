//! Cache State
//!
//! The snapshot published through the cache's `watch` channel. Helpers here
//! mutate several collections at once; callers run them inside a single
//! `send_modify` so observers only ever see whole transitions.

use kernel::id::{ChallengeId, UserId};
use serde::Serialize;

use crate::application::seed::seed_challenges;
use crate::domain::entities::{Challenge, Submission};
use crate::domain::services::{latest_submission, replace_by_id, restore_at, take_by_id};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheState {
    /// Seed floor + remote + local, unique by id
    pub all_challenges: Vec<Challenge>,
    /// Authored by the signed-in sponsor
    pub created_challenges: Vec<Challenge>,
    /// The builder's bookmarks, persisted
    pub accepted_challenges: Vec<Challenge>,
    /// Submissions made through this cache, in order
    pub submissions: Vec<Submission>,
    /// Initial remote load still running
    pub loading: bool,
}

impl CacheState {
    pub fn new(accepted: Vec<Challenge>) -> Self {
        let mut accepted_challenges: Vec<Challenge> = Vec::with_capacity(accepted.len());
        for challenge in accepted {
            if !accepted_challenges.iter().any(|c| c.id == challenge.id) {
                accepted_challenges.push(challenge);
            }
        }

        Self {
            all_challenges: seed_challenges(),
            created_challenges: Vec::new(),
            accepted_challenges,
            submissions: Vec::new(),
            loading: true,
        }
    }

    pub fn challenge(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.all_challenges.iter().find(|c| &c.id == id)
    }

    /// Lookup across all three collections
    pub fn find_any(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.all_challenges
            .iter()
            .chain(&self.created_challenges)
            .chain(&self.accepted_challenges)
            .find(|c| &c.id == id)
    }

    pub fn is_accepted(&self, id: &ChallengeId) -> bool {
        self.accepted_challenges.iter().any(|c| &c.id == id)
    }

    /// Whether any collection holds the id
    pub fn knows(&self, id: &ChallengeId) -> bool {
        self.find_any(id).is_some()
    }

    pub fn current_submission(
        &self,
        challenge_id: &ChallengeId,
        builder_id: &UserId,
    ) -> Option<&Submission> {
        latest_submission(&self.submissions, challenge_id, builder_id)
    }

    pub(crate) fn insert_created(&mut self, challenge: Challenge) {
        self.created_challenges.push(challenge.clone());
        self.all_challenges.push(challenge);
    }

    /// Capture every copy of `id` with its position
    pub(crate) fn copies(&self, id: &ChallengeId) -> Copies {
        let find = |list: &[Challenge]| {
            list.iter()
                .position(|c| &c.id == id)
                .map(|index| (index, list[index].clone()))
        };
        Copies {
            all: find(&self.all_challenges),
            created: find(&self.created_challenges),
            accepted: find(&self.accepted_challenges),
        }
    }

    /// Replace `challenge.id` wherever it is held; returns whether accepted changed
    pub(crate) fn replace_everywhere(&mut self, challenge: &Challenge) -> bool {
        replace_by_id(&mut self.all_challenges, challenge);
        replace_by_id(&mut self.created_challenges, challenge);
        replace_by_id(&mut self.accepted_challenges, challenge)
    }

    /// Swap the record held under `old_id` for `challenge` (id reconciliation)
    ///
    /// Where the new id is already present (a refresh merged it first) the
    /// old entry is dropped instead, keeping ids unique.
    pub(crate) fn rekey(&mut self, old_id: &ChallengeId, challenge: &Challenge) -> bool {
        let mut accepted = false;
        for (list, is_accepted) in [
            (&mut self.all_challenges, false),
            (&mut self.created_challenges, false),
            (&mut self.accepted_challenges, true),
        ] {
            let Some(index) = list.iter().position(|c| &c.id == old_id) else {
                continue;
            };
            if list.iter().any(|c| c.id == challenge.id) {
                list.remove(index);
                replace_by_id(list, challenge);
            } else {
                list[index] = challenge.clone();
            }
            accepted |= is_accepted;
        }
        accepted
    }

    pub(crate) fn remove_everywhere(&mut self, id: &ChallengeId) -> Copies {
        Copies {
            all: take_by_id(&mut self.all_challenges, id),
            created: take_by_id(&mut self.created_challenges, id),
            accepted: take_by_id(&mut self.accepted_challenges, id),
        }
    }

    /// Put captured copies back, replacing or re-inserting at their positions
    pub(crate) fn restore(&mut self, copies: Copies) {
        for (list, copy) in [
            (&mut self.all_challenges, copies.all),
            (&mut self.created_challenges, copies.created),
            (&mut self.accepted_challenges, copies.accepted),
        ] {
            if let Some((index, challenge)) = copy {
                if !replace_by_id(list, &challenge) {
                    restore_at(list, index, challenge);
                }
            }
        }
    }

    /// Append to the ledger and to the challenge's embedded list in all + created
    pub(crate) fn attach_submission(&mut self, submission: &Submission) {
        self.submissions.push(submission.clone());
        for list in [&mut self.all_challenges, &mut self.created_challenges] {
            if let Some(challenge) = list.iter_mut().find(|c| c.id == submission.challenge_id) {
                challenge.submissions.push(submission.clone());
            }
        }
    }

    /// Drop per-user data after sign-out
    pub(crate) fn clear_user_data(&mut self) {
        self.accepted_challenges.clear();
        self.created_challenges.clear();
    }
}

/// Positions and contents of one record across the collections
#[derive(Debug, Clone, Default)]
pub(crate) struct Copies {
    pub(crate) all: Option<(usize, Challenge)>,
    pub(crate) created: Option<(usize, Challenge)>,
    pub(crate) accepted: Option<(usize, Challenge)>,
}

impl Copies {
    pub(crate) fn is_empty(&self) -> bool {
        self.all.is_none() && self.created.is_none() && self.accepted.is_none()
    }

    pub(crate) fn in_accepted(&self) -> bool {
        self.accepted.is_some()
    }

    /// The freshest copy, preferring the merged collection
    pub(crate) fn record(&self) -> Option<&Challenge> {
        self.all
            .as_ref()
            .or(self.created.as_ref())
            .or(self.accepted.as_ref())
            .map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(id: &str) -> Challenge {
        let mut c = seed_challenges().remove(1);
        c.id = ChallengeId::from(id);
        c
    }

    #[test]
    fn test_new_state_has_seed_floor_and_dedupes_accepted() {
        let state = CacheState::new(vec![challenge("9"), challenge("9")]);
        assert!(state.challenge(&ChallengeId::from("1")).is_some());
        assert!(state.challenge(&ChallengeId::from("2")).is_some());
        assert_eq!(state.accepted_challenges.len(), 1);
        assert!(state.loading);
    }

    #[test]
    fn test_remove_and_restore_roundtrip() {
        let mut state = CacheState::new(vec![challenge("c")]);
        state.insert_created(challenge("c"));
        let before = state.clone();

        let copies = state.remove_everywhere(&ChallengeId::from("c"));
        assert!(copies.in_accepted());
        assert!(!state.knows(&ChallengeId::from("c")));

        state.restore(copies);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rekey_replaces_local_id() {
        let mut state = CacheState::new(vec![]);
        state.insert_created(challenge("local-1"));
        state.accepted_challenges.push(challenge("local-1"));

        let accepted_changed = state.rekey(&ChallengeId::from("local-1"), &challenge("uuid-1"));
        assert!(accepted_changed);
        assert!(!state.knows(&ChallengeId::from("local-1")));
        assert!(state.is_accepted(&ChallengeId::from("uuid-1")));
        assert_eq!(state.created_challenges[0].id.as_str(), "uuid-1");
    }

    #[test]
    fn test_rekey_when_refresh_already_merged_backend_id() {
        let mut state = CacheState::new(vec![]);
        state.insert_created(challenge("local-1"));
        state.all_challenges.push(challenge("uuid-1"));

        state.rekey(&ChallengeId::from("local-1"), &challenge("uuid-1"));
        let count = state
            .all_challenges
            .iter()
            .filter(|c| c.id.as_str() == "uuid-1")
            .count();
        assert_eq!(count, 1);
        assert!(!state.knows(&ChallengeId::from("local-1")));
    }

    #[test]
    fn test_empty_copies() {
        let state = CacheState::new(vec![]);
        let copies = state.copies(&ChallengeId::from("nope"));
        assert!(copies.is_empty());
        assert!(copies.record().is_none());
    }
}
