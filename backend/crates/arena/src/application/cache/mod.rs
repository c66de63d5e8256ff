//! Challenge/Submission Cache
//!
//! One reactive view over three origins of challenge data: the built-in
//! seed challenges, the hosted backend, and records created locally. Also
//! owns the builder's accepted set (persisted) and the submission ledger.
//!
//! Every local change is one `send_modify` on the state channel. Remote
//! calls happen outside it; writes apply optimistically first and roll back
//! with a second transition when the backend refuses them.
//!
//! Background work, owned by [`CacheHandle`]:
//! - refresh ticker: initial load, then an additive merge every
//!   `refresh_interval` (new ids appended, nothing updated or removed)
//! - session watcher: loads the sponsor's own challenges when the user
//!   changes, clears per-user data on sign-out

mod authoring;
mod state;
mod submissions;

pub use state::CacheState;
pub use submissions::SubmitSolutionInput;

use std::sync::{Arc, Mutex};

use auth::SessionState;
use kernel::id::{ChallengeId, UserId};
use platform::storage::{KeyValueStore, load_json_or_default, save_json};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::application::actor::Actor;
use crate::application::config::CacheConfig;
use crate::domain::entities::Challenge;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::services::{is_local_id, merge_additive};
use crate::error::{ArenaError, ArenaResult};

/// Background tasks; dropping the handle stops refresh and session sync
#[derive(Debug)]
pub struct CacheHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for CacheHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

pub struct ChallengeCache<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    storage: Arc<dyn KeyValueStore>,
    session: watch::Receiver<SessionState>,
    config: Arc<CacheConfig>,
    state: watch::Sender<CacheState>,
    /// Held across snapshot-and-write of the accepted set
    persist_lock: Mutex<()>,
}

impl<R> ChallengeCache<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    /// Restore accepted challenges from storage; corrupt data yields an empty set
    pub fn new(
        repo: Arc<R>,
        storage: Arc<dyn KeyValueStore>,
        session: watch::Receiver<SessionState>,
        config: CacheConfig,
    ) -> Arc<Self> {
        let accepted: Vec<Challenge> =
            load_json_or_default(storage.as_ref(), &config.accepted_storage_key);
        tracing::debug!(accepted = accepted.len(), "Restored accepted challenges");

        let (state, _) = watch::channel(CacheState::new(accepted));
        Arc::new(Self {
            repo,
            storage,
            session,
            config: Arc::new(config),
            state,
            persist_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn start(self: &Arc<Self>) -> CacheHandle {
        let period = self.config.refresh_interval;

        let refresher = Arc::clone(self);
        let refresh_task = tokio::spawn(async move {
            refresher.initial_load().await;

            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                refresher.refresh().await;
            }
        });

        let watcher = Arc::clone(self);
        let session_task = tokio::spawn(async move { watcher.watch_session().await });

        CacheHandle {
            tasks: vec![refresh_task, session_task],
        }
    }

    // ------------------------------------------------------------------------
    // Synchronization
    // ------------------------------------------------------------------------

    async fn initial_load(&self) {
        let remote = match self.repo.list_challenges().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "Initial challenge load failed, showing seed data");
                Vec::new()
            }
        };

        let mut added = 0;
        self.state.send_modify(|state| {
            state.loading = false;
            added = merge_additive(&mut state.all_challenges, remote);
        });
        tracing::info!(added, "Loaded remote challenges");
    }

    /// One additive merge cycle; returns the number of new challenges
    pub async fn refresh(&self) -> usize {
        let remote = match self.repo.list_challenges().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "Challenge refresh failed");
                return 0;
            }
        };

        let mut added = 0;
        self.state.send_if_modified(|state| {
            added = merge_additive(&mut state.all_challenges, remote);
            added > 0
        });

        if added > 0 {
            tracing::info!(added, "Found new challenges");
        }
        added
    }

    async fn watch_session(&self) {
        let mut session = self.session.clone();
        let mut current = session.borrow_and_update().user_id().cloned();
        if let Some(user_id) = &current {
            self.load_created(user_id).await;
        }

        while session.changed().await.is_ok() {
            let next = session.borrow_and_update().user_id().cloned();
            if next == current {
                continue;
            }

            let previous = std::mem::replace(&mut current, next.clone());
            if let Some(previous) = previous {
                self.clear_user_data(&previous);
            }
            if let Some(user_id) = &next {
                self.load_created(user_id).await;
            }
        }

        tracing::debug!("Session channel closed, stopping session sync");
    }

    /// Replace the created set with the sponsor's remote challenges
    async fn load_created(&self, sponsor_id: &UserId) {
        let remote = match self.repo.list_challenges_by_sponsor(sponsor_id).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(sponsor_id = %sponsor_id, error = %e, "Failed to load created challenges");
                return;
            }
        };

        let landed = self.state.send_if_modified(|state| {
            // Signed out or switched user while the request ran
            if self.session.borrow().user_id() != Some(sponsor_id) {
                return false;
            }

            let mut created = remote;
            for challenge in &mut created {
                // The sponsor listing has no name join; prefer the merged copy
                if let Some(known) = state.challenge(&challenge.id) {
                    challenge.sponsor_display_name = known.sponsor_display_name.clone();
                }
            }

            // Records still waiting for their backend id stay
            let pending: Vec<Challenge> = state
                .created_challenges
                .iter()
                .filter(|c| is_local_id(&c.id))
                .cloned()
                .collect();
            merge_additive(&mut created, pending);

            merge_additive(&mut state.all_challenges, created.iter().cloned());
            state.created_challenges = created;
            true
        });

        if landed {
            tracing::debug!(sponsor_id = %sponsor_id, "Loaded created challenges");
        }
    }

    fn clear_user_data(&self, previous: &UserId) {
        self.state.send_modify(CacheState::clear_user_data);
        let _guard = self.lock_persist();
        if let Err(e) = self.storage.remove(&self.config.accepted_storage_key) {
            tracing::warn!(error = %e, "Failed to remove stored accepted challenges");
        }
        tracing::info!(user_id = %previous, "Cleared per-user challenge data");
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn lock_persist(&self) -> std::sync::MutexGuard<'_, ()> {
        self.persist_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write the accepted set; failures are logged and otherwise ignored
    ///
    /// The snapshot is read under the persist lock, so the last write always
    /// carries the newest set.
    fn persist_accepted(&self) {
        let _guard = self.lock_persist();
        let accepted = self.state.borrow().accepted_challenges.clone();
        if let Err(e) = save_json(
            self.storage.as_ref(),
            &self.config.accepted_storage_key,
            &accepted,
        ) {
            tracing::warn!(error = %e, "Failed to persist accepted challenges");
        }
    }

    /// The signed-in user, if any
    pub fn actor(&self) -> Option<Actor> {
        Actor::from_session(&self.session.borrow())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> CacheState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.state.subscribe()
    }

    pub fn all_challenges(&self) -> Vec<Challenge> {
        self.state.borrow().all_challenges.clone()
    }

    pub fn created_challenges(&self) -> Vec<Challenge> {
        self.state.borrow().created_challenges.clone()
    }

    pub fn accepted_challenges(&self) -> Vec<Challenge> {
        self.state.borrow().accepted_challenges.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Wait for the initial remote load to finish
    pub async fn loaded(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|state| !state.loading).await;
    }

    pub fn get_challenge_by_id(&self, id: &ChallengeId) -> Option<Challenge> {
        self.state.borrow().challenge(id).cloned()
    }

    pub fn is_accepted(&self, id: &ChallengeId) -> bool {
        self.state.borrow().is_accepted(id)
    }

    // ------------------------------------------------------------------------
    // Accepted challenges
    // ------------------------------------------------------------------------

    /// Idempotent; returns whether the challenge was newly added
    pub fn add_challenge(&self, challenge: Challenge) -> bool {
        let id = challenge.id.clone();
        let added = self.state.send_if_modified(|state| {
            if state.is_accepted(&challenge.id) {
                return false;
            }
            state.accepted_challenges.push(challenge);
            true
        });

        if added {
            tracing::info!(challenge_id = %id, "Accepted challenge");
            self.persist_accepted();
        }
        added
    }

    /// Idempotent; returns whether anything was removed
    pub fn remove_challenge(&self, id: &ChallengeId) -> bool {
        let removed = self.state.send_if_modified(|state| {
            let before = state.accepted_challenges.len();
            state.accepted_challenges.retain(|c| &c.id != id);
            state.accepted_challenges.len() != before
        });

        if removed {
            tracing::info!(challenge_id = %id, "Removed accepted challenge");
            self.persist_accepted();
        }
        removed
    }

    /// Accept a challenge known to the merged collection
    pub fn accept_by_id(&self, id: &ChallengeId) -> ArenaResult<bool> {
        let challenge = self
            .get_challenge_by_id(id)
            .ok_or_else(|| ArenaError::ChallengeNotFound(id.clone()))?;
        Ok(self.add_challenge(challenge))
    }
}
