//! Session/Identity Store
//!
//! Tracks who is signed in and their cached profile.
//!
//! ```text
//! Initializing ──► Anonymous ◄──────────────┐
//!      │                │ sign in / event   │ sign out / event
//!      └────────────────┴──► Authenticated ─┘
//!                             profile: Loading → Loaded | Missing
//! ```
//!
//! State lives in a `watch` channel; each transition is one `send_*` call,
//! so observers never see a half-applied change. Profile fetches run in
//! their own task and only land if the same user is still signed in.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::update_profile::{UpdateProfileInput, UpdateProfileUseCase};
use crate::domain::entity::{AuthStateChange, AuthUser, Profile};
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    Loading,
    Loaded(Profile),
    /// No row, or the fetch failed
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Anonymous,
    Authenticated { user: AuthUser, profile: ProfileState },
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Authenticated {
                profile: ProfileState::Loaded(profile),
                ..
            } => Some(profile),
            _ => None,
        }
    }

    /// Session or profile resolution still in flight
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SessionState::Initializing
                | SessionState::Authenticated {
                    profile: ProfileState::Loading,
                    ..
                }
        )
    }

    /// Profile role, falling back to the sign-up metadata role
    pub fn role(&self) -> Option<UserRole> {
        match self {
            SessionState::Authenticated { user, profile } => match profile {
                ProfileState::Loaded(profile) => Some(profile.role),
                _ => user.role,
            },
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(|user| &user.id)
    }
}

/// Background listener; dropping it unsubscribes from auth events
#[derive(Debug)]
pub struct SessionHandle {
    task: JoinHandle<()>,
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct SessionStore<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    state: watch::Sender<SessionState>,
}

impl<R> SessionStore<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Initializing);
        Arc::new(Self { repo, state })
    }

    /// Subscribe to backend auth events, then resolve the initial session
    pub fn start(self: &Arc<Self>) -> SessionHandle {
        // Subscribe before reading so no change between the two is lost
        let mut events = self.repo.on_auth_state_change();
        let store = Arc::clone(self);

        let task = tokio::spawn(async move {
            store.resync().await;

            loop {
                match events.recv().await {
                    Ok(change) => store.handle_change(change),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth event listener lagged, resyncing session");
                        store.resync().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Auth event channel closed");
                        break;
                    }
                }
            }
        });

        SessionHandle { task }
    }

    async fn resync(self: &Arc<Self>) {
        match self.repo.get_session().await {
            Ok(Some(session)) => self.apply_user(session.user),
            Ok(None) => self.set_anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore session, continuing anonymous");
                self.set_anonymous();
            }
        }
    }

    fn handle_change(self: &Arc<Self>, change: AuthStateChange) {
        tracing::debug!(event = ?change.event, "Auth state change");
        match change.session {
            Some(session) => self.apply_user(session.user),
            None => self.set_anonymous(),
        }
    }

    /// Enter `Authenticated`; a no-op profile-wise when the user is unchanged
    fn apply_user(self: &Arc<Self>, user: AuthUser) {
        let user_id = user.id.clone();
        let mut entered = false;

        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated { user: current, .. } if current.id == user.id => {
                if *current == user {
                    return false;
                }
                *current = user;
                true
            }
            _ => {
                *state = SessionState::Authenticated {
                    user,
                    profile: ProfileState::Loading,
                };
                entered = true;
                true
            }
        });

        if entered {
            tracing::debug!(user_id = %user_id, "Session authenticated, loading profile");
            let store = Arc::clone(self);
            tokio::spawn(async move { store.load_profile(user_id).await });
        }
    }

    async fn load_profile(&self, user_id: UserId) {
        let outcome = match self.repo.find_by_id(&user_id).await {
            Ok(Some(profile)) => ProfileState::Loaded(profile),
            Ok(None) => {
                tracing::warn!(user_id = %user_id, "No profile row for signed-in user");
                ProfileState::Missing
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Profile fetch failed");
                ProfileState::Missing
            }
        };

        // The user may have signed out (or switched) while the fetch ran
        let landed = self.state.send_if_modified(|state| match state {
            SessionState::Authenticated { user, profile } if user.id == user_id => {
                *profile = outcome;
                true
            }
            _ => false,
        });

        if !landed {
            tracing::debug!(user_id = %user_id, "Discarded profile for a stale session");
        }
    }

    fn set_anonymous(&self) {
        self.state.send_if_modified(|state| {
            if *state == SessionState::Anonymous {
                return false;
            }
            *state = SessionState::Anonymous;
            true
        });
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().user().cloned()
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.state.borrow().profile().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.state.borrow().role()
    }

    /// Wait until neither the session nor the profile is loading
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // Sender lives in `self`; unreachable while borrowed
            Err(_) => self.snapshot(),
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub async fn sign_up(self: &Arc<Self>, input: SignUpInput) -> AuthResult<()> {
        let session = SignUpUseCase::new(Arc::clone(&self.repo)).execute(input).await?;
        if let Some(session) = session {
            self.apply_user(session.user);
        }
        Ok(())
    }

    pub async fn sign_in(self: &Arc<Self>, input: SignInInput) -> AuthResult<AuthUser> {
        let session = SignInUseCase::new(Arc::clone(&self.repo)).execute(input).await?;
        let user = session.user.clone();
        self.apply_user(session.user);
        Ok(user)
    }

    /// Always ends the local session; a remote failure is still reported
    pub async fn sign_out(&self) -> AuthResult<()> {
        let result = SignOutUseCase::new(Arc::clone(&self.repo)).execute().await;
        self.set_anonymous();
        result
    }

    pub async fn update_profile(&self, input: UpdateProfileInput) -> AuthResult<()> {
        let user_id = self
            .state
            .borrow()
            .user_id()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)?;

        let patch = UpdateProfileUseCase::new(Arc::clone(&self.repo))
            .execute(&user_id, input)
            .await?;

        let now = Utc::now();
        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated {
                user,
                profile: ProfileState::Loaded(profile),
            } if user.id == user_id => {
                patch.apply_to(profile, now);
                true
            }
            _ => false,
        });

        Ok(())
    }
}
