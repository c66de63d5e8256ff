//! In-Memory Auth Repository
//!
//! Process-local stand-in for the hosted auth service, used by tests and by
//! the offline demo. Accounts get a profile row at sign-up the way the
//! backend's trigger does. Failures can be injected per concern.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{TimeDelta, Utc};
use kernel::id::UserId;
use platform::password::ClearTextPassword;
use platform::rest::RestError;
use tokio::sync::broadcast;

use crate::domain::entity::{
    AuthStateChange, AuthUser, Profile, ProfilePatch, Registration, Session,
};
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

struct Account {
    id: UserId,
    password: String,
    display_name: DisplayName,
    role: UserRole,
    confirmed: bool,
}

#[derive(Default)]
struct MemoryAuthState {
    accounts: HashMap<Email, Account>,
    profiles: HashMap<UserId, Profile>,
    current: Option<Session>,
}

pub struct MemoryAuthRepository {
    state: Mutex<MemoryAuthState>,
    events: broadcast::Sender<AuthStateChange>,
    token_counter: AtomicU64,
    offline: AtomicBool,
    fail_profile_fetch: AtomicBool,
    require_confirmation: AtomicBool,
}

impl Default for MemoryAuthRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(MemoryAuthState::default()),
            events,
            token_counter: AtomicU64::new(0),
            offline: AtomicBool::new(false),
            fail_profile_fetch: AtomicBool::new(false),
            require_confirmation: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryAuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a confirmed account with its profile; returns the user id
    pub fn register_confirmed(&self, email: &str, password: &str, full_name: &str, role: UserRole) -> UserId {
        let email = Email::from_trusted(email.trim().to_lowercase());
        let display_name = DisplayName::from_trusted(full_name);
        let id = UserId::new();

        let mut state = self.lock();
        state.profiles.insert(
            id.clone(),
            Profile {
                id: id.clone(),
                email: email.clone(),
                display_name: display_name.clone(),
                role,
                portfolio_link: None,
                company_name: None,
                updated_at: Utc::now(),
            },
        );
        state.accounts.insert(
            email,
            Account {
                id: id.clone(),
                password: password.to_string(),
                display_name,
                role,
                confirmed: true,
            },
        );
        id
    }

    /// Every call fails as if the backend were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_profile_fetch_failing(&self, failing: bool) {
        self.fail_profile_fetch.store(failing, Ordering::SeqCst);
    }

    /// New sign-ups must confirm their email before signing in
    pub fn set_require_confirmation(&self, required: bool) {
        self.require_confirmation.store(required, Ordering::SeqCst);
    }

    pub fn confirm(&self, email: &str) {
        let email = Email::from_trusted(email.trim().to_lowercase());
        if let Some(account) = self.lock().accounts.get_mut(&email) {
            account.confirmed = true;
        }
    }

    pub fn remove_profile(&self, user_id: &UserId) {
        self.lock().profiles.remove(user_id);
    }

    pub fn profile(&self, user_id: &UserId) -> Option<Profile> {
        self.lock().profiles.get(user_id).cloned()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    /// Revoke the session from "another device"
    pub fn revoke_externally(&self) {
        self.lock().current = None;
        let _ = self.events.send(AuthStateChange::signed_out());
    }

    fn check_online(&self) -> AuthResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::Remote(RestError::Status {
                status: 503,
                code: None,
                message: "Auth backend offline".to_string(),
            }));
        }
        Ok(())
    }

    fn open_session(&self, account: &Account, email: &Email) -> Session {
        let n = self.token_counter.fetch_add(1, Ordering::SeqCst);
        Session {
            access_token: format!("memory-{}-{n}", account.id),
            refresh_token: Some(format!("memory-refresh-{n}")),
            expires_at: Utc::now() + TimeDelta::hours(1),
            user: AuthUser {
                id: account.id.clone(),
                email: email.clone(),
                role: Some(account.role),
                display_name: Some(account.display_name.clone()),
            },
        }
    }
}

impl AuthGateway for MemoryAuthRepository {
    async fn sign_up(&self, registration: &Registration) -> AuthResult<Option<Session>> {
        self.check_online()?;

        let session = {
            let mut state = self.lock();
            if state.accounts.contains_key(&registration.email) {
                return Err(AuthError::UserAlreadyRegistered);
            }

            let id = UserId::new();
            let account = Account {
                id: id.clone(),
                password: registration.password.expose().to_string(),
                display_name: registration.display_name.clone(),
                role: registration.role,
                confirmed: !self.require_confirmation.load(Ordering::SeqCst),
            };

            state.profiles.insert(
                id.clone(),
                Profile {
                    id,
                    email: registration.email.clone(),
                    display_name: registration.display_name.clone(),
                    role: registration.role,
                    portfolio_link: None,
                    company_name: None,
                    updated_at: Utc::now(),
                },
            );

            let session = account
                .confirmed
                .then(|| self.open_session(&account, &registration.email));
            state.accounts.insert(registration.email.clone(), account);
            if let Some(session) = &session {
                state.current = Some(session.clone());
            }
            session
        };

        if let Some(session) = &session {
            let _ = self.events.send(AuthStateChange::signed_in(session.clone()));
        }
        Ok(session)
    }

    async fn sign_in(&self, email: &Email, password: &ClearTextPassword) -> AuthResult<Session> {
        self.check_online()?;

        let session = {
            let mut state = self.lock();
            let account = state
                .accounts
                .get(email)
                .filter(|account| account.password == password.expose())
                .ok_or(AuthError::InvalidCredentials)?;

            if !account.confirmed {
                return Err(AuthError::EmailNotConfirmed);
            }

            let session = self.open_session(account, email);
            state.current = Some(session.clone());
            session
        };

        let _ = self.events.send(AuthStateChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.lock().current = None;
        let _ = self.events.send(AuthStateChange::signed_out());
        self.check_online()
    }

    async fn get_session(&self) -> AuthResult<Option<Session>> {
        self.check_online()?;
        Ok(self.lock().current.clone())
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }
}

impl ProfileRepository for MemoryAuthRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Profile>> {
        self.check_online()?;
        if self.fail_profile_fetch.load(Ordering::SeqCst) {
            return Err(AuthError::Remote(RestError::Status {
                status: 500,
                code: None,
                message: "Profile query failed".to_string(),
            }));
        }
        Ok(self.lock().profiles.get(user_id).cloned())
    }

    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> AuthResult<()> {
        self.check_online()?;
        let mut state = self.lock();
        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| AuthError::Internal(format!("No profile row updated for {user_id}")))?;
        patch.apply_to(profile, Utc::now());
        Ok(())
    }
}
