//! Repository Traits
//!
//! Interfaces to the hosted auth service and the `profiles` table.
//! Implementations live in the infrastructure layer.

use kernel::id::UserId;
use platform::password::ClearTextPassword;
use tokio::sync::broadcast;

use crate::domain::entity::{AuthStateChange, Profile, ProfilePatch, Registration, Session};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Auth service gateway
///
/// Holds at most one current session. Every change to it is broadcast to
/// subscribers of [`LocalAuthGateway::on_auth_state_change`].
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Register an account; returns a session when the backend signs the
    /// user in immediately (no email confirmation required)
    async fn sign_up(&self, registration: &Registration) -> AuthResult<Option<Session>>;

    /// Password grant
    async fn sign_in(&self, email: &Email, password: &ClearTextPassword) -> AuthResult<Session>;

    /// End the current session; the local session is cleared even if the
    /// remote call fails
    async fn sign_out(&self) -> AuthResult<()>;

    /// Current session, restored from storage and refreshed when expired
    async fn get_session(&self) -> AuthResult<Option<Session>>;

    /// Subscribe to auth state changes; dropping the receiver unsubscribes
    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthStateChange>;
}

/// `profiles` table access
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Expected absence is `Ok(None)`
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Profile>>;

    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> AuthResult<()>;
}
