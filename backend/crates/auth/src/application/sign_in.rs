//! Sign In Use Case
//!
//! Exchanges email + password for a session.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::Session;
use crate::domain::repository::AuthGateway;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<G>
where
    G: AuthGateway,
{
    gateway: Arc<G>,
}

impl<G> SignInUseCase<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<Session> {
        // A malformed email can never match an account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        // Sign-in does not re-apply the sign-up policy
        let password = ClearTextPassword::unchecked(input.password);
        if password.expose().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.gateway.sign_in(&email, &password).await?;

        tracing::info!(user_id = %session.user.id, "User signed in");

        Ok(session)
    }
}
