//! Sign Up Use Case
//!
//! Validates the sign-up form and registers the account with the backend.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::{Registration, Session};
use crate::domain::repository::AuthGateway;
use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};
use crate::error::AuthResult;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

impl SignUpInput {
    /// Run all form validation; nothing reaches the backend on failure
    pub fn validate(self) -> AuthResult<Registration> {
        let email = Email::new(&self.email)?;
        let display_name = DisplayName::new(&self.full_name)?;
        let password = ClearTextPassword::new(self.password)?;

        Ok(Registration {
            email,
            password,
            display_name,
            role: self.role,
        })
    }
}

/// Sign up use case
pub struct SignUpUseCase<G>
where
    G: AuthGateway,
{
    gateway: Arc<G>,
}

impl<G> SignUpUseCase<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Returns the session when the backend signs the new user in directly
    pub async fn execute(&self, input: SignUpInput) -> AuthResult<Option<Session>> {
        let registration = input.validate()?;

        let session = self.gateway.sign_up(&registration).await?;

        tracing::info!(
            email_domain = registration.email.domain(),
            role = %registration.role,
            signed_in = session.is_some(),
            "User signed up"
        );

        Ok(session)
    }
}
