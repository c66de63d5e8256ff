//! Sign Out Use Case

use std::sync::Arc;

use crate::domain::repository::AuthGateway;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<G>
where
    G: AuthGateway,
{
    gateway: Arc<G>,
}

impl<G> SignOutUseCase<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self) -> AuthResult<()> {
        match self.gateway.sign_out().await {
            Ok(()) => {
                tracing::info!("User signed out");
                Ok(())
            }
            Err(e) => {
                // Local session is already gone; only the remote revoke failed
                tracing::warn!(error = %e, "Remote sign-out failed");
                Err(e)
            }
        }
    }
}
