//! Update Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;
use platform::link::parse_http_link;

use crate::domain::entity::ProfilePatch;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::display_name::DisplayName;
use crate::error::{AuthError, AuthResult};

/// Profile form input
///
/// `None` leaves a field unchanged; an empty string clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub portfolio_link: Option<String>,
    pub company_name: Option<String>,
}

impl UpdateProfileInput {
    pub fn validate(self) -> AuthResult<ProfilePatch> {
        let display_name = self.full_name.map(DisplayName::new).transpose()?;

        let portfolio_link = match self.portfolio_link {
            None => None,
            Some(raw) if raw.trim().is_empty() => Some(None),
            Some(raw) => Some(Some(parse_http_link(&raw)?.to_string())),
        };

        let company_name = self.company_name.map(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        let patch = ProfilePatch {
            display_name,
            portfolio_link,
            company_name,
        };

        if patch.is_empty() {
            return Err(AuthError::Validation("Nothing to update".to_string()));
        }

        Ok(patch)
    }
}

/// Update profile use case
pub struct UpdateProfileUseCase<P>
where
    P: ProfileRepository,
{
    profiles: Arc<P>,
}

impl<P> UpdateProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    /// Writes the patch remotely and hands it back for the local cache
    pub async fn execute(&self, user_id: &UserId, input: UpdateProfileInput) -> AuthResult<ProfilePatch> {
        let patch = input.validate()?;
        self.profiles.update(user_id, &patch).await?;
        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(patch)
    }
}
