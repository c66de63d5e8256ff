//! Acting User
//!
//! Who is performing a cache operation, resolved from the session store's
//! snapshot at call time.

use auth::SessionState;
use auth::models::UserRole;
use kernel::id::UserId;

use crate::error::{ArenaError, ArenaResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    /// Profile role, else the sign-up metadata role; `None` if neither is known
    pub role: Option<UserRole>,
    pub display_name: Option<String>,
}

impl Actor {
    pub fn from_session(state: &SessionState) -> Option<Self> {
        let user = state.user()?;
        let display_name = state
            .profile()
            .map(|p| p.display_name.to_string())
            .or_else(|| user.display_name.as_ref().map(|n| n.to_string()));

        Some(Self {
            id: user.id.clone(),
            role: state.role(),
            display_name,
        })
    }

    /// Signed in with a resolved role equal to `role`
    ///
    /// A user whose role is not known yet is refused like a wrong role.
    pub fn require(state: &SessionState, role: UserRole) -> ArenaResult<Self> {
        let actor = Self::from_session(state).ok_or(ArenaError::NotAuthenticated)?;
        match actor.role {
            Some(actual) if actual == role => Ok(actor),
            _ => Err(ArenaError::RoleNotPermitted(role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::ProfileState;
    use auth::models::{AuthUser, DisplayName, Email, Profile};
    use chrono::Utc;

    fn user(role: Option<UserRole>) -> AuthUser {
        AuthUser {
            id: UserId::from("u1"),
            email: Email::from_trusted("u1@example.com"),
            role,
            display_name: Some(DisplayName::from_trusted("Metadata Name")),
        }
    }

    #[test]
    fn test_anonymous_is_not_authenticated() {
        let err = Actor::require(&SessionState::Anonymous, UserRole::Sponsor).unwrap_err();
        assert!(matches!(err, ArenaError::NotAuthenticated));
    }

    #[test]
    fn test_wrong_role_rejected() {
        let state = SessionState::Authenticated {
            user: user(Some(UserRole::Builder)),
            profile: ProfileState::Missing,
        };
        let err = Actor::require(&state, UserRole::Sponsor).unwrap_err();
        assert!(matches!(err, ArenaError::RoleNotPermitted(UserRole::Sponsor)));
        assert!(Actor::require(&state, UserRole::Builder).is_ok());
    }

    #[test]
    fn test_unknown_role_passes_neither_check() {
        for profile in [ProfileState::Loading, ProfileState::Missing] {
            let state = SessionState::Authenticated {
                user: user(None),
                profile,
            };
            for role in [UserRole::Sponsor, UserRole::Builder] {
                let err = Actor::require(&state, role).unwrap_err();
                assert!(matches!(err, ArenaError::RoleNotPermitted(r) if r == role));
            }

            // Still identified, just not permitted
            let actor = Actor::from_session(&state).unwrap();
            assert_eq!(actor.display_name.as_deref(), Some("Metadata Name"));
        }
    }

    #[test]
    fn test_profile_wins_over_metadata() {
        let state = SessionState::Authenticated {
            user: user(Some(UserRole::Builder)),
            profile: ProfileState::Loaded(Profile {
                id: UserId::from("u1"),
                email: Email::from_trusted("u1@example.com"),
                display_name: DisplayName::from_trusted("Profile Name"),
                role: UserRole::Sponsor,
                portfolio_link: None,
                company_name: None,
                updated_at: Utc::now(),
            }),
        };
        let actor = Actor::require(&state, UserRole::Sponsor).unwrap();
        assert_eq!(actor.display_name.as_deref(), Some("Profile Name"));
    }
}
