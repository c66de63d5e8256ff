//! Access Gate
//!
//! Decides whether a navigation target may be shown for the current
//! session state. Pure: no I/O, no clock.

use serde::Serialize;

use crate::application::session_store::SessionState;
use crate::domain::value_object::user_role::UserRole;

pub const LOGIN_PATH: &str = "/login";
pub const CHALLENGES_PATH: &str = "/challenges";
pub const BUILDER_DASHBOARD_PATH: &str = "/dashboard/builder";
pub const SPONSOR_DASHBOARD_PATH: &str = "/dashboard/sponsor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum Decision {
    Allow,
    Redirect {
        to: String,
        /// Requested path, for returning after login
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
    ShowLoading,
}

impl Decision {
    fn redirect(to: impl Into<String>) -> Self {
        Decision::Redirect {
            to: to.into(),
            from: None,
        }
    }
}

pub fn role_dashboard_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Builder => BUILDER_DASHBOARD_PATH,
        UserRole::Sponsor => SPONSOR_DASHBOARD_PATH,
    }
}

/// Gate a protected path; rules apply in order, first match wins
pub fn decide(state: &SessionState, requested_path: &str, allowed_roles: Option<&[UserRole]>) -> Decision {
    if state.is_loading() {
        return Decision::ShowLoading;
    }

    if state.user().is_none() {
        return Decision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(requested_path.to_string()),
        };
    }

    let profile_role = state.profile().map(|profile| profile.role);

    match (allowed_roles, profile_role) {
        (Some(allowed), Some(role)) if !allowed.contains(&role) => {
            Decision::redirect(role_dashboard_path(role))
        }
        (None, Some(role)) if matches!(normalize_path(requested_path), "/dashboard" | "/") => {
            Decision::redirect(role_dashboard_path(role))
        }
        _ => Decision::Allow,
    }
}

/// Drop query/fragment and trailing slashes (`/` stays `/`)
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

// ============================================================================
// Route table
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    Roles(Vec<UserRole>),
    /// Unconditional redirect (e.g. `/` → `/challenges`)
    RedirectTo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

#[derive(Debug, Clone)]
struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|segment| {
                if segment.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    fn matches(&self, path: &str) -> bool {
        let mut parts = split_segments(path);
        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Literal(expected), Some(actual)) if expected == actual => {}
                (Segment::Param, Some(_)) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    normalize_path(path).split('/').filter(|s| !s.is_empty())
}

/// Navigation paths and who may see them
///
/// Unlisted paths are public (they render the not-found page).
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(RoutePattern, RouteAccess)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns use `:name` for a single dynamic segment
    pub fn route(mut self, pattern: &str, access: RouteAccess) -> Self {
        self.routes.push((RoutePattern::parse(pattern), access));
        self
    }

    pub fn standard() -> Self {
        Self::new()
            .route(LOGIN_PATH, RouteAccess::Public)
            .route("/signup", RouteAccess::Public)
            .route(CHALLENGES_PATH, RouteAccess::Public)
            .route("/challenges/:challengeId", RouteAccess::Public)
            .route("/dashboard", RouteAccess::Authenticated)
            .route("/profile", RouteAccess::Authenticated)
            .route(BUILDER_DASHBOARD_PATH, RouteAccess::Roles(vec![UserRole::Builder]))
            .route("/my-submissions", RouteAccess::Roles(vec![UserRole::Builder]))
            .route(SPONSOR_DASHBOARD_PATH, RouteAccess::Roles(vec![UserRole::Sponsor]))
            .route(
                "/dashboard/sponsor/create-challenge",
                RouteAccess::Roles(vec![UserRole::Sponsor]),
            )
            .route("/", RouteAccess::RedirectTo(CHALLENGES_PATH.to_string()))
    }

    /// First registered pattern that matches
    pub fn access_for(&self, path: &str) -> Option<&RouteAccess> {
        self.routes
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, access)| access)
    }

    pub fn decide(&self, state: &SessionState, path: &str) -> Decision {
        match self.access_for(path) {
            None | Some(RouteAccess::Public) => Decision::Allow,
            Some(RouteAccess::RedirectTo(to)) => Decision::redirect(to.clone()),
            Some(RouteAccess::Authenticated) => decide(state, path, None),
            Some(RouteAccess::Roles(roles)) => decide(state, path, Some(roles.as_slice())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session_store::ProfileState;
    use crate::domain::entity::{AuthUser, Profile};
    use crate::domain::value_object::{display_name::DisplayName, email::Email};
    use chrono::Utc;
    use kernel::id::UserId;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: UserId::from_string("user-1"),
            email: Email::from_trusted("user@example.com"),
            role: Some(role),
            display_name: None,
        }
    }

    fn signed_in(role: UserRole) -> SessionState {
        SessionState::Authenticated {
            user: user(role),
            profile: ProfileState::Loaded(Profile {
                id: UserId::from_string("user-1"),
                email: Email::from_trusted("user@example.com"),
                display_name: DisplayName::from_trusted("Test User"),
                role,
                portfolio_link: None,
                company_name: None,
                updated_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn test_loading_shows_spinner() {
        assert_eq!(
            decide(&SessionState::Initializing, "/profile", None),
            Decision::ShowLoading
        );
        let profile_loading = SessionState::Authenticated {
            user: user(UserRole::Builder),
            profile: ProfileState::Loading,
        };
        assert_eq!(
            decide(&profile_loading, "/my-submissions", Some(&[UserRole::Builder][..])),
            Decision::ShowLoading
        );
    }

    #[test]
    fn test_anonymous_redirects_to_login_with_origin() {
        assert_eq!(
            decide(&SessionState::Anonymous, "/my-submissions", Some(&[UserRole::Builder][..])),
            Decision::Redirect {
                to: "/login".to_string(),
                from: Some("/my-submissions".to_string()),
            }
        );
    }

    #[test]
    fn test_sponsor_at_generic_dashboard_goes_to_sponsor_dashboard() {
        assert_eq!(
            decide(&signed_in(UserRole::Sponsor), "/dashboard", None),
            Decision::Redirect {
                to: "/dashboard/sponsor".to_string(),
                from: None,
            }
        );
        assert_eq!(
            decide(&signed_in(UserRole::Builder), "/dashboard/", None),
            Decision::Redirect {
                to: "/dashboard/builder".to_string(),
                from: None,
            }
        );
    }

    #[test]
    fn test_builder_on_sponsor_path_goes_to_builder_dashboard() {
        assert_eq!(
            decide(
                &signed_in(UserRole::Builder),
                "/dashboard/sponsor/create-challenge",
                Some(&[UserRole::Sponsor][..])
            ),
            Decision::Redirect {
                to: "/dashboard/builder".to_string(),
                from: None,
            }
        );
    }

    #[test]
    fn test_allowed_cases() {
        assert_eq!(
            decide(&signed_in(UserRole::Sponsor), "/dashboard/sponsor", Some(&[UserRole::Sponsor][..])),
            Decision::Allow
        );
        assert_eq!(decide(&signed_in(UserRole::Builder), "/profile", None), Decision::Allow);

        // Without a profile the role rules cannot apply
        let no_profile = SessionState::Authenticated {
            user: user(UserRole::Builder),
            profile: ProfileState::Missing,
        };
        assert_eq!(
            decide(&no_profile, "/dashboard/sponsor", Some(&[UserRole::Sponsor][..])),
            Decision::Allow
        );
        assert_eq!(decide(&no_profile, "/dashboard", None), Decision::Allow);
    }

    #[test]
    fn test_route_table_matching() {
        let table = RouteTable::standard();
        assert_eq!(table.access_for("/challenges/42"), Some(&RouteAccess::Public));
        assert_eq!(table.access_for("/challenges/42/"), Some(&RouteAccess::Public));
        assert_eq!(table.access_for("/challenges/42/edit"), None);
        assert_eq!(
            table.access_for("/my-submissions?page=2"),
            Some(&RouteAccess::Roles(vec![UserRole::Builder]))
        );
        assert_eq!(table.access_for("/dashboard"), Some(&RouteAccess::Authenticated));
    }

    #[test]
    fn test_route_table_decide() {
        let table = RouteTable::standard();
        assert_eq!(table.decide(&SessionState::Anonymous, "/challenges"), Decision::Allow);
        assert_eq!(table.decide(&SessionState::Initializing, "/challenges/1"), Decision::Allow);
        assert_eq!(table.decide(&SessionState::Anonymous, "/nowhere"), Decision::Allow);
        for state in [SessionState::Anonymous, signed_in(UserRole::Sponsor)] {
            assert_eq!(
                table.decide(&state, "/"),
                Decision::Redirect {
                    to: "/challenges".to_string(),
                    from: None,
                }
            );
        }
        assert_eq!(
            table.decide(&SessionState::Anonymous, "/profile"),
            Decision::Redirect {
                to: "/login".to_string(),
                from: Some("/profile".to_string()),
            }
        );
        assert_eq!(
            table.decide(&signed_in(UserRole::Sponsor), "/my-submissions"),
            Decision::Redirect {
                to: "/dashboard/sponsor".to_string(),
                from: None,
            }
        );
    }

    #[test]
    fn test_decision_json_shape() {
        let json = serde_json::to_value(Decision::Redirect {
            to: "/login".to_string(),
            from: Some("/profile".to_string()),
        })
        .unwrap();
        assert_eq!(json["decision"], "redirect");
        assert_eq!(json["to"], "/login");
        assert_eq!(json["from"], "/profile");
        assert_eq!(
            serde_json::to_value(Decision::ShowLoading).unwrap()["decision"],
            "showLoading"
        );
    }
}
