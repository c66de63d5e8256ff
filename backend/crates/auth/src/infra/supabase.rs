//! Supabase Auth Repository
//!
//! GoTrue endpoints for the session lifecycle and the `profiles` table over
//! PostgREST. The current session lives in memory, mirrored to durable
//! storage under `auth.session` when persistence is enabled.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::UserId;
use platform::password::ClearTextPassword;
use platform::rest::{RestClient, RestError, eq};
use platform::storage::{KeyValueStore, StorageResult, load_json_or_default, save_json};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    AuthEvent, AuthStateChange, AuthUser, Profile, ProfilePatch, Registration, Session,
};
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Lifetime assumed when the token response carries no expiry
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Hosted-backend auth repository
#[derive(Clone)]
pub struct SupabaseAuthRepository {
    client: RestClient,
    storage: Arc<dyn KeyValueStore>,
    config: Arc<AuthConfig>,
    current: Arc<Mutex<Option<Session>>>,
    events: broadcast::Sender<AuthStateChange>,
}

impl SupabaseAuthRepository {
    pub fn new(client: RestClient, storage: Arc<dyn KeyValueStore>, config: Arc<AuthConfig>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            client,
            storage,
            config,
            current: Arc::new(Mutex::new(None)),
            events,
        }
    }

    fn current(&self) -> Option<Session> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_current(&self, session: Option<Session>) {
        self.client
            .set_access_token(session.as_ref().map(|s| s.access_token.clone()));
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    /// Make `session` current, persist it and notify listeners
    fn install(&self, session: Session, event: AuthEvent) {
        self.set_current(Some(session.clone()));

        if self.config.persist_session {
            if let Err(e) = save_json(self.storage.as_ref(), &self.config.session_storage_key, &session) {
                tracing::warn!(error = %e, "Failed to persist session");
            }
        }

        let _ = self.events.send(AuthStateChange {
            event,
            session: Some(session),
        });
    }

    /// Drop the local session and notify listeners
    fn clear_local(&self) -> StorageResult<()> {
        self.set_current(None);
        let _ = self.events.send(AuthStateChange::signed_out());

        if self.config.persist_session {
            self.storage.remove(&self.config.session_storage_key)?;
        }
        Ok(())
    }

    /// In-memory session, else the persisted one
    fn restore(&self) -> Option<Session> {
        if let Some(session) = self.current() {
            return Some(session);
        }
        if !self.config.persist_session {
            return None;
        }

        let stored: Option<Session> =
            load_json_or_default(self.storage.as_ref(), &self.config.session_storage_key);
        if let Some(session) = &stored {
            tracing::debug!(user_id = %session.user.id, "Restored persisted session");
        }
        stored
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<Session> {
        let row: TokenRow = self
            .client
            .auth_post(
                "token",
                &[("grant_type", "refresh_token")],
                &RefreshBody { refresh_token },
            )
            .await
            .map_err(map_auth_error)?;
        Ok(row.into_session(Utc::now()))
    }
}

// ============================================================================
// Auth Gateway Implementation
// ============================================================================

impl AuthGateway for SupabaseAuthRepository {
    async fn sign_up(&self, registration: &Registration) -> AuthResult<Option<Session>> {
        let body = SignUpBody {
            email: registration.email.as_str(),
            password: registration.password.expose(),
            data: SignUpMetadata {
                full_name: registration.display_name.as_str(),
                role: registration.role.code(),
            },
        };

        let response: serde_json::Value = self
            .client
            .auth_post("signup", &[], &body)
            .await
            .map_err(map_auth_error)?;

        // With email confirmation enabled the backend answers with the bare
        // user; otherwise with a full token response.
        if response.get("access_token").is_none() {
            return Ok(None);
        }

        let row: TokenRow =
            serde_json::from_value(response).map_err(|e| AuthError::Remote(RestError::Decode(e)))?;
        let session = row.into_session(Utc::now());
        self.install(session.clone(), AuthEvent::SignedIn);
        Ok(Some(session))
    }

    async fn sign_in(&self, email: &Email, password: &ClearTextPassword) -> AuthResult<Session> {
        let row: TokenRow = self
            .client
            .auth_post(
                "token",
                &[("grant_type", "password")],
                &PasswordGrantBody {
                    email: email.as_str(),
                    password: password.expose(),
                },
            )
            .await
            .map_err(map_auth_error)?;

        let session = row.into_session(Utc::now());
        self.install(session.clone(), AuthEvent::SignedIn);
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let remote = if self.client.access_token().is_some() {
            match self.client.auth_post_empty("logout").await {
                // Token already expired or revoked; nothing left to revoke
                Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => Ok(()),
                other => other,
            }
        } else {
            Ok(())
        };

        let local = self.clear_local();
        remote.map_err(map_auth_error)?;
        local?;
        Ok(())
    }

    async fn get_session(&self) -> AuthResult<Option<Session>> {
        let Some(session) = self.restore() else {
            return Ok(None);
        };

        if !session.needs_refresh(Utc::now(), self.config.refresh_margin_delta()) {
            self.set_current(Some(session.clone()));
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            tracing::info!(user_id = %session.user.id, "Session expired without refresh token");
            self.clear_local()?;
            return Ok(None);
        };

        match self.refresh(&refresh_token).await {
            Ok(fresh) => {
                tracing::debug!(user_id = %fresh.user.id, "Session refreshed");
                self.install(fresh.clone(), AuthEvent::TokenRefreshed);
                Ok(Some(fresh))
            }
            // Keep the stored session; a later attempt may succeed
            Err(AuthError::Remote(e)) if e.is_unavailable() => Err(AuthError::Remote(e)),
            Err(e) => {
                tracing::info!(error = %e, "Refresh token rejected, signing out locally");
                self.clear_local()?;
                Ok(None)
            }
        }
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for SupabaseAuthRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Profile>> {
        let rows: Vec<ProfileRow> = self
            .client
            .select(
                "profiles",
                &[("select", "*".to_string()), ("id", eq(user_id))],
            )
            .await?;

        Ok(rows.into_iter().next().and_then(ProfileRow::into_profile))
    }

    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> AuthResult<()> {
        let body = ProfileUpdateRow {
            full_name: patch.display_name.as_ref().map(DisplayName::as_str),
            portfolio_link: patch.portfolio_link.as_ref().map(Option::as_deref),
            company_name: patch.company_name.as_ref().map(Option::as_deref),
            updated_at: Utc::now(),
        };

        let rows: Vec<serde_json::Value> = self
            .client
            .update("profiles", &[("id", eq(user_id))], &body)
            .await?;

        if rows.is_empty() {
            return Err(AuthError::Internal(format!("No profile row updated for {user_id}")));
        }
        Ok(())
    }
}

// ============================================================================
// Wire rows
// ============================================================================

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
    role: &'a str,
}

#[derive(Serialize)]
struct PasswordGrantBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenRow {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserRow,
}

impl TokenRow {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| {
                now + TimeDelta::seconds(self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS))
            });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into_auth_user(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl UserRow {
    fn into_auth_user(self) -> AuthUser {
        AuthUser {
            id: UserId::from_string(self.id),
            email: Email::from_trusted(self.email.unwrap_or_default()),
            role: self.user_metadata.role.as_deref().and_then(UserRole::from_code),
            display_name: self
                .user_metadata
                .full_name
                .and_then(|name| DisplayName::new(name).ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    portfolio_link: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl ProfileRow {
    /// Rows without a recognizable role are treated as missing
    fn into_profile(self) -> Option<Profile> {
        let Some(role) = self.role.as_deref().and_then(UserRole::from_code) else {
            tracing::warn!(user_id = %self.id, "Profile row has no usable role");
            return None;
        };

        let display_name = self
            .full_name
            .as_deref()
            .and_then(|name| DisplayName::new(name).ok())
            .unwrap_or_else(|| DisplayName::from_trusted("Unknown User"));

        Some(Profile {
            id: UserId::from_string(self.id),
            email: Email::from_trusted(self.email.unwrap_or_default()),
            display_name,
            role,
            portfolio_link: self.portfolio_link.filter(|s| !s.is_empty()),
            company_name: self.company_name.filter(|s| !s.is_empty()),
            updated_at: self.updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }
}

#[derive(Debug, Serialize)]
struct ProfileUpdateRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
    /// `Some(None)` serializes as `null` and clears the column
    #[serde(skip_serializing_if = "Option::is_none")]
    portfolio_link: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<Option<&'a str>>,
    updated_at: DateTime<Utc>,
}

/// Translate GoTrue error shapes into auth errors
fn map_auth_error(err: RestError) -> AuthError {
    let code = err.code().unwrap_or_default().to_string();
    let message = err.backend_message().unwrap_or_default().to_string();
    let lower = message.to_ascii_lowercase();

    if code == "email_not_confirmed" || lower.contains("email not confirmed") {
        AuthError::EmailNotConfirmed
    } else if code == "invalid_credentials" || lower.contains("invalid login credentials") {
        AuthError::InvalidCredentials
    } else if code == "user_already_exists" || lower.contains("already registered") {
        AuthError::UserAlreadyRegistered
    } else if code == "weak_password" || err.status() == Some(422) {
        AuthError::Validation(message)
    } else {
        AuthError::Remote(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::rest::RestConfig;
    use platform::storage::MemoryStore;

    fn status(status: u16, code: Option<&str>, message: &str) -> RestError {
        RestError::Status {
            status,
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    fn repository(storage: Arc<MemoryStore>) -> SupabaseAuthRepository {
        let client = RestClient::new(&RestConfig::new("http://127.0.0.1:9", "anon")).unwrap();
        SupabaseAuthRepository::new(client, storage, Arc::new(AuthConfig::default()))
    }

    fn token_json(expires_at: i64) -> serde_json::Value {
        serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": expires_at,
            "refresh_token": "refresh",
            "user": {
                "id": "7b0c1c9e-1111-4a52-9c7a-0f7d2d1e2f3a",
                "email": "sponsor@example.com",
                "user_metadata": { "full_name": "MarketGenius Inc.", "role": "sponsor" }
            }
        })
    }

    #[test]
    fn test_map_auth_error_shapes() {
        assert!(matches!(
            map_auth_error(status(400, Some("invalid_credentials"), "Invalid login credentials")),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            map_auth_error(status(400, None, "Email not confirmed")),
            AuthError::EmailNotConfirmed
        ));
        assert!(matches!(
            map_auth_error(status(422, Some("user_already_exists"), "User already registered")),
            AuthError::UserAlreadyRegistered
        ));
        assert!(matches!(
            map_auth_error(status(422, Some("weak_password"), "Password should be at least 6 characters")),
            AuthError::Validation(_)
        ));
        assert!(matches!(
            map_auth_error(status(500, None, "Database error saving new user")),
            AuthError::Remote(_)
        ));
    }

    #[test]
    fn test_token_row_into_session() {
        let row: TokenRow = serde_json::from_value(token_json(1_900_000_000)).unwrap();
        let session = row.into_session(Utc::now());

        assert_eq!(session.expires_at.timestamp(), 1_900_000_000);
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(session.user.email.as_str(), "sponsor@example.com");
        assert_eq!(session.user.role, Some(UserRole::Sponsor));
        assert_eq!(
            session.user.display_name.as_ref().map(DisplayName::as_str),
            Some("MarketGenius Inc.")
        );
    }

    #[test]
    fn test_token_row_without_expiry_uses_lifetime() {
        let mut json = token_json(0);
        json.as_object_mut().unwrap().remove("expires_at");
        let now = Utc::now();
        let session = serde_json::from_value::<TokenRow>(json).unwrap().into_session(now);
        assert_eq!(session.expires_at, now + TimeDelta::seconds(3600));
    }

    #[test]
    fn test_profile_row_decoding() {
        let row: ProfileRow = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "full_name": "  Ada  ",
            "email": "ada@example.com",
            "role": "builder",
            "portfolio_link": "",
            "company_name": null,
            "updated_at": "2025-05-01T10:00:00Z"
        }))
        .unwrap();
        let profile = row.into_profile().unwrap();
        assert_eq!(profile.display_name.as_str(), "Ada");
        assert_eq!(profile.role, UserRole::Builder);
        assert_eq!(profile.portfolio_link, None);

        let no_role: ProfileRow =
            serde_json::from_value(serde_json::json!({ "id": "u2", "role": "admin" })).unwrap();
        assert!(no_role.into_profile().is_none());
    }

    #[test]
    fn test_profile_update_row_clears_with_null() {
        let body = ProfileUpdateRow {
            full_name: None,
            portfolio_link: Some(None),
            company_name: Some(Some("MediTech")),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("full_name").is_none());
        assert!(json["portfolio_link"].is_null());
        assert_eq!(json["company_name"], "MediTech");
    }

    #[tokio::test]
    async fn test_get_session_restores_persisted_session() {
        let storage = Arc::new(MemoryStore::new());
        let row: TokenRow = serde_json::from_value(token_json(4_000_000_000)).unwrap();
        let session = row.into_session(Utc::now());
        save_json(storage.as_ref(), "auth.session", &session).unwrap();

        let repo = repository(storage);
        let restored = repo.get_session().await.unwrap().unwrap();

        assert_eq!(restored, session);
        assert_eq!(repo.client.access_token().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_get_session_ignores_corrupt_storage() {
        let storage = Arc::new(MemoryStore::new().with_entry("auth.session", "{broken"));
        let repo = repository(storage);
        assert!(repo.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_without_refresh_token_is_cleared() {
        let storage = Arc::new(MemoryStore::new());
        let mut session = serde_json::from_value::<TokenRow>(token_json(1_000))
            .unwrap()
            .into_session(Utc::now());
        session.refresh_token = None;
        save_json(storage.as_ref(), "auth.session", &session).unwrap();

        let repo = repository(Arc::clone(&storage));
        let mut events = repo.on_auth_state_change();

        assert!(repo.get_session().await.unwrap().is_none());
        assert!(!storage.contains("auth.session"));
        assert_eq!(events.recv().await.unwrap(), AuthStateChange::signed_out());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_local_only() {
        let storage = Arc::new(MemoryStore::new());
        let repo = repository(Arc::clone(&storage));
        repo.sign_out().await.unwrap();
        assert!(repo.client.access_token().is_none());
    }
}
