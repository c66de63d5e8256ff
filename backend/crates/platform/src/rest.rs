//! Hosted Backend REST Client
//!
//! Request/response plumbing for the hosted auth/database service:
//! - `auth/v1/*` - GoTrue-style auth endpoints (sign-up, token, logout)
//! - `rest/v1/<table>` - PostgREST-style row CRUD
//!
//! The client holds credentials only (base URL, anon key, current bearer
//! token). It never retries and never caches rows.

use std::fmt::Display;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
    pub request_timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RestError {
    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            RestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Backend error code (`PGRST116`, `email_not_confirmed`, ...)
    pub fn code(&self) -> Option<&str> {
        match self {
            RestError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Backend-supplied message, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            RestError::Status { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The backend could not serve the request (timeout, refused connection,
    /// gateway errors)
    pub fn is_unavailable(&self) -> bool {
        match self {
            RestError::Transport(e) => e.is_timeout() || e.is_connect(),
            RestError::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

pub type RestResult<T> = Result<T, RestError>;

/// PostgREST equality filter: `("id", eq(id))` → `id=eq.<id>`
pub fn eq(value: impl Display) -> String {
    format!("eq.{value}")
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: Arc<str>,
    /// User access token; `None` means requests go out as the anon role
    access_token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.access_token().is_some())
            .finish()
    }
}

impl RestClient {
    pub fn new(config: &RestConfig) -> RestResult<Self> {
        // Trailing slash so that `join` appends instead of replacing the last segment
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("elite-arena/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            anon_key: Arc::from(config.anon_key.as_str()),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn set_access_token(&self, token: Option<String>) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn endpoint(&self, path: &str) -> RestResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.anon_key.to_string());
        self.http
            .request(method, url)
            .header("apikey", &*self.anon_key)
            .bearer_auth(bearer)
    }

    // ------------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------------

    /// `GET rest/v1/<table>?<query>`
    pub async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> RestResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let response = self.request(Method::GET, url).query(query).send().await?;
        decode_json(response).await
    }

    /// `POST rest/v1/<table>` returning the inserted rows
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> RestResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        decode_json(response).await
    }

    /// `PATCH rest/v1/<table>?<filter>` returning the updated rows
    pub async fn update<B, T>(
        &self,
        table: &str,
        filter: &[(&str, String)],
        body: &B,
    ) -> RestResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let response = self
            .request(Method::PATCH, url)
            .query(filter)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        decode_json(response).await
    }

    /// `DELETE rest/v1/<table>?<filter>`
    pub async fn delete(&self, table: &str, filter: &[(&str, String)]) -> RestResult<()> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let response = self.request(Method::DELETE, url).query(filter).send().await?;
        check_status(response).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// `POST auth/v1/<path>?<query>` with a JSON answer
    pub async fn auth_post<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> RestResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("auth/v1/{path}"))?;
        let response = self
            .request(Method::POST, url)
            .query(query)
            .json(body)
            .send()
            .await?;
        decode_json(response).await
    }

    /// `POST auth/v1/<path>` where only the status matters (logout)
    pub async fn auth_post_empty(&self, path: &str) -> RestResult<()> {
        let url = self.endpoint(&format!("auth/v1/{path}"))?;
        let response = self.request(Method::POST, url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

// ============================================================================
// Response handling
// ============================================================================

async fn check_status(response: Response) -> RestResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> RestResult<T> {
    let text = check_status(response).await?.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Union of the PostgREST and GoTrue error shapes
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
    code: Option<serde_json::Value>,
}

fn status_error(status: StatusCode, body: &str) -> RestError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed.error_code.clone().or_else(|| match &parsed.code {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        _ => None,
    });

    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        });

    RestError::Status {
        status: status.as_u16(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq("local-1"), "eq.local-1");
        assert_eq!(eq(42), "eq.42");
    }

    #[test]
    fn test_endpoint_join_keeps_project_path() {
        let client = RestClient::new(&RestConfig::new("https://arena.example.co/", "anon")).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/challenges").unwrap().as_str(),
            "https://arena.example.co/rest/v1/challenges"
        );

        let nested = RestClient::new(&RestConfig::new("http://localhost:54321/proxy", "anon")).unwrap();
        assert_eq!(
            nested.endpoint("auth/v1/token").unwrap().as_str(),
            "http://localhost:54321/proxy/auth/v1/token"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RestClient::new(&RestConfig::new("not a url", "anon")),
            Err(RestError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_access_token_slot_is_shared_between_clones() {
        let client = RestClient::new(&RestConfig::new("https://arena.example.co", "anon")).unwrap();
        let clone = client.clone();
        client.set_access_token(Some("jwt".to_string()));
        assert_eq!(clone.access_token().as_deref(), Some("jwt"));
        clone.set_access_token(None);
        assert!(client.access_token().is_none());
    }

    #[test]
    fn test_status_error_postgrest_shape() {
        let err = status_error(
            StatusCode::NOT_ACCEPTABLE,
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#,
        );
        assert_eq!(err.status(), Some(406));
        assert_eq!(err.code(), Some("PGRST116"));
        assert!(err.to_string().contains("multiple (or no) rows"));
    }

    #[test]
    fn test_status_error_gotrue_shape() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );
        assert_eq!(err.code(), Some("invalid_credentials"));
        assert_eq!(err.backend_message(), Some("Invalid login credentials"));

        let legacy = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#,
        );
        assert_eq!(legacy.backend_message(), Some("Email not confirmed"));
    }

    #[test]
    fn test_status_error_without_body() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.backend_message(), Some("Service Unavailable"));
        assert!(err.is_unavailable());
    }
}
