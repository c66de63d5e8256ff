//! Access Gate Middleware
//!
//! Applies [`decide`] to API requests so role-restricted endpoints answer
//! the same way the navigation gate does.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::session_store::SessionStore;
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::gate::{Decision, LOGIN_PATH, decide};

/// Middleware state
pub struct AccessGateState<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    pub store: Arc<SessionStore<R>>,
    /// `None` only requires a signed-in user
    pub allowed_roles: Option<Arc<[UserRole]>>,
}

impl<R> Clone for AccessGateState<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            allowed_roles: self.allowed_roles.clone(),
        }
    }
}

impl<R> AccessGateState<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    pub fn authenticated(store: Arc<SessionStore<R>>) -> Self {
        Self {
            store,
            allowed_roles: None,
        }
    }

    pub fn roles(store: Arc<SessionStore<R>>, roles: &[UserRole]) -> Self {
        Self {
            store,
            allowed_roles: Some(Arc::from(roles)),
        }
    }
}

/// Middleware that lets a request through only on [`Decision::Allow`]
///
/// - loading → 503 with `Retry-After`
/// - redirect to login → 401 with `X-Auth-Required`
/// - role redirect → 403
///
/// The decision is returned as the JSON body in every rejection.
pub async fn require_access<R>(
    State(state): State<AccessGateState<R>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let snapshot = state.store.snapshot();
    let decision = decide(&snapshot, req.uri().path(), state.allowed_roles.as_deref());

    let status = match &decision {
        Decision::Allow => return Ok(next.run(req).await),
        Decision::ShowLoading => StatusCode::SERVICE_UNAVAILABLE,
        Decision::Redirect { to, .. } if to == LOGIN_PATH => StatusCode::UNAUTHORIZED,
        Decision::Redirect { .. } => StatusCode::FORBIDDEN,
    };

    tracing::debug!(
        path = %req.uri().path(),
        status = status.as_u16(),
        role = ?snapshot.role(),
        "Access gate rejected request"
    );

    let mut response = (status, Json(decision)).into_response();
    let headers = response.headers_mut();
    match status {
        StatusCode::SERVICE_UNAVAILABLE => {
            headers.insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        StatusCode::UNAUTHORIZED => {
            headers.insert("x-auth-required", HeaderValue::from_static("true"));
        }
        _ => {}
    }
    Err(response)
}
