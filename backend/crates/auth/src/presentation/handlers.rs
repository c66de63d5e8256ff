//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::{SessionStore, SignInInput, SignUpInput, UpdateProfileInput};
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    NavigateQuery, ProfileResponse, SessionResponse, SignInRequest, SignUpRequest,
    SignUpResponse, UpdateProfileRequest, UserResponse,
};
use crate::presentation::gate::{Decision, RouteTable};

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    pub store: Arc<SessionStore<R>>,
    pub routes: Arc<RouteTable>,
}

impl<R> Clone for AuthAppState<R>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            routes: Arc::clone(&self.routes),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let input = SignUpInput {
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        role: req.role,
    };

    state.store.sign_up(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            signed_in: state.store.current_user().is_some(),
        }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let user = state.store.sign_in(input).await?;

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R>(State(state): State<AuthAppState<R>>) -> StatusCode
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    // The local session is gone either way; the use case already logged
    let _ = state.store.sign_out().await;
    StatusCode::NO_CONTENT
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<R>(State(state): State<AuthAppState<R>>) -> Json<SessionResponse>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    Json(SessionResponse::from(&state.store.snapshot()))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/profile
pub async fn get_profile<R>(State(state): State<AuthAppState<R>>) -> AuthResult<Json<ProfileResponse>>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    if state.store.current_user().is_none() {
        return Err(AuthError::NotAuthenticated);
    }
    let profile = state
        .store
        .current_profile()
        .ok_or_else(|| AuthError::Internal("Profile is not available".to_string()))?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// PATCH /api/auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let input = UpdateProfileInput {
        full_name: req.full_name,
        portfolio_link: req.portfolio_link,
        company_name: req.company_name,
    };

    state.store.update_profile(input).await?;

    Ok(match state.store.current_profile() {
        Some(profile) => Json(ProfileResponse::from(&profile)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ============================================================================
// Navigation
// ============================================================================

/// GET /api/auth/navigate?path=/dashboard
pub async fn navigate<R>(
    State(state): State<AuthAppState<R>>,
    Query(query): Query<NavigateQuery>,
) -> Json<Decision>
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let snapshot = state.store.snapshot();
    Json(state.routes.decide(&snapshot, &query.path))
}
