//! Arena Router
//!
//! Four groups behind the access gate: public listings, any signed-in
//! user, sponsors, and builders.

use auth::SessionStore;
use auth::domain::repository::{AuthGateway, ProfileRepository};
use auth::middleware::{AccessGateState, require_access};
use auth::models::UserRole;
use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use std::sync::Arc;

use crate::application::ChallengeCache;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::presentation::handlers::{self, ArenaAppState};

/// Create the Arena router; `sessions` backs the access gate
pub fn arena_router<R, A>(cache: Arc<ChallengeCache<R>>, sessions: Arc<SessionStore<A>>) -> Router
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
    A: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let state = ArenaAppState { cache };

    let public = Router::new()
        .route("/challenges", get(handlers::list_challenges::<R>))
        .route("/challenges/{id}", get(handlers::get_challenge::<R>));

    let signed_in = Router::new()
        .route("/state", get(handlers::cache_state::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route_layer(middleware::from_fn_with_state(
            AccessGateState::authenticated(Arc::clone(&sessions)),
            require_access::<A>,
        ));

    let sponsor = Router::new()
        .route(
            "/sponsor/challenges",
            get(handlers::created_challenges::<R>).post(handlers::create_challenge::<R>),
        )
        .route(
            "/sponsor/challenges/{id}",
            patch(handlers::update_challenge::<R>).delete(handlers::delete_challenge::<R>),
        )
        .route(
            "/sponsor/challenges/{id}/submissions",
            get(handlers::challenge_submissions::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            AccessGateState::roles(Arc::clone(&sessions), &[UserRole::Sponsor]),
            require_access::<A>,
        ));

    let builder = Router::new()
        .route("/builder/accepted", get(handlers::accepted_challenges::<R>))
        .route(
            "/builder/accepted/{id}",
            put(handlers::accept_challenge::<R>).delete(handlers::remove_accepted::<R>),
        )
        .route(
            "/builder/submissions",
            get(handlers::my_submissions::<R>).post(handlers::submit_solution::<R>),
        )
        .route(
            "/builder/submissions/{challenge_id}/current",
            get(handlers::current_submission::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            AccessGateState::roles(sessions, &[UserRole::Builder]),
            require_access::<A>,
        ));

    Router::new()
        .merge(public)
        .merge(signed_in)
        .merge(sponsor)
        .merge(builder)
        .with_state(state)
}
