//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::ChallengeId;
use std::sync::Arc;

use crate::application::{Actor, CacheState, ChallengeCache, SubmitSolutionInput};
use crate::domain::entities::{Challenge, ChallengeDraft, ChallengePatch, Submission};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::error::{ArenaError, ArenaResult};
use crate::presentation::dto::{
    AcceptResponse, DeleteResponse, RefreshResponse, RemoveResponse, SubmitSolutionRequest,
};

/// Shared state for arena handlers
pub struct ArenaAppState<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    pub cache: Arc<ChallengeCache<R>>,
}

impl<R> Clone for ArenaAppState<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R> ArenaAppState<R>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    fn actor(&self) -> ArenaResult<Actor> {
        self.cache.actor().ok_or(ArenaError::NotAuthenticated)
    }
}

// ============================================================================
// Public
// ============================================================================

/// GET /api/arena/challenges
pub async fn list_challenges<R>(State(state): State<ArenaAppState<R>>) -> Json<Vec<Challenge>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    Json(state.cache.all_challenges())
}

/// GET /api/arena/challenges/{id}
pub async fn get_challenge<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
) -> ArenaResult<Json<Challenge>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let id = ChallengeId::from_string(id);
    state
        .cache
        .get_challenge_by_id(&id)
        .map(Json)
        .ok_or(ArenaError::ChallengeNotFound(id))
}

// ============================================================================
// Signed in
// ============================================================================

/// GET /api/arena/state
pub async fn cache_state<R>(State(state): State<ArenaAppState<R>>) -> Json<CacheState>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    Json(state.cache.snapshot())
}

/// POST /api/arena/refresh
pub async fn refresh<R>(State(state): State<ArenaAppState<R>>) -> Json<RefreshResponse>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    Json(RefreshResponse {
        added: state.cache.refresh().await,
    })
}

// ============================================================================
// Sponsor
// ============================================================================

/// GET /api/arena/sponsor/challenges
pub async fn created_challenges<R>(State(state): State<ArenaAppState<R>>) -> Json<Vec<Challenge>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    Json(state.cache.created_challenges())
}

/// POST /api/arena/sponsor/challenges
pub async fn create_challenge<R>(
    State(state): State<ArenaAppState<R>>,
    Json(draft): Json<ChallengeDraft>,
) -> ArenaResult<impl IntoResponse>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let challenge = state.cache.create_challenge(draft).await?;
    Ok((StatusCode::CREATED, Json(challenge)))
}

/// PATCH /api/arena/sponsor/challenges/{id}
pub async fn update_challenge<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
    Json(patch): Json<ChallengePatch>,
) -> ArenaResult<Json<Challenge>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let id = ChallengeId::from_string(id);
    let updated = state.cache.update_challenge(&id, patch).await?;
    Ok(Json(updated))
}

/// DELETE /api/arena/sponsor/challenges/{id}
pub async fn delete_challenge<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
) -> ArenaResult<Json<DeleteResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let challenge_id = ChallengeId::from_string(id);
    let deleted = state.cache.delete_challenge(&challenge_id).await?;
    Ok(Json(DeleteResponse {
        challenge_id,
        deleted,
    }))
}

/// GET /api/arena/sponsor/challenges/{id}/submissions
pub async fn challenge_submissions<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
) -> Json<Vec<Submission>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let id = ChallengeId::from_string(id);
    Json(state.cache.get_submissions_for_challenge(&id).await)
}

// ============================================================================
// Builder
// ============================================================================

/// GET /api/arena/builder/accepted
pub async fn accepted_challenges<R>(State(state): State<ArenaAppState<R>>) -> Json<Vec<Challenge>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    Json(state.cache.accepted_challenges())
}

/// PUT /api/arena/builder/accepted/{id}
pub async fn accept_challenge<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
) -> ArenaResult<Json<AcceptResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let challenge_id = ChallengeId::from_string(id);
    let added = state.cache.accept_by_id(&challenge_id)?;
    Ok(Json(AcceptResponse {
        challenge_id,
        added,
    }))
}

/// DELETE /api/arena/builder/accepted/{id}
pub async fn remove_accepted<R>(
    State(state): State<ArenaAppState<R>>,
    Path(id): Path<String>,
) -> Json<RemoveResponse>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let challenge_id = ChallengeId::from_string(id);
    let removed = state.cache.remove_challenge(&challenge_id);
    Json(RemoveResponse {
        challenge_id,
        removed,
    })
}

/// GET /api/arena/builder/submissions
pub async fn my_submissions<R>(
    State(state): State<ArenaAppState<R>>,
) -> ArenaResult<Json<Vec<Submission>>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let actor = state.actor()?;
    Ok(Json(state.cache.get_user_submissions(&actor.id).await))
}

/// POST /api/arena/builder/submissions
pub async fn submit_solution<R>(
    State(state): State<ArenaAppState<R>>,
    Json(req): Json<SubmitSolutionRequest>,
) -> ArenaResult<impl IntoResponse>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let actor = state.actor()?;
    let input = SubmitSolutionInput {
        challenge_id: req.challenge_id,
        builder_id: req.builder_id.unwrap_or(actor.id),
        builder_name: req.builder_name,
        link: req.link,
    };

    let submission = state.cache.submit_challenge(input).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/arena/builder/submissions/{challenge_id}/current
pub async fn current_submission<R>(
    State(state): State<ArenaAppState<R>>,
    Path(challenge_id): Path<String>,
) -> ArenaResult<Json<Option<Submission>>>
where
    R: ChallengeRepository + SubmissionRepository + Send + Sync + 'static,
{
    let actor = state.actor()?;
    let challenge_id = ChallengeId::from_string(challenge_id);
    Ok(Json(state.cache.current_submission(&challenge_id, &actor.id)))
}
