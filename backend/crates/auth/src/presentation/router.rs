//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::SessionStore;
use crate::domain::repository::{AuthGateway, ProfileRepository};
use crate::presentation::gate::RouteTable;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any repository implementation
pub fn auth_router<R>(store: Arc<SessionStore<R>>, routes: RouteTable) -> Router
where
    R: AuthGateway + ProfileRepository + Send + Sync + 'static,
{
    let state = AuthAppState {
        store,
        routes: Arc::new(routes),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/session", get(handlers::session_status::<R>))
        .route(
            "/profile",
            get(handlers::get_profile::<R>).patch(handlers::update_profile::<R>),
        )
        .route("/navigate", get(handlers::navigate::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_role::UserRole;
    use crate::infra::MemoryAuthRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_then_session_and_navigate() {
        let repo = Arc::new(MemoryAuthRepository::new());
        repo.register_confirmed("sponsor@example.com", "Sponsor#Vault2025", "MediTech", UserRole::Sponsor);
        let store = SessionStore::new(repo);
        let _handle = store.start();
        store.settled().await;

        let app = auth_router(Arc::clone(&store), RouteTable::standard());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/signin",
                serde_json::json!({ "email": "sponsor@example.com", "password": "Sponsor#Vault2025" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], "sponsor");

        store.settled().await;

        let response = app
            .clone()
            .oneshot(Request::get("/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let session = body_json(response).await;
        assert_eq!(session["status"], "authenticated");
        assert_eq!(session["profile"]["fullName"], "MediTech");

        let response = app
            .oneshot(Request::get("/navigate?path=/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let decision = body_json(response).await;
        assert_eq!(decision["decision"], "redirect");
        assert_eq!(decision["to"], "/dashboard/sponsor");
    }

    #[tokio::test]
    async fn test_bad_credentials_and_anonymous_profile() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let store = SessionStore::new(repo);
        let _handle = store.start();
        store.settled().await;

        let app = auth_router(store, RouteTable::standard());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/signin",
                serde_json::json!({ "email": "nobody@example.com", "password": "whatever1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(Request::get("/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_up_validation_error() {
        let store = SessionStore::new(Arc::new(MemoryAuthRepository::new()));
        let app = auth_router(store, RouteTable::standard());

        let response = app
            .oneshot(json_request(
                "POST",
                "/signup",
                serde_json::json!({
                    "email": "builder@example.com",
                    "password": "short",
                    "fullName": "Ada",
                    "role": "builder"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
