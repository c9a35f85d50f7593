use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    models::{Credentials, RegisterRequest, UserResponse},
    service::UserService,
};
use crate::session::LoginResponse;
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a user
///
/// POST /users
/// Returns 201 with the user, without the password
#[instrument(name = "create_user", skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(request) = payload?;

    let service = UserService::new(Arc::clone(&state.store), state.token_config.clone());
    let user = service.register(request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// HTTP handler for logging in
///
/// POST /users/login
/// Returns a bearer token valid for the configured window
#[instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(credentials) = payload?;

    let service = UserService::new(Arc::clone(&state.store), state.token_config.clone());
    let response = service.login(credentials).await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{body_json, AppStateBuilder};
    use crate::store::InMemoryStore;
    use axum::{
        body::Body,
        http::{header, Request},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let state = AppStateBuilder::new()
            .with_store(Arc::new(InMemoryStore::new()))
            .build();
        crate::build_router(state)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_user_handler() {
        let response = app()
            .oneshot(post(
                "/users",
                r#"{"username": "alice", "email": "a@b.com", "password": "password1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "a@b.com");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let response = app()
            .oneshot(post("/users", r#"{"email": "nope", "password": "short"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "email": "Not a valid email address",
                "password": "This field must be longer than 8 characters"
            })
        );
    }

    #[tokio::test]
    async fn test_create_user_malformed_json() {
        let response = app()
            .oneshot(post("/users", r#"{"email": "#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid request payload" })
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = app();
        let body = r#"{"email": "a@b.com", "password": "password1"}"#;

        let first = app.clone().oneshot(post("/users", body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.oneshot(post("/users", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(second).await,
            json!({ "error": "Email already registered" })
        );
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let app = app();
        app.clone()
            .oneshot(post(
                "/users",
                r#"{"email": "a@b.com", "password": "password1"}"#,
            ))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post(
                "/users/login",
                r#"{"email": "a@b.com", "password": "password2"}"#,
            ))
            .await
            .unwrap();
        let unknown_email = app
            .oneshot(post(
                "/users/login",
                r#"{"email": "z@b.com", "password": "password1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        let expected = json!({ "message": "Wrong email or password" });
        assert_eq!(body_json(wrong_password).await, expected);
        assert_eq!(body_json(unknown_email).await, expected);
    }
}
