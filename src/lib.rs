// Library crate for the todo service
// This file exposes the router and public API for main.rs and integration tests

pub mod config;
pub mod session;
pub mod shared;
pub mod store;
pub mod todo;
pub mod user;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use session::TokenConfig;
pub use shared::{AppError, AppState};
pub use store::{InMemoryStore, PostgresStore, Store};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Builds the HTTP routes around the given state.
///
/// Todo routes sit behind `session::jwt_auth`; user routes and the health check are open.
pub fn build_router(state: AppState) -> Router {
    let todo_routes = Router::new()
        .route("/todos", post(todo::create_todo).get(todo::list_todos))
        .route("/todos/:id", put(todo::update_todo).delete(todo::delete_todo))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/users", post(user::create_user))
        .route("/users/login", post(user::login))
        .merge(todo_routes)
        .fallback(route_not_found)
        .with_state(state)
}

/// The router with a per-request timeout, every error response rendered as JSON
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(shared::json_error_bodies))
}
