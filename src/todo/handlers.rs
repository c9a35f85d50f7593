use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{TodoDraft, TodoModel, TodoPayload},
    service::TodoService,
};
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};

fn parse_todo_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid todo id".to_string()))
}

/// HTTP handler for creating a todo owned by the caller
///
/// POST /todos
/// Returns 201 with the stored todo
#[instrument(name = "create_todo", skip_all)]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoModel>), AppError> {
    let Json(payload) = payload?;
    let draft = TodoDraft::try_from(payload)?;

    let service = TodoService::new(Arc::clone(&state.store));
    let todo = service.create_todo(&user, draft).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// HTTP handler for listing the caller's todos
///
/// GET /todos
#[instrument(name = "list_todos", skip_all)]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TodoModel>>, AppError> {
    let service = TodoService::new(Arc::clone(&state.store));
    let todos = service.list_todos(&user).await?;

    info!(
        user_id = user.id,
        todo_count = todos.len(),
        "Todos listed successfully"
    );

    Ok(Json(todos))
}

/// HTTP handler for replacing one of the caller's todos
///
/// PUT /todos/{id}
/// Returns 201 with the updated todo
#[instrument(name = "update_todo", skip(state, user, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoModel>), AppError> {
    let todo_id = parse_todo_id(&id)?;
    let Json(payload) = payload?;
    let draft = TodoDraft::try_from(payload)?;

    let service = TodoService::new(Arc::clone(&state.store));
    let todo = service.update_todo(&user, todo_id, draft).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// HTTP handler for deleting one of the caller's todos
///
/// DELETE /todos/{id}
#[instrument(name = "delete_todo", skip(state, user))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let todo_id = parse_todo_id(&id)?;

    let service = TodoService::new(Arc::clone(&state.store));
    service.delete_todo(&user, todo_id).await?;

    Ok(Json(json!({
        "message": format!("Todo deleted successfully. ID: {}", todo_id)
    })))
}
