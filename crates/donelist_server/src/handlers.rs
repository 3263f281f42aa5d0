//! Route handlers mapping HTTP requests to manager operations.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use donelist_core::{Todo, TodoCleanup, TodoFind, TodoId, TodoModification, TodoRegistry};
use serde::{Deserialize, Serialize};

/// Body for `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

/// Body for `PUT /todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: String,
    pub completed: bool,
}

/// Query for `DELETE /todos`.
#[derive(Debug, Deserialize)]
pub struct ClearCompletedParams {
    pub completed: Option<bool>,
}

/// Response for the bulk-clear endpoint.
#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

pub(crate) async fn healthz_handler() -> &'static str {
    donelist_core::ping()
}

pub(crate) async fn list_todos_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    let todos = state.manager.all()?;
    Ok(Json(todos))
}

pub(crate) async fn get_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<Json<Todo>> {
    let todo = state.manager.by_id(id)?;
    Ok(Json(todo))
}

pub(crate) async fn create_todo_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let id = state.manager.register(&request.text)?;
    let todo = state.manager.by_id(id)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub(crate) async fn update_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    Json(request): Json<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    state
        .manager
        .modify(id, &request.text, request.completed)?;
    let todo = state.manager.by_id(id)?;
    Ok(Json(todo))
}

pub(crate) async fn delete_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<StatusCode> {
    state.manager.clear(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn clear_completed_handler(
    State(state): State<AppState>,
    Query(params): Query<ClearCompletedParams>,
) -> ApiResult<Json<ClearedResponse>> {
    if params.completed != Some(true) {
        return Err(ApiError::BadRequest(
            "bulk delete requires the query flag completed=true".to_string(),
        ));
    }

    let cleared = state.manager.clear_all_completed()?;
    Ok(Json(ClearedResponse { cleared }))
}
