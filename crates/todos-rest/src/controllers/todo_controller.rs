//! Todo controller.

use crate::{
    extractors::AuthenticatedUser,
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use todos_core::{TodoId, TodosError};
use todos_service::{CreateTodoRequest, TodoResponse, CONTENT_REQUIRED};
use tracing::debug;

/// Creates the todo router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:task_id", delete(delete_todo))
}

/// List the caller's todos.
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todos in ascending id order", body = [TodoResponse]),
        (status = 401, description = "Missing or invalid token", body = todos_core::ErrorResponse)
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Vec<TodoResponse>> {
    debug!("List todos request: {}", user.username());

    let todos = state.todo_service.list_todos(user.username()).await?;
    ok(todos.into_iter().map(TodoResponse::from).collect())
}

/// Create a todo.
///
/// Any body that does not parse into an object is reported the same way as
/// missing content.
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    security(("bearer_auth" = [])),
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Created todo", body = TodoResponse),
        (status = 400, description = "Content missing, blank or not a string", body = todos_core::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = todos_core::ErrorResponse)
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected todo body: {}", rejection);
        AppError(TodosError::validation(CONTENT_REQUIRED))
    })?;
    debug!("Create todo request: {}", user.username());

    let todo = state.todo_service.create_todo(user.username(), request).await?;
    ok(TodoResponse::from(todo))
}

/// Delete a todo.
#[utoipa::path(
    delete,
    path = "/todos/{task_id}",
    tag = "todos",
    security(("bearer_auth" = [])),
    params(
        ("task_id" = String, Path, description = "Todo id")
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found", body = todos_core::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = todos_core::ErrorResponse)
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete todo request: {} {}", user.username(), task_id);

    let id = parse_task_id(&task_id)?;
    state.todo_service.delete_todo(user.username(), id).await?;
    Ok(no_content())
}

/// Parses a path id. Only the canonical decimal form of an id names a
/// todo, so `+4`, `04` and ` 4` do not match todo 4.
fn parse_task_id(raw: &str) -> Result<TodoId, AppError> {
    raw.parse::<TodoId>()
        .ok()
        .filter(|id| id.to_string() == raw)
        .ok_or_else(|| AppError(TodosError::not_found("Todo", raw)))
}
