//! Service descriptor served at `/`.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Describes the service and its endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDescriptor {
    pub service: String,
    pub message: String,
    pub endpoints: Vec<String>,
    pub cache: String,
    /// Tier currently serving reads, "remote" or "local".
    pub cache_mode: String,
    pub status: String,
}

/// Root endpoint handler.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service descriptor", body = ServiceDescriptor)
    )
)]
pub async fn root(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: "todos-api".to_string(),
        message: "Cache-Aside Pattern Implementation".to_string(),
        endpoints: vec![
            "GET /todos - List all todos (Cache-Aside pattern)".to_string(),
            "POST /todos - Create new todo".to_string(),
            "DELETE /todos/:taskId - Delete todo".to_string(),
        ],
        cache: "Redis with in-process fallback".to_string(),
        cache_mode: state.cache_mode().to_string(),
        status: "running".to_string(),
    })
}
