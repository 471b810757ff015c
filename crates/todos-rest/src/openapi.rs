//! OpenAPI documentation configuration.

use crate::controllers::{
    health_controller::{HealthResponse, ReadinessResponse},
    root_controller::ServiceDescriptor,
};
use todos_core::{ErrorResponse, FieldError, TodoId};
use todos_service::{CreateTodoRequest, TodoResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the todos API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todos API",
        version = "1.0.0",
        description = "Per-user todo lists served cache-aside from Redis with an in-process fallback"
    ),
    paths(
        // Todo endpoints
        crate::controllers::todo_controller::list_todos,
        crate::controllers::todo_controller::create_todo,
        crate::controllers::todo_controller::delete_todo,
        // Health endpoints
        crate::controllers::root_controller::root,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            TodoId,
            ErrorResponse,
            FieldError,
            CreateTodoRequest,
            TodoResponse,
            HealthResponse,
            ReadinessResponse,
            ServiceDescriptor,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "todos", description = "Todo list endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}
