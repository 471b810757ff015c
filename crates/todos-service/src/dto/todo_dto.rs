//! Todo-related DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use todos_core::rules::not_blank;
use todos_core::{Todo, TodoId};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Message returned for any unusable `content`.
pub const CONTENT_REQUIRED: &str = "Content is required and must be a string";

/// Request to create a new todo.
///
/// A `content` that is missing, `null` or not a string deserializes to
/// `None` and is rejected by validation rather than by the JSON parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    #[validate(required(message = "Content is required and must be a string"), custom(function = "validate_content"))]
    pub content: Option<String>,
}

impl CreateTodoRequest {
    /// Creates a request with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Returns the trimmed content, if any.
    #[must_use]
    pub fn trimmed_content(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim)
    }
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    not_blank(content).map_err(|e| e.with_message(Cow::Borrowed(CONTENT_REQUIRED)))
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Todo response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub id: TodoId,
    pub content: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            content: todo.content,
        }
    }
}
