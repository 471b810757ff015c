//! Todo service trait definition.

use crate::dto::CreateTodoRequest;
use async_trait::async_trait;
use todos_core::{Todo, TodoId, TodosResult};

/// Todo operations for an already-authenticated user.
///
/// `user_id` is trusted verbatim as the namespace of the user's collection.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Lists the user's todos in ascending id order.
    async fn list_todos(&self, user_id: &str) -> TodosResult<Vec<Todo>>;

    /// Creates a todo with the request's trimmed content.
    async fn create_todo(&self, user_id: &str, request: CreateTodoRequest) -> TodosResult<Todo>;

    /// Deletes a todo.
    async fn delete_todo(&self, user_id: &str, task_id: TodoId) -> TodosResult<()>;
}
