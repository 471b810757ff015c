//! Application state for Axum handlers.

use std::sync::Arc;
use todos_service::{RemoteCache, TodoService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub todo_service: Arc<dyn TodoService>,
    /// Consulted for connectivity reporting only.
    pub remote_cache: Arc<dyn RemoteCache>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(todo_service: Arc<dyn TodoService>, remote_cache: Arc<dyn RemoteCache>) -> Self {
        Self {
            todo_service,
            remote_cache,
        }
    }

    /// Name of the tier currently serving reads.
    #[must_use]
    pub fn cache_mode(&self) -> &'static str {
        if self.remote_cache.is_connected() {
            "remote"
        } else {
            "local"
        }
    }
}
