//! In-process fallback tier.

use parking_lot::RwLock;
use std::collections::HashMap;
use todos_core::TodoCollection;

/// Process-local collections keyed by user id.
///
/// Entries never expire and are lost on restart.
#[derive(Debug, Default)]
pub struct LocalFallbackStore {
    entries: RwLock<HashMap<String, TodoCollection>>,
}

impl LocalFallbackStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the user's collection.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<TodoCollection> {
        self.entries.read().get(user_id).cloned()
    }

    /// Stores the user's collection, replacing any previous one.
    pub fn put(&self, user_id: &str, collection: TodoCollection) {
        self.entries.write().insert(user_id.to_string(), collection);
    }

    /// Number of users with a local collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no collection is stored locally.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
