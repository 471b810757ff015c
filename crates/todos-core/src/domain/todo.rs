//! Todo items and the per-user collection that owns them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use crate::{TodosError, TodosResult};

/// Contents of the three items every new collection starts with.
pub const SEED_CONTENTS: [&str; 3] = ["Create new todo", "Update me", "Delete example ones"];

/// A strongly-typed wrapper for todo identifiers.
///
/// Serialized as a bare number, and as a string when used as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` once the
    /// id space is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, unique within the owning collection.
    pub id: TodoId,
    /// Trimmed, non-empty text.
    pub content: String,
}

impl Todo {
    /// Creates a new todo.
    #[must_use]
    pub fn new(id: TodoId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// All todos belonging to one user, as stored in the cache tiers.
///
/// The JSON form is `{"items": {"1": {...}}, "lastInsertedID": 4}` and must
/// stay stable for anything else reading the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCollection {
    /// Items keyed by their own id.
    pub items: BTreeMap<TodoId, Todo>,
    /// Next id to hand out. Never decreases, never reused.
    #[serde(rename = "lastInsertedID")]
    pub last_inserted_id: TodoId,
}

impl TodoCollection {
    /// Builds the default collection handed to users with no cached data.
    #[must_use]
    pub fn seed() -> Self {
        let items = SEED_CONTENTS
            .iter()
            .zip(1u64..)
            .map(|(content, id)| (TodoId(id), Todo::new(TodoId(id), *content)))
            .collect();

        Self {
            items,
            last_inserted_id: TodoId(SEED_CONTENTS.len() as u64 + 1),
        }
    }

    /// Appends a todo under the next free id and advances the counter.
    ///
    /// Fails without touching the collection when the counter cannot advance.
    pub fn insert(&mut self, content: impl Into<String>) -> TodosResult<Todo> {
        let next = self
            .last_inserted_id
            .next()
            .ok_or_else(|| TodosError::internal("Todo id counter exhausted"))?;

        let todo = Todo::new(self.last_inserted_id, content);
        self.items.insert(todo.id, todo.clone());
        self.last_inserted_id = next;
        Ok(todo)
    }

    /// Removes a todo, returning it if it existed.
    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        self.items.remove(&id)
    }

    /// Checks whether a todo with this id exists.
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.items.contains_key(&id)
    }

    /// Returns the todos in ascending id order.
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.items.values().cloned().collect()
    }

    /// Number of todos in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection holds no todos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks that every key matches its todo's id, that no id is at or
    /// beyond the next id to be assigned, and that the counter can still
    /// advance.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.last_inserted_id.next().is_some()
            && self
                .items
                .iter()
                .all(|(key, todo)| *key == todo.id && todo.id < self.last_inserted_id)
    }
}
