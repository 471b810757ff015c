//! Audit events emitted for mutating todo operations.

use super::TodoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutating operation recorded in the audit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationName {
    /// A todo was created.
    Create,
    /// A todo was deleted.
    Delete,
}

impl OperationName {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event published to the audit channel.
///
/// Field names are fixed by the consumers of the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Operation performed.
    #[serde(rename = "opName")]
    pub op_name: OperationName,
    /// User that owns the collection.
    pub username: String,
    /// Todo affected by the operation.
    #[serde(rename = "todoId")]
    pub todo_id: TodoId,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(op_name: OperationName, username: impl Into<String>, todo_id: TodoId) -> Self {
        Self::at(op_name, username, todo_id, Utc::now())
    }

    /// Creates an event stamped with the given time.
    #[must_use]
    pub fn at(
        op_name: OperationName,
        username: impl Into<String>,
        todo_id: TodoId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            op_name,
            username: username.into(),
            todo_id,
            ts: timestamp.timestamp_millis(),
        }
    }

    /// Serializes the event to its JSON wire form.
    pub fn to_json(&self) -> crate::TodosResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
