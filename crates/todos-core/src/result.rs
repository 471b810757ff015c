//! Result type aliases for the todos service.

use crate::TodosError;

/// A specialized `Result` type for todos operations.
pub type TodosResult<T> = Result<T, TodosError>;
