//! Timeout wrapper for async operations.

use std::time::Duration;
use todos_core::TodosError;

/// Wraps an async operation with a timeout.
///
/// An elapsed deadline becomes `TodosError::Timeout`; the inner future is
/// dropped at that point.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, TodosError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, TodosError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| TodosError::Timeout(format!("Operation timed out after {:?}", duration)))?
}
