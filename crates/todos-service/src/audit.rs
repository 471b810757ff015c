//! Fire-and-forget audit publishing.

use crate::cache::RemoteCache;
use std::sync::Arc;
use todos_config::AuditConfig;
use todos_core::{AuditEvent, OperationName, TodoId};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Publishes audit events for mutating operations.
///
/// Publishing never blocks or fails the operation that triggered it.
#[derive(Clone)]
pub struct AuditPublisher {
    remote: Arc<dyn RemoteCache>,
    channel: String,
    enabled: bool,
}

impl AuditPublisher {
    /// Creates a publisher sending to the configured channel.
    pub fn new(remote: Arc<dyn RemoteCache>, config: &AuditConfig) -> Self {
        Self {
            remote,
            channel: config.channel.clone(),
            enabled: config.enabled,
        }
    }

    /// Channel receiving the events.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Publishes an event stamped with the current time on a detached task.
    ///
    /// Returns the task handle, or `None` when nothing was sent because
    /// auditing is disabled or the remote cache is disconnected.
    pub fn publish(
        &self,
        op_name: OperationName,
        username: &str,
        todo_id: TodoId,
    ) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }
        if !self.remote.is_connected() {
            debug!(op = %op_name, todo_id = %todo_id, "Remote cache disconnected, audit event dropped");
            return None;
        }

        let payload = match AuditEvent::now(op_name, username, todo_id).to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return None;
            }
        };

        let remote = self.remote.clone();
        let channel = self.channel.clone();
        Some(tokio::spawn(async move {
            match remote.publish(&channel, &payload).await {
                Ok(()) => debug!(channel = %channel, "Audit event published"),
                Err(e) => warn!(channel = %channel, "Failed to publish audit event: {}", e),
            }
        }))
    }
}

impl std::fmt::Debug for AuditPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditPublisher")
            .field("channel", &self.channel)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
