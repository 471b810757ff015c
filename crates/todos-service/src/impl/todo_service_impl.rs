//! Todo service implementation.

use crate::audit::AuditPublisher;
use crate::cache::{LocalFallbackStore, RemoteCache};
use crate::dto::{CreateTodoRequest, CONTENT_REQUIRED};
use crate::gate::MutationGate;
use crate::store::TodoStore;
use crate::todo_service::TodoService;
use async_trait::async_trait;
use std::sync::Arc;
use todos_config::{AuditConfig, CacheConfig};
use todos_core::{OperationName, Todo, TodoId, TodosError, TodosResult, ValidateExt};
use tracing::{debug, info};

/// Todo service running each operation as one gated read-modify-write.
#[derive(Debug)]
pub struct TodoServiceImpl {
    store: TodoStore,
    gate: MutationGate,
    audit: AuditPublisher,
}

impl TodoServiceImpl {
    /// Creates a new todo service.
    pub fn new(store: TodoStore, audit: AuditPublisher) -> Self {
        Self {
            store,
            gate: MutationGate::new(),
            audit,
        }
    }

    /// Wires the store and audit publisher over one remote cache.
    pub fn from_config(
        remote: Arc<dyn RemoteCache>,
        local: Arc<LocalFallbackStore>,
        cache: &CacheConfig,
        audit: &AuditConfig,
    ) -> Self {
        let store = TodoStore::new(remote.clone(), local, cache);
        let audit = AuditPublisher::new(remote, audit);
        Self::new(store, audit)
    }

    /// The gate guarding every operation.
    #[must_use]
    pub fn gate(&self) -> &MutationGate {
        &self.gate
    }
}

#[async_trait]
impl TodoService for TodoServiceImpl {
    async fn list_todos(&self, user_id: &str) -> TodosResult<Vec<Todo>> {
        debug!("Listing todos for user: {}", user_id);

        let _guard = self.gate.acquire().await;
        let loaded = self.store.load_collection(user_id).await;
        debug!(source = ?loaded.source, count = loaded.collection.len(), "Todos loaded");

        Ok(loaded.collection.todos())
    }

    async fn create_todo(&self, user_id: &str, request: CreateTodoRequest) -> TodosResult<Todo> {
        debug!("Creating todo for user: {}", user_id);

        let todo = {
            let _guard = self.gate.acquire().await;

            request.validate_request()?;
            let Some(content) = request.trimmed_content() else {
                return Err(TodosError::validation(CONTENT_REQUIRED));
            };

            let mut collection = self.store.load_collection(user_id).await.collection;
            let todo = collection.insert(content)?;
            let target = self.store.save_collection(user_id, &collection).await;
            debug!(?target, "Collection saved");
            todo
        };

        info!("Todo {} created for user {}", todo.id, user_id);
        self.audit.publish(OperationName::Create, user_id, todo.id);
        Ok(todo)
    }

    async fn delete_todo(&self, user_id: &str, task_id: TodoId) -> TodosResult<()> {
        debug!("Deleting todo {} for user: {}", task_id, user_id);

        {
            let _guard = self.gate.acquire().await;

            let mut collection = self.store.load_collection(user_id).await.collection;
            if collection.remove(task_id).is_none() {
                return Err(TodosError::not_found("Todo", task_id));
            }
            let target = self.store.save_collection(user_id, &collection).await;
            debug!(?target, "Collection saved");
        }

        info!("Todo {} deleted for user {}", task_id, user_id);
        self.audit.publish(OperationName::Delete, user_id, task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRemoteCache;
    use std::time::Duration;
    use todos_core::TodoCollection;

    struct Fixture {
        service: Arc<TodoServiceImpl>,
        remote: Arc<InMemoryRemoteCache>,
        local: Arc<LocalFallbackStore>,
    }

    fn fixture(remote: InMemoryRemoteCache) -> Fixture {
        let remote = Arc::new(remote);
        let local = Arc::new(LocalFallbackStore::new());
        let service = TodoServiceImpl::from_config(
            remote.clone(),
            local.clone(),
            &CacheConfig::default(),
            &AuditConfig::default(),
        );
        Fixture {
            service: Arc::new(service),
            remote,
            local,
        }
    }

    fn ids(todos: &[Todo]) -> Vec<u64> {
        todos.iter().map(|t| t.id.value()).collect()
    }

    fn stored(remote: &InMemoryRemoteCache, user: &str) -> TodoCollection {
        let raw = remote.value(&format!("todos:user:{user}")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_list_fresh_user_returns_seed() {
        let f = fixture(InMemoryRemoteCache::new());

        let todos = f.service.list_todos("alice").await.unwrap();
        assert_eq!(ids(&todos), vec![1, 2, 3]);
        assert_eq!(todos[0].content, "Create new todo");
        assert_eq!(stored(&f.remote, "alice").last_inserted_id, TodoId(4));
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let f = fixture(InMemoryRemoteCache::new());

        let x = f.service.create_todo("alice", CreateTodoRequest::new("x")).await.unwrap();
        let y = f.service.create_todo("alice", CreateTodoRequest::new("y")).await.unwrap();
        assert_eq!(x.id, TodoId(4));
        assert_eq!(y.id, TodoId(5));

        let todos = f.service.list_todos("alice").await.unwrap();
        assert_eq!(ids(&todos), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_create_over_exhausted_cached_counter_starts_fresh() {
        let f = fixture(InMemoryRemoteCache::new());
        f.remote.insert_raw(
            "todos:user:zed",
            r#"{"items":{},"lastInsertedID":18446744073709551615}"#,
        );

        let todo = f.service.create_todo("zed", CreateTodoRequest::new("x")).await.unwrap();
        assert_eq!(todo.id, TodoId(4));
        assert_eq!(stored(&f.remote, "zed").last_inserted_id, TodoId(5));
    }

    #[tokio::test]
    async fn test_create_stores_trimmed_content() {
        let f = fixture(InMemoryRemoteCache::new());

        let todo = f
            .service
            .create_todo("alice", CreateTodoRequest::new("  padded  "))
            .await
            .unwrap();
        assert_eq!(todo.content, "padded");
        assert_eq!(stored(&f.remote, "alice").items[&todo.id].content, "padded");
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let f = fixture(InMemoryRemoteCache::new());

        let x = f.service.create_todo("bob", CreateTodoRequest::new("x")).await.unwrap();
        f.service.delete_todo("bob", x.id).await.unwrap();
        let y = f.service.create_todo("bob", CreateTodoRequest::new("y")).await.unwrap();

        assert_eq!(y.id, TodoId(5));
        assert_eq!(ids(&f.service.list_todos("bob").await.unwrap()), vec![1, 2, 3, 5]);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let f = fixture(InMemoryRemoteCache::new());

        f.service.delete_todo("carol", TodoId(2)).await.unwrap();
        assert_eq!(ids(&f.service.list_todos("carol").await.unwrap()), vec![1, 3]);
        assert_eq!(stored(&f.remote, "carol").last_inserted_id, TodoId(4));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let f = fixture(InMemoryRemoteCache::new());
        f.service.list_todos("dave").await.unwrap();
        let sets_before = f.remote.set_calls();

        let err = f.service.delete_todo("dave", TodoId(42)).await.unwrap_err();
        assert!(matches!(err, TodosError::NotFound { resource_type: "Todo", .. }));
        assert_eq!(err.public_message(), "Todo not found");

        assert_eq!(f.remote.set_calls(), sets_before);
        assert_eq!(ids(&f.service.list_todos("dave").await.unwrap()), vec![1, 2, 3]);
        assert!(!f.service.gate().is_held());
        assert_eq!(f.remote.publish_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_content_touches_nothing() {
        let f = fixture(InMemoryRemoteCache::new());

        for request in [
            CreateTodoRequest::new(""),
            CreateTodoRequest::new("   "),
            CreateTodoRequest::default(),
        ] {
            let err = f.service.create_todo("erin", request).await.unwrap_err();
            assert!(matches!(err, TodosError::Validation(_)));
        }

        let non_string: CreateTodoRequest = serde_json::from_str(r#"{"content":42}"#).unwrap();
        assert!(f.service.create_todo("erin", non_string).await.is_err());

        assert_eq!(f.remote.get_calls(), 0);
        assert_eq!(f.remote.set_calls(), 0);
        assert!(f.local.is_empty());
        assert!(!f.service.gate().is_held());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(f.remote.publish_calls(), 0);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let f = fixture(InMemoryRemoteCache::new());

        f.service.create_todo("frank", CreateTodoRequest::new("mine")).await.unwrap();
        assert_eq!(ids(&f.service.list_todos("gina").await.unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&f.service.list_todos("frank").await.unwrap()), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_overlapping_creates_get_distinct_ids() {
        let remote = InMemoryRemoteCache::new();
        remote.set_delay(Duration::from_millis(10));
        let f = fixture(remote);

        let a = {
            let service = f.service.clone();
            tokio::spawn(async move { service.create_todo("hank", CreateTodoRequest::new("a")).await })
        };
        let b = {
            let service = f.service.clone();
            tokio::spawn(async move { service.create_todo("hank", CreateTodoRequest::new("b")).await })
        };

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();
        assert_ne!(a.id, b.id);

        let collection = stored(&f.remote, "hank");
        assert_eq!(collection.last_inserted_id, TodoId(6));
        assert_eq!(collection.len(), 5);
    }

    #[tokio::test]
    async fn test_many_concurrent_creates_across_users() {
        let f = fixture(InMemoryRemoteCache::new());

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = f.service.clone();
            let user = if i % 2 == 0 { "ivy" } else { "jack" };
            handles.push(tokio::spawn(async move {
                service.create_todo(user, CreateTodoRequest::new(format!("item {i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for user in ["ivy", "jack"] {
            let collection = stored(&f.remote, user);
            assert_eq!(collection.last_inserted_id, TodoId(14));
            assert_eq!(collection.len(), 13);
            assert!(collection.is_consistent());
        }
    }

    #[tokio::test]
    async fn test_disconnected_operations_use_local_store() {
        let f = fixture(InMemoryRemoteCache::disconnected());

        let todo = f.service.create_todo("kim", CreateTodoRequest::new("offline")).await.unwrap();
        assert_eq!(todo.id, TodoId(4));
        f.service.delete_todo("kim", TodoId(1)).await.unwrap();

        assert_eq!(ids(&f.service.list_todos("kim").await.unwrap()), vec![2, 3, 4]);
        assert_eq!(f.local.get("kim").unwrap().len(), 3);
        assert_eq!(f.remote.get_calls(), 0);
        assert_eq!(f.remote.set_calls(), 0);
        assert_eq!(f.remote.publish_calls(), 0);
    }

    #[tokio::test]
    async fn test_local_data_visible_after_disconnect() {
        let f = fixture(InMemoryRemoteCache::new());
        f.remote.fail_sets(true);

        f.service.create_todo("lee", CreateTodoRequest::new("kept locally")).await.unwrap();
        assert!(f.local.get("lee").is_some());

        f.remote.fail_sets(false);
        f.remote.set_connected(false);

        let todos = f.service.list_todos("lee").await.unwrap();
        assert_eq!(ids(&todos), vec![1, 2, 3, 4]);
        assert_eq!(todos[3].content, "kept locally");
    }

    #[tokio::test]
    async fn test_create_and_delete_publish_one_event_each() {
        let f = fixture(InMemoryRemoteCache::new());

        let todo = f.service.create_todo("max", CreateTodoRequest::new("x")).await.unwrap();
        assert!(f.remote.wait_for_publish_calls(1).await);
        f.service.delete_todo("max", todo.id).await.unwrap();
        assert!(f.remote.wait_for_publish_calls(2).await);

        let published = f.remote.published();
        assert_eq!(published.len(), 2);

        let create: serde_json::Value = serde_json::from_str(&published[0].1).unwrap();
        assert_eq!(published[0].0, "log_channel");
        assert_eq!(create["opName"], "CREATE");
        assert_eq!(create["username"], "max");
        assert_eq!(create["todoId"], 4);

        let delete: serde_json::Value = serde_json::from_str(&published[1].1).unwrap();
        assert_eq!(delete["opName"], "DELETE");
        assert_eq!(delete["todoId"], 4);
    }

    #[tokio::test]
    async fn test_list_does_not_publish() {
        let f = fixture(InMemoryRemoteCache::new());
        f.service.list_todos("ned").await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(f.remote.publish_calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_publish_does_not_change_result() {
        let f = fixture(InMemoryRemoteCache::new());
        f.remote.fail_publishes(true);

        let todo = f.service.create_todo("ola", CreateTodoRequest::new("x")).await.unwrap();
        assert_eq!(todo.id, TodoId(4));
        assert!(f.remote.wait_for_publish_calls(1).await);
        assert!(f.remote.published().is_empty());

        assert!(f.service.delete_todo("ola", todo.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_slow_publish_does_not_block_operation() {
        let f = fixture(InMemoryRemoteCache::new());
        f.service.list_todos("pat").await.unwrap();
        f.remote.set_delay(Duration::from_millis(200));

        let started = std::time::Instant::now();
        // Load and save each pay the delay; the publish must not.
        f.service.create_todo("pat", CreateTodoRequest::new("x")).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(600));
        assert!(!f.service.gate().is_held());
    }

    #[tokio::test]
    async fn test_ttl_expiry_reseeds_same_defaults() {
        let f = fixture(InMemoryRemoteCache::new());

        f.service.create_todo("quin", CreateTodoRequest::new("gone soon")).await.unwrap();
        f.remote.expire("todos:user:quin");

        let todos = f.service.list_todos("quin").await.unwrap();
        assert_eq!(todos, TodoCollection::seed().todos());
    }
}
