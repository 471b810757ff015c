//! Application wiring.

use axum::Router;
use std::future::Future;
use std::sync::Arc;
use todos_config::AppConfig;
use todos_core::{TodosError, TodosResult};
use todos_rest::{create_router, AppState};
use todos_security::TokenValidator;
use todos_service::{LocalFallbackStore, RedisRemoteCache, RemoteCache, TodoServiceImpl};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// A fully wired application, ready to serve.
pub struct App {
    router: Router,
    remote: Arc<RedisRemoteCache>,
    health_probe: Option<JoinHandle<()>>,
}

impl App {
    /// Connects to Redis and builds the router.
    ///
    /// Does not wait for Redis: the service starts on the local store while
    /// the connect task and the health probe reach for it in the background.
    pub async fn build(config: &AppConfig) -> TodosResult<Self> {
        let remote = Arc::new(RedisRemoteCache::connect(&config.redis).await?);
        let health_probe = remote.spawn_health_probe(config.redis.health_check_interval());

        let local = Arc::new(LocalFallbackStore::new());
        let remote_cache: Arc<dyn RemoteCache> = remote.clone();
        let todo_service = TodoServiceImpl::from_config(
            remote_cache.clone(),
            local,
            &config.cache,
            &config.audit,
        );

        let token_validator = Arc::new(TokenValidator::new(&config.security));
        let state = AppState::new(Arc::new(todo_service), remote_cache);
        let router = create_router(state, token_validator, &config.server);

        Ok(Self {
            router,
            remote,
            health_probe,
        })
    }

    /// Name of the tier currently serving reads.
    #[must_use]
    pub fn cache_mode(&self) -> &'static str {
        if self.remote.is_connected() {
            "remote"
        } else {
            "local"
        }
    }

    /// The application router.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves on `listener` until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> TodosResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| TodosError::Internal(format!("REST server error: {}", e)));

        if let Some(probe) = self.health_probe {
            probe.abort();
        }
        info!("Server shutdown complete");
        result
    }
}

/// Binds the configured address.
pub async fn bind(config: &AppConfig) -> TodosResult<TcpListener> {
    let addr = config.server.addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| TodosError::Internal(format!("Failed to bind {}: {}", addr, e)))
}
