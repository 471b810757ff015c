//! Redis-based remote cache.

use super::RemoteCache;
use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands, RedisError};
use deadpool_redis::{Config as PoolSettings, Connection, Pool, PoolConfig, Runtime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todos_config::RedisConfig;
use todos_core::{TodosError, TodosResult};
use todos_resilience::{with_timeout, RetryPolicy};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Redis-backed [`RemoteCache`].
///
/// Tracks connectivity in a shared flag: connection-class failures and
/// timeouts clear it, a successful health probe sets it again.
#[derive(Clone)]
pub struct RedisRemoteCache {
    /// Redis connection pool. `None` when Redis is disabled.
    pool: Option<Pool>,
    connected: Arc<AtomicBool>,
    command_timeout: Duration,
}

impl RedisRemoteCache {
    /// Builds the pool and starts reaching for Redis in the background.
    ///
    /// Returns as soon as the pool exists. The client starts disconnected
    /// and serves from the local store until a PING succeeds, either from
    /// the initial connect task or later from the health probe. Only an
    /// unusable configuration fails.
    pub async fn connect(config: &RedisConfig) -> TodosResult<Self> {
        if !config.enabled {
            info!("Redis disabled, using the local store only");
            return Ok(Self::disabled());
        }

        let url = config.connection_url()?;
        let mut settings = PoolSettings::from_url(url);
        settings.pool = Some(PoolConfig::new(config.pool_size));
        let pool = settings
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| TodosError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        let cache = Self::with_pool(pool, config.command_timeout());
        cache.spawn_initial_connect(config.connect_max_attempts);

        Ok(cache)
    }

    /// Retries PING with backoff on a detached task until it succeeds or
    /// `max_attempts` run out.
    pub fn spawn_initial_connect(&self, max_attempts: u32) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let policy = RetryPolicy::connection(max_attempts);
            match policy.execute_if(|| cache.ping(), TodosError::is_retriable).await {
                Ok(()) => info!("Connected to Redis"),
                Err(e) => warn!(
                    "Redis unreachable after {} attempts, serving from the local store: {}",
                    max_attempts, e
                ),
            }
        })
    }

    /// Wraps an existing pool. Starts disconnected until a ping succeeds.
    #[must_use]
    pub fn with_pool(pool: Pool, command_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            connected: Arc::new(AtomicBool::new(false)),
            command_timeout,
        }
    }

    /// Create a client that is never connected (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            connected: Arc::new(AtomicBool::new(false)),
            command_timeout: Duration::from_millis(2000),
        }
    }

    /// Returns true if a pool is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Sends `PING` and updates the connectivity flag from the outcome.
    pub async fn ping(&self) -> TodosResult<()> {
        let result = with_timeout(self.command_timeout, || async {
            let mut conn = self.get_conn().await?;
            let _: String = redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map_err(|e| self.command_error("PING", e))?;
            Ok(())
        })
        .await;

        match &result {
            Ok(()) => self.mark_connected(),
            Err(e) => self.record_failure(e),
        }
        result
    }

    /// Spawns the background connectivity probe.
    ///
    /// Returns `None` when Redis is disabled.
    pub fn spawn_health_probe(&self, interval: Duration) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            return None;
        }

        let cache = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = cache.ping().await {
                    debug!("Redis health probe failed: {}", e);
                }
            }
        }))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> TodosResult<Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                self.mark_disconnected();
                TodosError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(TodosError::Cache("Cache is disabled".to_string())),
        }
    }

    fn command_error(&self, op: &str, e: RedisError) -> TodosError {
        if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            self.mark_disconnected();
        }
        TodosError::Cache(format!("{} failed: {}", op, e))
    }

    fn record_failure(&self, e: &TodosError) {
        if matches!(e, TodosError::Timeout(_)) {
            self.mark_disconnected();
        }
    }

    fn mark_connected(&self) {
        if !self.connected.swap(true, Ordering::AcqRel) {
            info!("Redis connection established");
        }
    }

    fn mark_disconnected(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            warn!("Redis connection lost, falling back to the local store");
        }
    }
}

#[async_trait]
impl RemoteCache for RedisRemoteCache {
    fn is_connected(&self) -> bool {
        self.is_enabled() && self.connected.load(Ordering::Acquire)
    }

    async fn get(&self, key: &str) -> TodosResult<Option<String>> {
        let result = with_timeout(self.command_timeout, || async {
            let mut conn = self.get_conn().await?;
            conn.get::<_, Option<String>>(key)
                .await
                .map_err(|e| self.command_error("GET", e))
        })
        .await;

        match &result {
            Ok(Some(_)) => debug!("Cache hit for key '{}'", key),
            Ok(None) => debug!("Cache miss for key '{}'", key),
            Err(e) => self.record_failure(e),
        }
        result
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> TodosResult<()> {
        let ttl_secs = ttl.as_secs().max(1);
        let result = with_timeout(self.command_timeout, || async {
            let mut conn = self.get_conn().await?;
            conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                .await
                .map_err(|e| self.command_error("SETEX", e))
        })
        .await;

        match &result {
            Ok(()) => debug!("Cached key '{}' with TTL {}s", key, ttl_secs),
            Err(e) => self.record_failure(e),
        }
        result
    }

    async fn publish(&self, channel: &str, payload: &str) -> TodosResult<()> {
        let result = with_timeout(self.command_timeout, || async {
            let mut conn = self.get_conn().await?;
            let receivers: i64 = conn
                .publish(channel, payload)
                .await
                .map_err(|e| self.command_error("PUBLISH", e))?;
            debug!("Published to '{}' ({} receivers)", channel, receivers);
            Ok(())
        })
        .await;

        if let Err(e) = &result {
            self.record_failure(e);
        }
        result
    }
}

impl std::fmt::Debug for RedisRemoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRemoteCache")
            .field("enabled", &self.is_enabled())
            .field("connected", &self.connected.load(Ordering::Acquire))
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}
