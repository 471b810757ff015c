//! In-memory test doubles.

use crate::cache::RemoteCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::time::Duration;
use todos_core::{TodosError, TodosResult};

/// In-memory [`RemoteCache`] that records traffic and injects failures.
#[derive(Debug)]
pub struct InMemoryRemoteCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    published: Mutex<Vec<(String, String)>>,
    delay: Mutex<Option<Duration>>,
    connected: AtomicBool,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
    fail_publishes: AtomicBool,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    publish_calls: AtomicUsize,
}

impl Default for InMemoryRemoteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteCache {
    /// Creates a connected, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            published: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            connected: AtomicBool::new(true),
            fail_gets: AtomicBool::new(false),
            fail_sets: AtomicBool::new(false),
            fail_publishes: AtomicBool::new(false),
            get_calls: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
            publish_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a cache that reports itself disconnected.
    #[must_use]
    pub fn disconnected() -> Self {
        let cache = Self::new();
        cache.set_connected(false);
        cache
    }

    /// Sets the reported connectivity.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Makes every `get` fail.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Makes every `set_with_ttl` fail.
    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    /// Makes every `publish` fail.
    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Delays every call by `delay` before it takes effect.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Stores a raw value directly.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), Duration::ZERO));
    }

    /// Drops a key as if its TTL had run out.
    pub fn expire(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).map(|(v, _)| v.clone())
    }

    /// Returns the TTL the key was last written with.
    #[must_use]
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().get(key).map(|(_, ttl)| *ttl)
    }

    /// Returns the successfully published `(channel, payload)` pairs.
    #[must_use]
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().clone()
    }

    /// Number of `get` calls.
    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `set_with_ttl` calls.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// Number of `publish` calls, failed ones included.
    #[must_use]
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` publish attempts were made.
    ///
    /// Returns false if that does not happen within a second.
    pub async fn wait_for_publish_calls(&self, count: usize) -> bool {
        let wait = async {
            while self.publish_calls() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(1), wait).await.is_ok()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteCache for InMemoryRemoteCache {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> TodosResult<Option<String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(TodosError::cache("injected get failure"));
        }
        Ok(self.value(key))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> TodosResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(TodosError::Timeout("injected set timeout".to_string()));
        }
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn publish(&self, channel: &str, payload: &str) -> TodosResult<()> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(TodosError::cache("injected publish failure"));
        }
        self.published
            .lock()
            .push((channel.to_string(), payload.to_string()));
        Ok(())
    }
}
