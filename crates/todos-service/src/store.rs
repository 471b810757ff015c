//! Cache-aside access to per-user todo collections.

use crate::cache::{cache_keys, LocalFallbackStore, RemoteCache};
use std::sync::Arc;
use std::time::Duration;
use todos_config::CacheConfig;
use todos_core::TodoCollection;
use tracing::{debug, warn};

/// Tier that accepted a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    /// Stored remotely with the configured TTL.
    Remote,
    /// Stored in the local fallback store without expiry.
    Local,
}

/// Where a loaded collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from the remote cache.
    Remote,
    /// Read from the local fallback store.
    Local,
    /// Neither tier had usable data; a fresh seed was stored.
    Seeded(SaveTarget),
}

/// A collection together with the tier it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCollection {
    /// The user's collection.
    pub collection: TodoCollection,
    /// Tier the collection was resolved from.
    pub source: LoadSource,
}

/// Resolves and stores todo collections across the remote and local tiers.
///
/// Never surfaces cache-tier failures: reads fall back to the local store or
/// a fresh seed, writes fall back to the local store.
#[derive(Clone)]
pub struct TodoStore {
    remote: Arc<dyn RemoteCache>,
    local: Arc<LocalFallbackStore>,
    ttl: Duration,
    key_prefix: String,
}

impl TodoStore {
    /// Creates a store over the given tiers.
    pub fn new(
        remote: Arc<dyn RemoteCache>,
        local: Arc<LocalFallbackStore>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            remote,
            local,
            ttl: config.ttl(),
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Returns the remote key holding a user's collection.
    #[must_use]
    pub fn key_for(&self, user_id: &str) -> String {
        cache_keys::todos_for_user(&self.key_prefix, user_id)
    }

    /// Loads a user's collection, seeding defaults if no tier has one.
    pub async fn load_collection(&self, user_id: &str) -> LoadedCollection {
        if self.remote.is_connected() {
            let key = self.key_for(user_id);
            match self.remote.get(&key).await {
                Ok(Some(raw)) if !raw.is_empty() => match parse_collection(&raw) {
                    Some(collection) => {
                        return LoadedCollection {
                            collection,
                            source: LoadSource::Remote,
                        };
                    }
                    None => warn!("Discarding unreadable collection at '{}'", key),
                },
                Ok(_) => debug!("No collection at '{}', seeding", key),
                Err(e) => {
                    warn!("Remote read of '{}' failed, using local store: {}", key, e);
                    return self.load_local(user_id).await;
                }
            }
            return self.seed(user_id).await;
        }

        self.load_local(user_id).await
    }

    /// Saves a user's collection, preferring the remote tier.
    pub async fn save_collection(&self, user_id: &str, collection: &TodoCollection) -> SaveTarget {
        if self.remote.is_connected() {
            let key = self.key_for(user_id);
            match serde_json::to_string(collection) {
                Ok(json) => match self.remote.set_with_ttl(&key, &json, self.ttl).await {
                    Ok(()) => return SaveTarget::Remote,
                    Err(e) => warn!("Remote write of '{}' failed, using local store: {}", key, e),
                },
                Err(e) => warn!("Failed to serialize collection for '{}': {}", key, e),
            }
        }

        self.local.put(user_id, collection.clone());
        SaveTarget::Local
    }

    async fn load_local(&self, user_id: &str) -> LoadedCollection {
        match self.local.get(user_id) {
            Some(collection) => LoadedCollection {
                collection,
                source: LoadSource::Local,
            },
            None => self.seed(user_id).await,
        }
    }

    async fn seed(&self, user_id: &str) -> LoadedCollection {
        let collection = TodoCollection::seed();
        let target = self.save_collection(user_id, &collection).await;
        LoadedCollection {
            collection,
            source: LoadSource::Seeded(target),
        }
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("ttl", &self.ttl)
            .field("key_prefix", &self.key_prefix)
            .field("local_entries", &self.local.len())
            .finish_non_exhaustive()
    }
}

fn parse_collection(raw: &str) -> Option<TodoCollection> {
    match serde_json::from_str::<TodoCollection>(raw) {
        Ok(collection) if collection.is_consistent() => Some(collection),
        Ok(_) => {
            warn!("Cached collection violates id invariants");
            None
        }
        Err(e) => {
            warn!("Failed to parse cached collection: {}", e);
            None
        }
    }
}
