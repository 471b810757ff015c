//! Cache tiers backing the todo store.
//!
//! The remote tier is any [`RemoteCache`], normally Redis. The local tier is
//! a process-local map consulted only when the remote tier is unavailable.

pub mod cache_keys;
mod local_store;
mod redis_cache;
mod remote_cache;

pub use local_store::LocalFallbackStore;
pub use redis_cache::RedisRemoteCache;
pub use remote_cache::RemoteCache;

#[cfg(test)]
pub use remote_cache::MockRemoteCache;
