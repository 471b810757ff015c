//! # Todos Service
//!
//! Cache-aside data layer for per-user todo collections.
//!
//! Collections live in a remote cache with a TTL and fall back to an
//! in-process store whenever the remote tier is unreachable. Every
//! read-modify-write sequence runs under one process-wide gate, and
//! mutations are announced on an audit channel without waiting for
//! delivery.

pub mod audit;
pub mod cache;
pub mod dto;
pub mod gate;
pub mod r#impl;
pub mod store;
pub mod todo_service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use audit::*;
pub use cache::*;
pub use dto::*;
pub use gate::*;
pub use r#impl::*;
pub use store::*;
pub use todo_service::*;
