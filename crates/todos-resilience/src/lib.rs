//! # Todos Resilience
//!
//! Resilience patterns for the todos cache service.
//! Bounds remote calls with timeouts and retries connection attempts.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
