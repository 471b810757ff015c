//! # Todos REST
//!
//! REST API layer using Axum for the todos cache service.
//! Provides the todo endpoints, health checks and API documentation.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
