//! # Todos Config
//!
//! Configuration management for the todos cache service.
//! Supports layered configuration from files, environment variables
//! (including the variable names used by earlier deployments), and
//! runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
