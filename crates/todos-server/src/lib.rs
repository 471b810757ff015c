//! # Todos Server Library
//!
//! Wiring and startup utilities for the todos cache service.

pub mod app;
pub mod startup;

pub use app::*;
