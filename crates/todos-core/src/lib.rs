//! # Todos Core
//!
//! Core types, domain model, and error definitions shared by every layer of
//! the todos cache service.

pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use result::*;
pub use validation::*;
