//! # Todos Security
//!
//! Verifies the HS256 bearer tokens issued by the auth service and exposes
//! the username they carry.

pub mod jwt;

pub use jwt::*;
