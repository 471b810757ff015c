//! Todo service implementations.
//!
//! Trait definitions live in the parent module (`todo_service.rs`).

pub mod todo_service_impl;

pub use todo_service_impl::TodoServiceImpl;
