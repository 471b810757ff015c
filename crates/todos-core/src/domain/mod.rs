//! Domain model: todo items, per-user collections and audit events.

mod audit;
mod todo;

pub use audit::*;
pub use todo::*;
