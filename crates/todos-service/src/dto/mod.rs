//! Data Transfer Objects (DTOs).

mod todo_dto;

pub use todo_dto::*;
