//! JWT verification.

mod claims;
mod token_validator;

pub use claims::*;
pub use token_validator::*;
