//! Cache key generators for consistent key naming.

/// Default prefix of per-user collection keys.
pub const DEFAULT_KEY_PREFIX: &str = "todos:user";

/// Generate the key holding a user's todo collection.
#[must_use]
pub fn todos_for_user(prefix: &str, user_id: &str) -> String {
    format!("{}:{}", prefix, user_id)
}
