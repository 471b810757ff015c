//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by tokens from the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username. Also the namespace of the user's todo collection.
    pub username: String,

    /// Expiration timestamp (seconds).
    pub exp: i64,

    /// Issued at timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Creates claims for `username` expiring at `expires_at`.
    #[must_use]
    pub fn new(username: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            exp: expires_at.timestamp(),
            iat: Some(Utc::now().timestamp()),
            iss: None,
            aud: None,
        }
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_auth_service_payload() {
        let claims: Claims =
            serde_json::from_str(r#"{"username":"johnd","exp":1999999999}"#).unwrap();
        assert_eq!(claims.username, "johnd");
        assert_eq!(claims.iat, None);
        assert_eq!(claims.expires_at().timestamp(), 1_999_999_999);
    }

    #[test]
    fn test_expiry() {
        let live = Claims::new("alice", Utc::now() + Duration::hours(1));
        assert!(!live.is_expired());

        let stale = Claims::new("alice", Utc::now() - Duration::hours(1));
        assert!(stale.is_expired());
    }

    #[test]
    fn test_optional_claims_not_serialized() {
        let claims = Claims {
            iat: None,
            ..Claims::new("bob", Utc::now())
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("iss"));
        assert!(!json.contains("iat"));
    }
}
