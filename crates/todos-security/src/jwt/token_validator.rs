//! Token validation against the shared HS256 secret.

use super::Claims;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use todos_config::SecurityConfig;
use todos_core::{TodosError, TodosResult};
use tracing::{debug, warn};

/// Verifies bearer tokens.
#[derive(Clone)]
pub struct TokenValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenValidator {
    /// Creates a validator from the security configuration.
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;

        let mut required = vec!["exp"];
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &config.jwt_audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        }
    }

    /// Validates a token and returns the claims.
    pub fn validate(&self, token: &str) -> TodosResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TodosError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    TodosError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => {
                    TodosError::InvalidToken("Invalid token issuer".to_string())
                }
                ErrorKind::InvalidAudience => {
                    TodosError::InvalidToken("Invalid token audience".to_string())
                }
                _ => TodosError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        if claims.username.trim().is_empty() {
            return Err(TodosError::InvalidToken("Token carries no username".to_string()));
        }

        Ok(claims)
    }

    /// Issues a token for `username` valid for `ttl`.
    ///
    /// Tokens are normally minted by the auth service; this exists for
    /// tests and local tooling.
    pub fn issue(&self, username: &str, ttl: Duration) -> TodosResult<String> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| TodosError::Internal(format!("Invalid token lifetime: {}", e)))?;

        let mut claims = Claims::new(username, Utc::now() + ttl);
        claims.iss.clone_from(&self.issuer);
        claims.aud.clone_from(&self.audience);

        self.encode(&claims)
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> TodosResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TodosError::Internal(format!("Failed to sign token: {}", e)))?;

        debug!("Issued token for user {}", claims.username);
        Ok(token)
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
