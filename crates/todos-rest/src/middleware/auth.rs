//! Authentication middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use todos_core::TodosError;
use todos_security::TokenValidator;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub token_validator: Arc<TokenValidator>,
}

impl AuthMiddlewareState {
    /// Creates the middleware state.
    pub fn new(token_validator: Arc<TokenValidator>) -> Self {
        Self { token_validator }
    }
}

/// Authentication middleware that requires a valid bearer token.
///
/// On success the claims are added to the request extensions; otherwise
/// the request is answered with 401.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| TodosError::unauthorized("Missing bearer token"))?;

    let claims = state.token_validator.validate(token)?;
    debug!("Authenticated user: {}", claims.username);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
