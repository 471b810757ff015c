//! Shared fixtures for the HTTP integration tests.

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use todos_config::{AuditConfig, CacheConfig, SecurityConfig, ServerConfig};
use todos_rest::{create_router, AppState};
use todos_security::TokenValidator;
use todos_service::{testing::InMemoryRemoteCache, LocalFallbackStore, TodoServiceImpl};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A router wired to in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub remote: Arc<InMemoryRemoteCache>,
    pub local: Arc<LocalFallbackStore>,
    pub validator: Arc<TokenValidator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_remote(InMemoryRemoteCache::new())
    }

    pub fn disconnected() -> Self {
        Self::with_remote(InMemoryRemoteCache::disconnected())
    }

    fn with_remote(remote: InMemoryRemoteCache) -> Self {
        let remote = Arc::new(remote);
        let local = Arc::new(LocalFallbackStore::new());
        let service = TodoServiceImpl::from_config(
            remote.clone(),
            local.clone(),
            &CacheConfig::default(),
            &AuditConfig::default(),
        );
        let validator = Arc::new(TokenValidator::new(&SecurityConfig {
            jwt_secret: TEST_SECRET.to_string(),
            ..Default::default()
        }));

        let state = AppState::new(Arc::new(service), remote.clone());
        let router = create_router(state, validator.clone(), &ServerConfig::default());

        Self {
            router,
            remote,
            local,
            validator,
        }
    }

    pub fn token(&self, username: &str) -> String {
        self.validator
            .issue(username, Duration::from_secs(300))
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, username: Option<&str>) -> Response {
        self.send(self.request(Method::GET, uri, username, Body::empty()))
            .await
    }

    pub async fn post_json(&self, uri: &str, username: &str, body: &str) -> Response {
        let mut request = self.request(Method::POST, uri, Some(username), Body::from(body.to_string()));
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str, username: &str) -> Response {
        self.send(self.request(Method::DELETE, uri, Some(username), Body::empty()))
            .await
    }

    pub fn request(
        &self,
        method: Method,
        uri: &str,
        username: Option<&str>,
        body: Body,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(username) = username {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(username)),
            );
        }
        builder.body(body).unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
