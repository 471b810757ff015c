//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use todos_core::telemetry::{LogFormat, TelemetryConfig};
use todos_core::{TodosError, TodosResult};
use url::Url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote cache (Redis) configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Todo collection caching policy.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Audit event publishing.
    #[serde(default)]
    pub audit: AuditConfig,

    /// JWT verification configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "todos-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the server bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
///
/// Either `url` is given verbatim, or the URL is derived from the
/// host/port/password/TLS fields.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Enable Redis. When disabled every operation uses the local store.
    pub enabled: bool,
    /// Full connection URL, e.g. `rediss://:password@cache.example.net:6380`.
    pub url: Option<String>,
    /// Redis host, used when `url` is not set.
    pub host: String,
    /// Redis port, used when `url` is not set.
    pub port: u16,
    /// Redis password, used when `url` is not set.
    pub password: Option<String>,
    /// Connect over TLS (`rediss://`), used when `url` is not set.
    pub use_tls: bool,
    /// Connection pool size.
    pub pool_size: usize,
    /// Upper bound for a single Redis command, in milliseconds.
    pub command_timeout_ms: u64,
    /// Interval between connectivity probes, in seconds.
    pub health_check_interval_secs: u64,
    /// Attempts made to reach Redis at startup before starting disconnected.
    pub connect_max_attempts: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            use_tls: false,
            pool_size: 10,
            command_timeout_ms: 2000,
            health_check_interval_secs: 5,
            connect_max_attempts: 10,
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("enabled", &self.enabled)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("use_tls", &self.use_tls)
            .field("pool_size", &self.pool_size)
            .field("command_timeout_ms", &self.command_timeout_ms)
            .field("health_check_interval_secs", &self.health_check_interval_secs)
            .field("connect_max_attempts", &self.connect_max_attempts)
            .finish()
    }
}

impl RedisConfig {
    /// Returns the URL used to connect to Redis.
    pub fn connection_url(&self) -> TodosResult<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }

        let scheme = if self.use_tls { "rediss" } else { "redis" };
        let mut url = Url::parse(&format!("{}://{}:{}", scheme, self.host, self.port))
            .map_err(|e| TodosError::Configuration(format!("Invalid Redis address: {}", e)))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|()| {
                TodosError::Configuration("Redis URL cannot carry a password".to_string())
            })?;
        }

        Ok(url.to_string())
    }

    /// Returns the per-command timeout as a Duration.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Returns the probe interval as a Duration.
    #[must_use]
    pub const fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

/// Caching policy for todo collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a collection in Redis, in seconds.
    pub ttl_secs: u64,
    /// Prefix of the Redis key holding a user's collection.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            key_prefix: "todos:user".to_string(),
        }
    }
}

impl CacheConfig {
    /// Returns the collection TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Audit event publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Publish audit events.
    pub enabled: bool,
    /// Redis pub/sub channel receiving the events.
    pub channel: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: "log_channel".to_string(),
        }
    }
}

/// JWT verification configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HS256 shared secret. Required.
    pub jwt_secret: String,
    /// Expected `iss` claim, if any.
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim, if any.
    pub jwt_audience: Option<String>,
    /// Clock skew tolerated when checking `exp`, in seconds.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ObservabilityConfig {
    /// Builds the logging setup for the given service name.
    #[must_use]
    pub fn telemetry(&self, service_name: &str) -> TelemetryConfig {
        TelemetryConfig {
            service_name: service_name.to_string(),
            filter: format!(
                "{},todos=debug,tower_http=debug",
                self.log_level.to_lowercase()
            ),
            format: self.log_format,
        }
    }
}
