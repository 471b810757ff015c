//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use todos_core::TodosError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Prefix of structured environment overrides, e.g. `TODOS_SERVER__PORT`.
pub const ENV_PREFIX: &str = "TODOS";

/// Variable selecting the environment-specific config file.
pub const ENVIRONMENT_VAR: &str = "TODOS_ENVIRONMENT";

/// Flat variable names understood by existing deployments, with the
/// configuration key each one sets.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("TODO_API_PORT", "server.port"),
    ("TODO_CACHE_TTL", "cache.ttl_secs"),
    ("REDIS_CHANNEL", "audit.channel"),
    ("REDIS_URL", "redis.url"),
    ("REDIS_HOST", "redis.host"),
    ("REDIS_PORT", "redis.port"),
    ("REDIS_PASSWORD", "redis.password"),
    ("REDIS_USE_TLS", "redis.use_tls"),
    ("JWT_SECRET", "security.jwt_secret"),
];

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader reading the process environment.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `TODOS_` prefix
    /// 5. Legacy flat variables (`TODO_API_PORT`, `REDIS_URL`, ...)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, TodosError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config_dir = config_dir.into();
        let config = load_config(&config_dir, &process_env())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
            env: None,
        })
    }

    /// Creates a loader that reads the given variables instead of the
    /// process environment.
    pub fn with_env(
        config_dir: impl Into<String>,
        env: HashMap<String, String>,
    ) -> Result<Self, TodosError> {
        let config_dir = config_dir.into();
        let config = load_config(&config_dir, &env)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
            env: Some(env),
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, TodosError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The previous configuration stays in place if the new one fails to
    /// load or validate.
    pub async fn reload(&self) -> Result<(), TodosError> {
        let env = match &self.env {
            Some(env) => env.clone(),
            None => process_env(),
        };
        let new_config = load_config(&self.config_dir, &env)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Loads and validates configuration from `config_dir` and `env`.
pub fn load_config(config_dir: &str, env: &HashMap<String, String>) -> Result<AppConfig, TodosError> {
    let environment = env
        .get(ENVIRONMENT_VAR)
        .cloned()
        .unwrap_or_else(|| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    for name in ["default", environment.as_str(), "local"] {
        let path = format!("{}/{}.toml", config_dir, name);
        if Path::new(&path).exists() {
            debug!("Loading config from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(env.clone())),
    );

    builder = builder
        .set_override("app.environment", environment.clone())
        .map_err(config_error_to_todos_error)?;

    for (key, value) in legacy_overrides(|name| env.get(name).cloned()) {
        debug!("Applying legacy override for {}", key);
        builder = builder.set_override(key, value).map_err(config_error_to_todos_error)?;
    }

    let app_config: AppConfig = builder
        .build()
        .and_then(Config::try_deserialize)
        .map_err(config_error_to_todos_error)?;

    ConfigValidator::validate(&app_config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        TodosError::Configuration(messages.join("; "))
    })?;

    Ok(app_config)
}

/// Maps legacy flat variables to configuration overrides.
///
/// Empty values are skipped so an unset-but-exported variable does not
/// clobber file configuration.
pub fn legacy_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_VARS
        .iter()
        .filter_map(|(var, key)| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (*key, value))
        })
        .collect()
}

fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn config_error_to_todos_error(err: ConfigError) -> TodosError {
    TodosError::Configuration(err.to_string())
}
