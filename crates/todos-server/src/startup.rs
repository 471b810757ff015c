//! Server startup utilities.

use todos_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
  _____         _
 |_   _|__   __| | ___  ___
   | |/ _ \ / _` |/ _ \/ __|
   | | (_) | (_| | (_) \__ \
   |_|\___/ \__,_|\___/|___/

        Cache-aside todo API
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig, cache_mode: &str) {
    let separator = "=".repeat(60);
    let port = config.server.port;
    info!("{}", separator);
    info!("REST API:  http://{}", config.server.addr());
    info!("Health:    http://0.0.0.0:{}/health", port);
    info!("API Docs:  http://0.0.0.0:{}/swagger-ui", port);
    info!("Cache:     {} (TTL {}s)", cache_mode, config.cache.ttl_secs);
    if config.audit.enabled {
        info!("Audit:     channel '{}'", config.audit.channel);
    } else {
        info!("Audit:     disabled");
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let mut config = AppConfig::default();
        print_startup_info(&config, "remote");

        config.audit.enabled = false;
        print_startup_info(&config, "local");
    }
}
