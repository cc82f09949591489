//! Startup logging.

use hearth_config::AppConfig;
use tracing::info;
use url::Url;

/// Strips credentials from a connection URL before it is logged.
#[must_use]
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

/// Logs the effective configuration.
pub fn log_startup(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("{} {} ({})", config.app.name, config.app.version, config.app.environment);
    info!("Database:  {}", redact_url(&config.database.url));
    if config.redis.enabled {
        info!("Cache:     {}", redact_url(&config.redis.url));
    } else {
        info!("Cache:     in-process, {} keys", config.cache.max_entries);
    }
    info!(
        "Listing:   {} per page, TTL {}s, coalescing {}",
        config.listing.page_capacity,
        config.listing.ttl_secs,
        if config.listing.coalesce_misses { "on" } else { "off" }
    );
    info!("{}", separator);
}
