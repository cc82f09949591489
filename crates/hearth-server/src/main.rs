//! # hearth-warmup
//!
//! Loads configuration, checks the database and cache, then fills the area
//! list and home page cache entries. Exits non-zero if any step fails.

use hearth_config::ConfigLoader;
use hearth_core::{init_telemetry, HearthError, HearthResult};
use hearth_server::{startup, AppBuilder};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Warm-up failed: {}", e);
        eprintln!("hearth-warmup: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> HearthResult<()> {
    let loader = ConfigLoader::from_default_location()?;
    let config = loader.get().await;

    init_telemetry(&config.observability.telemetry())?;
    info!("Starting Hearth cache warm-up, version {}", env!("CARGO_PKG_VERSION"));
    startup::log_startup(&config);

    let services = AppBuilder::new(config).build().await?;

    let report = services.health_check().await;
    if !report.is_ready() {
        services.shutdown().await;
        return Err(HearthError::database(format!("database is {}", report.database)));
    }

    let result = services.warm_up().await;
    services.shutdown().await;
    let summary = result?;

    info!(
        areas = summary.areas,
        featured_units = summary.featured_units,
        "Warm-up complete"
    );
    Ok(())
}
