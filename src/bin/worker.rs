//! Rsipulse Worker
//!
//! Runs the batch refresh scheduler: every refresh interval, walks the
//! configured asset universe and refreshes each stale signal through the
//! freshness engine. Can run alongside any number of API server instances.

use dotenvy::dotenv;
use rsipulse::config::{self, Config};
use rsipulse::core::engine::FreshnessEngine;
use rsipulse::core::scheduler::BatchScheduler;
use rsipulse::db::{PostgresRepository, SignalRepository};
use rsipulse::logging;
use rsipulse::metrics::Metrics;
use rsipulse::services::TwelveDataSource;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let cfg = Config::from_env();
    let env = config::get_environment();
    info!("Starting Rsipulse Worker");
    info!(environment = %env, "Environment");
    info!(
        interval_secs = cfg.refresh_interval.as_secs(),
        assets = cfg.asset_universe.len(),
        "Batch refresh: every {}s over {} assets",
        cfg.refresh_interval.as_secs(),
        cfg.asset_universe.len()
    );

    let metrics = Arc::new(Metrics::new()?);

    // The worker cannot do anything without the store; failing to reach it
    // at boot is fatal. Steady-state storage errors are per-asset and
    // recoverable.
    info!("Connecting to Postgres...");
    let repository: Arc<dyn SignalRepository> = Arc::new(PostgresRepository::new().await?);
    metrics.database_connected.set(1.0);
    info!("Postgres connected");

    let source = Arc::new(TwelveDataSource::new(
        config::get_provider_base_url(),
        config::get_provider_api_key(),
        cfg.fetch_timeout,
    )?);

    let engine = Arc::new(
        FreshnessEngine::new(source, repository).with_metrics(metrics.clone()),
    );

    let scheduler = BatchScheduler::new(
        engine,
        cfg.asset_universe.clone(),
        cfg.refresh_interval,
        cfg.batch_staleness,
    )?;
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            info!("Worker stopped");
        }
    }

    Ok(())
}
