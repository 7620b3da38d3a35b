//! Fixed-interval batch refresh scheduler.
//!
//! On each tick, walks the configured asset universe in order and asks the
//! freshness engine to refresh each one. Per-asset failures are logged and
//! counted but never stop the pass or the loop. One full pass runs
//! immediately at start so cold caches are populated without waiting a
//! whole period.

use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::engine::FreshnessEngine;
use crate::error::RefreshError;

/// Counts from one batch pass, exposed for tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub refreshed: usize,
    pub failed: usize,
}

pub struct BatchScheduler {
    engine: Arc<FreshnessEngine>,
    universe: Vec<String>,
    staleness: Duration,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl BatchScheduler {
    /// `interval` is the batch period; zero disables the scheduler and is
    /// rejected at construction.
    pub fn new(
        engine: Arc<FreshnessEngine>,
        universe: Vec<String>,
        interval: Duration,
        staleness: Duration,
    ) -> Result<Self, RefreshError> {
        let interval_seconds = interval.as_secs();
        if interval_seconds == 0 {
            return Err(RefreshError::Configuration(
                "scheduler interval must be > 0".to_string(),
            ));
        }

        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            format!("0 */{} * * * *", interval_seconds / 60)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };

        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            RefreshError::Configuration(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            assets = universe.len(),
            "batch scheduler created"
        );

        Ok(Self {
            engine,
            universe,
            staleness,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Run one pass over the whole universe. Failures are isolated per
    /// asset.
    pub async fn run_once(&self) -> BatchOutcome {
        run_batch(&self.engine, &self.universe, self.staleness).await
    }

    /// Start the loop: immediate first pass, then one pass per tick.
    pub async fn start(&self) {
        let engine = self.engine.clone();
        let universe = self.universe.clone();
        let staleness = self.staleness;
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("batch scheduler started, running initial pass");
            run_batch(&engine, &universe, staleness).await;

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let wait = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(wait).await;
                    }
                } else {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    continue;
                }

                run_batch(&engine, &universe, staleness).await;
            }
        });

        let mut h = self.handle.write().await;
        *h = Some(handle);
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("batch scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

async fn run_batch(
    engine: &FreshnessEngine,
    universe: &[String],
    staleness: Duration,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        refreshed: 0,
        failed: 0,
    };

    for symbol in universe {
        match engine.ensure_fresh(symbol, staleness).await {
            Ok(record) => {
                debug!(
                    asset = %record.asset,
                    rsi = record.indicator_value,
                    category = %record.category,
                    "batch refresh ok"
                );
                outcome.refreshed += 1;
            }
            Err(e) => {
                // Continue with the rest of the universe; one asset never
                // aborts the batch.
                warn!(symbol = %symbol, error = %e, "batch refresh failed");
                outcome.failed += 1;
            }
        }
    }

    info!(
        refreshed = outcome.refreshed,
        failed = outcome.failed,
        "batch pass complete"
    );
    outcome
}
