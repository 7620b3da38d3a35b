//! Environment-derived configuration.

use std::env;
use std::time::Duration;

/// Current deployment environment ("production", "sandbox", ...).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Postgres connection string for the signal store.
pub fn get_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "host=localhost user=rsipulse dbname=rsipulse".to_string())
}

/// Base URL of the Twelve Data-compatible RSI endpoint.
pub fn get_provider_base_url() -> String {
    env::var("TWELVEDATA_BASE_URL").unwrap_or_else(|_| "https://api.twelvedata.com".to_string())
}

/// API key passed on every provider request.
pub fn get_provider_api_key() -> String {
    env::var("TWELVEDATA_API_KEY").unwrap_or_default()
}

/// Runtime configuration shared by the API server and the worker.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered list of asset identifiers the batch scheduler refreshes.
    pub asset_universe: Vec<String>,
    /// Period of the batch refresh loop.
    pub refresh_interval: Duration,
    /// Staleness threshold used by the batch scheduler.
    pub batch_staleness: Duration,
    /// Staleness threshold used by interactive lookups.
    pub interactive_staleness: Duration,
    /// Bound on every provider fetch.
    pub fetch_timeout: Duration,
    /// HTTP listen port for the API server.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            asset_universe: env_list(
                "ASSET_UNIVERSE",
                "AAPL,TSLA,AMZN,GOOGL,MSFT,BTC/USD,ETH/USD",
            ),
            refresh_interval: env_secs("REFRESH_INTERVAL_SECONDS", 180),
            batch_staleness: env_secs("BATCH_STALENESS_SECONDS", 180),
            interactive_staleness: env_secs("INTERACTIVE_STALENESS_SECONDS", 300),
            fetch_timeout: env_secs("FETCH_TIMEOUT_SECONDS", 10),
            port: env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_secs(key: &str, default: u64) -> Duration {
    let secs = env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default);
    Duration::from_secs(secs)
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
