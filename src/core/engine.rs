//! Signal freshness & refresh engine.
//!
//! Decides whether the stored latest record for an asset is stale, and if
//! so fetches a new RSI sample, classifies it, and writes through to the
//! repository (upsert latest + append history). Fresh records are returned
//! untouched with zero provider calls, so sequential access issues at most
//! one fetch per asset per staleness window.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::SignalRepository;
use crate::error::RefreshError;
use crate::metrics::Metrics;
use crate::models::{normalize_symbol, LatestSignal};
use crate::services::market_data::IndicatorSource;
use crate::signals::classify;

pub struct FreshnessEngine {
    source: Arc<dyn IndicatorSource>,
    repository: Arc<dyn SignalRepository>,
    metrics: Option<Arc<Metrics>>,
    // One async mutex per normalized asset. Serializing the whole
    // read-fetch-write section per asset keeps concurrent refreshes from
    // landing a slow stale response over a newer record.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FreshnessEngine {
    pub fn new(source: Arc<dyn IndicatorSource>, repository: Arc<dyn SignalRepository>) -> Self {
        Self {
            source,
            repository,
            metrics: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn asset_lock(&self, asset: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(asset.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Return the latest signal for `symbol`, refreshing it first when the
    /// stored record is absent or older than `staleness`.
    ///
    /// On any fetch or sample failure the stored record is left untouched
    /// and the error is returned; stale data is preserved rather than
    /// overwritten.
    pub async fn ensure_fresh(
        &self,
        symbol: &str,
        staleness: Duration,
    ) -> Result<LatestSignal, RefreshError> {
        let asset = normalize_symbol(symbol)?;

        let lock = self.asset_lock(&asset).await;
        let _guard = lock.lock().await;

        let staleness = chrono::Duration::from_std(staleness)
            .map_err(|e| RefreshError::Configuration(format!("staleness out of range: {}", e)))?;

        if let Some(existing) = self.repository.lookup_latest(&asset).await? {
            let age = Utc::now().signed_duration_since(existing.generated_at);
            if age <= staleness {
                debug!(asset = %asset, age_secs = age.num_seconds(), "record fresh, skipping fetch");
                return Ok(existing);
            }
            debug!(asset = %asset, age_secs = age.num_seconds(), "record stale, refreshing");
        } else {
            debug!(asset = %asset, "no record yet, refreshing");
        }

        match self.refresh(&asset).await {
            Ok(record) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.refreshes_total.inc();
                }
                Ok(record)
            }
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.refresh_failures_total.inc();
                }
                Err(e)
            }
        }
    }

    /// Fetch, validate, classify and write through. Caller holds the
    /// per-asset lock.
    async fn refresh(&self, asset: &str) -> Result<LatestSignal, RefreshError> {
        if let Some(ref metrics) = self.metrics {
            metrics.provider_fetches_total.inc();
        }

        let sample = self.source.fetch(asset).await?;

        if !sample.value.is_finite() || !(0.0..=100.0).contains(&sample.value) {
            return Err(RefreshError::InvalidSample(format!(
                "RSI {} out of domain for {}",
                sample.value, asset
            )));
        }

        let record = LatestSignal {
            asset: asset.to_string(),
            indicator_value: sample.value,
            category: classify(sample.value),
            generated_at: Utc::now(),
        };

        self.repository.upsert_latest(&record).await?;
        self.repository.append_history(&record.to_history_entry()).await?;

        info!(
            asset = %asset,
            rsi = record.indicator_value,
            category = %record.category,
            "signal refreshed"
        );
        Ok(record)
    }
}
