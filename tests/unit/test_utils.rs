//! Shared fixtures for the unit suites.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rsipulse::error::RefreshError;
use rsipulse::models::{IndicatorSample, LatestSignal, SignalCategory};
use rsipulse::services::IndicatorSource;

/// What the scripted source should do for a given symbol.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Script {
    Value(f64),
    Unavailable,
    NonFinite,
}

/// Indicator source driven by a per-symbol script, counting every fetch.
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, Script>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_value(symbol: &str, value: f64) -> Self {
        let source = Self::new();
        source.script(symbol, Script::Value(value));
        source
    }

    pub fn script(&self, symbol: &str, script: Script) {
        self.scripts
            .lock()
            .unwrap()
            .insert(symbol.to_string(), script);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndicatorSource for ScriptedSource {
    async fn fetch(&self, symbol: &str) -> Result<IndicatorSample, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().unwrap().get(symbol).cloned();
        match script {
            Some(Script::Value(value)) => Ok(IndicatorSample {
                value,
                sampled_at: Utc::now(),
            }),
            Some(Script::NonFinite) => Ok(IndicatorSample {
                value: f64::NAN,
                sampled_at: Utc::now(),
            }),
            Some(Script::Unavailable) | None => Err(RefreshError::ProviderUnavailable(format!(
                "no data for {}",
                symbol
            ))),
        }
    }
}

/// A latest record generated `age_minutes` ago.
#[allow(dead_code)]
pub fn record_aged(asset: &str, value: f64, category: SignalCategory, age_minutes: i64) -> LatestSignal {
    LatestSignal {
        asset: asset.to_string(),
        indicator_value: value,
        category,
        generated_at: minutes_ago(age_minutes),
    }
}

#[allow(dead_code)]
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::minutes(minutes)
}
