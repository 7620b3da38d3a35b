//! Twelve Data RSI provider.
//!
//! Calls the provider's `/rsi` endpoint (1min interval, 14-period) and
//! reads the most recent value from the response. The provider reports
//! errors either as non-2xx statuses or as a 200 body with
//! `"status": "error"`, so both paths are handled.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::RefreshError;
use crate::models::IndicatorSample;
use crate::services::market_data::IndicatorSource;

const RSI_INTERVAL: &str = "1min";
const RSI_PERIOD: &str = "14";

pub struct TwelveDataSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RsiResponse {
    #[serde(default)]
    values: Vec<RsiValue>,
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RsiValue {
    rsi: String,
    datetime: Option<String>,
}

impl TwelveDataSource {
    pub fn new(
        base_url: String,
        api_key: String,
        fetch_timeout: Duration,
    ) -> Result<Self, RefreshError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| RefreshError::ProviderUnavailable(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn parse_sample(&self, body: RsiResponse, symbol: &str) -> Result<IndicatorSample, RefreshError> {
        if let Some(status) = body.status.as_deref() {
            if status.eq_ignore_ascii_case("error") {
                return Err(RefreshError::ProviderUnavailable(format!(
                    "provider error for {}: {}",
                    symbol,
                    body.message.unwrap_or_else(|| "no message".to_string())
                )));
            }
        }

        let newest = body.values.first().ok_or_else(|| {
            RefreshError::InvalidSample(format!("no RSI values returned for {}", symbol))
        })?;

        let value: f64 = newest.rsi.parse().map_err(|_| {
            RefreshError::InvalidSample(format!(
                "non-numeric RSI '{}' for {}",
                newest.rsi, symbol
            ))
        })?;

        let sampled_at = newest
            .datetime
            .as_deref()
            .and_then(parse_provider_datetime)
            .unwrap_or_else(Utc::now);

        Ok(IndicatorSample { value, sampled_at })
    }
}

#[async_trait]
impl IndicatorSource for TwelveDataSource {
    async fn fetch(&self, symbol: &str) -> Result<IndicatorSample, RefreshError> {
        let url = format!("{}/rsi", self.base_url);
        debug!(symbol = %symbol, url = %url, "fetching RSI from provider");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", RSI_INTERVAL),
                ("time_period", RSI_PERIOD),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                RefreshError::ProviderUnavailable(format!("request for {}: {}", symbol, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::ProviderUnavailable(format!(
                "provider returned {} for {}",
                status, symbol
            )));
        }

        let body: RsiResponse = response.json().await.map_err(|e| {
            RefreshError::InvalidSample(format!("undecodable body for {}: {}", symbol, e))
        })?;

        self.parse_sample(body, symbol)
    }
}

/// Provider timestamps come as `2024-01-01 12:34:00` (UTC, no offset).
fn parse_provider_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
