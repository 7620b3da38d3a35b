//! Signal records persisted by the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RefreshError;

/// Discrete trading signal derived from an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalCategory {
    Buy,
    Sell,
    Hold,
}

impl SignalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::Buy => "BUY",
            SignalCategory::Sell => "SELL",
            SignalCategory::Hold => "HOLD",
        }
    }
}

impl std::str::FromStr for SignalCategory {
    type Err = RefreshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(SignalCategory::Buy),
            "SELL" => Ok(SignalCategory::Sell),
            "HOLD" => Ok(SignalCategory::Hold),
            other => Err(RefreshError::Storage(format!(
                "unknown signal category '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest signal for one asset. At most one row per asset; `generated_at`
/// is non-decreasing across successive writes for the same asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSignal {
    pub asset: String,
    pub indicator_value: f64,
    pub category: SignalCategory,
    pub generated_at: DateTime<Utc>,
}

impl LatestSignal {
    /// History entry carrying the same fields as this record.
    pub fn to_history_entry(&self) -> SignalHistoryEntry {
        SignalHistoryEntry {
            asset: self.asset.clone(),
            indicator_value: self.indicator_value,
            category: self.category,
            generated_at: self.generated_at,
        }
    }
}

/// Append-only history row, one per successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHistoryEntry {
    pub asset: String,
    pub indicator_value: f64,
    pub category: SignalCategory,
    pub generated_at: DateTime<Utc>,
}

/// Raw reading returned by the indicator provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub value: f64,
    pub sampled_at: DateTime<Utc>,
}
