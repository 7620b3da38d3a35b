//! In-memory signal repository.
//!
//! Backs the test suites and local development without a Postgres
//! instance. Implements the same aggregation and ordering contracts as the
//! Postgres repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::SignalRepository;
use crate::error::RefreshError;
use crate::models::{LatestSignal, SignalHistoryEntry};

#[derive(Default)]
pub struct MemoryRepository {
    latest: RwLock<HashMap<String, LatestSignal>>,
    history: RwLock<Vec<SignalHistoryEntry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignalRepository for MemoryRepository {
    async fn lookup_latest(&self, asset: &str) -> Result<Option<LatestSignal>, RefreshError> {
        Ok(self.latest.read().await.get(asset).cloned())
    }

    async fn upsert_latest(&self, record: &LatestSignal) -> Result<(), RefreshError> {
        let mut latest = self.latest.write().await;
        match latest.get(&record.asset) {
            // Same guard as the Postgres upsert: an older write never
            // replaces a newer row.
            Some(existing) if existing.generated_at > record.generated_at => Ok(()),
            _ => {
                latest.insert(record.asset.clone(), record.clone());
                Ok(())
            }
        }
    }

    async fn append_history(&self, entry: &SignalHistoryEntry) -> Result<(), RefreshError> {
        self.history.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_latest_all(&self) -> Result<Vec<LatestSignal>, RefreshError> {
        let mut records: Vec<LatestSignal> = self.latest.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.asset.cmp(&b.asset));
        Ok(records)
    }

    async fn list_history(&self, asset: &str) -> Result<Vec<SignalHistoryEntry>, RefreshError> {
        let mut entries: Vec<SignalHistoryEntry> = self
            .history
            .read()
            .await
            .iter()
            .filter(|entry| entry.asset == asset)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.generated_at);
        Ok(entries)
    }

    async fn list_assets(&self) -> Result<Vec<String>, RefreshError> {
        let mut assets: Vec<String> = self.latest.read().await.keys().cloned().collect();
        assets.sort();
        Ok(assets)
    }
}
