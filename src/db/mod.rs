//! Persistent signal storage.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::RefreshError;
use crate::models::{LatestSignal, SignalHistoryEntry};

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// Owns all persisted signal state.
///
/// The store is the sole source of truth: every staleness decision re-reads
/// it, and the engine keeps nothing in memory between calls. `asset`
/// arguments are normalized symbols.
#[async_trait]
pub trait SignalRepository: Send + Sync {
    /// Point lookup of the latest record for one asset.
    async fn lookup_latest(&self, asset: &str) -> Result<Option<LatestSignal>, RefreshError>;

    /// Insert or replace the latest record for the record's asset.
    ///
    /// A write whose `generated_at` is older than the stored one is dropped,
    /// keeping `generated_at` non-decreasing per asset.
    async fn upsert_latest(&self, record: &LatestSignal) -> Result<(), RefreshError>;

    /// Append one history row. History is never mutated after insertion.
    async fn append_history(&self, entry: &SignalHistoryEntry) -> Result<(), RefreshError>;

    /// Exactly one row per distinct asset, the one with the maximum
    /// `generated_at`, ordered by asset for determinism.
    async fn list_latest_all(&self) -> Result<Vec<LatestSignal>, RefreshError>;

    /// History for one asset ordered by `generated_at` ascending. Empty when
    /// the asset is unknown.
    async fn list_history(&self, asset: &str) -> Result<Vec<SignalHistoryEntry>, RefreshError>;

    /// Distinct asset identifiers currently present in the store.
    async fn list_assets(&self) -> Result<Vec<String>, RefreshError>;
}
