//! Postgres-backed signal repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::error;

use crate::config;
use crate::db::SignalRepository;
use crate::error::RefreshError;
use crate::models::{LatestSignal, SignalCategory, SignalHistoryEntry};

pub struct PostgresRepository {
    client: Client,
}

impl PostgresRepository {
    /// Connect and initialize the schema. Failing here is fatal at boot;
    /// steady-state query errors are recoverable [`RefreshError::Storage`].
    pub async fn new() -> Result<Self, RefreshError> {
        Self::connect(&config::get_database_url()).await
    }

    pub async fn connect(database_url: &str) -> Result<Self, RefreshError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| RefreshError::Storage(format!("connect: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgres connection error");
            }
        });

        let repo = Self { client };
        repo.init_schema().await?;
        Ok(repo)
    }

    async fn init_schema(&self) -> Result<(), RefreshError> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS signals_latest (
                    asset TEXT PRIMARY KEY,
                    indicator_value DOUBLE PRECISION NOT NULL,
                    category TEXT NOT NULL,
                    generated_at TIMESTAMP NOT NULL
                );
                CREATE TABLE IF NOT EXISTS signals_history (
                    asset TEXT NOT NULL,
                    indicator_value DOUBLE PRECISION NOT NULL,
                    category TEXT NOT NULL,
                    generated_at TIMESTAMP NOT NULL
                );
                CREATE INDEX IF NOT EXISTS signals_history_asset_time_idx
                    ON signals_history (asset, generated_at);",
            )
            .await
            .map_err(|e| RefreshError::Storage(format!("schema init: {}", e)))
    }
}

fn latest_from_row(row: &Row) -> Result<LatestSignal, RefreshError> {
    let category: String = row.get(2);
    let generated_at: chrono::NaiveDateTime = row.get(3);
    Ok(LatestSignal {
        asset: row.get(0),
        indicator_value: row.get(1),
        category: category.parse()?,
        generated_at: DateTime::from_naive_utc_and_offset(generated_at, Utc),
    })
}

fn history_from_row(row: &Row) -> Result<SignalHistoryEntry, RefreshError> {
    let category: String = row.get(2);
    let generated_at: chrono::NaiveDateTime = row.get(3);
    Ok(SignalHistoryEntry {
        asset: row.get(0),
        indicator_value: row.get(1),
        category: category.parse()?,
        generated_at: DateTime::from_naive_utc_and_offset(generated_at, Utc),
    })
}

fn storage(context: &str, e: tokio_postgres::Error) -> RefreshError {
    RefreshError::Storage(format!("{}: {}", context, e))
}

#[async_trait]
impl SignalRepository for PostgresRepository {
    async fn lookup_latest(&self, asset: &str) -> Result<Option<LatestSignal>, RefreshError> {
        let rows = self
            .client
            .query(
                "SELECT asset, indicator_value, category, generated_at
                 FROM signals_latest WHERE asset = $1",
                &[&asset],
            )
            .await
            .map_err(|e| storage("lookup latest", e))?;

        rows.first().map(latest_from_row).transpose()
    }

    async fn upsert_latest(&self, record: &LatestSignal) -> Result<(), RefreshError> {
        // The WHERE guard drops writes older than the stored row, so a slow
        // fetch can never revert a newer signal.
        self.client
            .execute(
                "INSERT INTO signals_latest (asset, indicator_value, category, generated_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (asset) DO UPDATE SET
                     indicator_value = EXCLUDED.indicator_value,
                     category = EXCLUDED.category,
                     generated_at = EXCLUDED.generated_at
                 WHERE signals_latest.generated_at <= EXCLUDED.generated_at",
                &[
                    &record.asset,
                    &record.indicator_value,
                    &record.category.as_str(),
                    &record.generated_at.naive_utc(),
                ],
            )
            .await
            .map_err(|e| storage("upsert latest", e))?;
        Ok(())
    }

    async fn append_history(&self, entry: &SignalHistoryEntry) -> Result<(), RefreshError> {
        self.client
            .execute(
                "INSERT INTO signals_history (asset, indicator_value, category, generated_at)
                 VALUES ($1, $2, $3, $4)",
                &[
                    &entry.asset,
                    &entry.indicator_value,
                    &entry.category.as_str(),
                    &entry.generated_at.naive_utc(),
                ],
            )
            .await
            .map_err(|e| storage("append history", e))?;
        Ok(())
    }

    async fn list_latest_all(&self) -> Result<Vec<LatestSignal>, RefreshError> {
        let rows = self
            .client
            .query(
                "SELECT asset, indicator_value, category, generated_at
                 FROM signals_latest ORDER BY asset",
                &[],
            )
            .await
            .map_err(|e| storage("list latest", e))?;

        rows.iter().map(latest_from_row).collect()
    }

    async fn list_history(&self, asset: &str) -> Result<Vec<SignalHistoryEntry>, RefreshError> {
        let rows = self
            .client
            .query(
                "SELECT asset, indicator_value, category, generated_at
                 FROM signals_history WHERE asset = $1
                 ORDER BY generated_at ASC",
                &[&asset],
            )
            .await
            .map_err(|e| storage("list history", e))?;

        rows.iter().map(history_from_row).collect()
    }

    async fn list_assets(&self) -> Result<Vec<String>, RefreshError> {
        let rows = self
            .client
            .query("SELECT asset FROM signals_latest ORDER BY asset", &[])
            .await
            .map_err(|e| storage("list assets", e))?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }
}
