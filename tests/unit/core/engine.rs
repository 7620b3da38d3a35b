//! Unit tests for the freshness engine

use std::sync::Arc;
use std::time::Duration;

use rsipulse::core::engine::FreshnessEngine;
use rsipulse::db::{MemoryRepository, SignalRepository};
use rsipulse::error::RefreshError;
use rsipulse::models::SignalCategory;

use crate::test_utils::{record_aged, Script, ScriptedSource};

const FIVE_MINUTES: Duration = Duration::from_secs(300);

fn engine_with(source: ScriptedSource) -> (Arc<ScriptedSource>, Arc<MemoryRepository>, FreshnessEngine) {
    let source = Arc::new(source);
    let repository = Arc::new(MemoryRepository::new());
    let engine = FreshnessEngine::new(source.clone(), repository.clone());
    (source, repository, engine)
}

#[tokio::test]
async fn first_fetch_creates_latest_and_history() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("AAPL", 75.3));

    let record = engine.ensure_fresh("AAPL", FIVE_MINUTES).await.unwrap();
    assert_eq!(record.asset, "AAPL");
    assert_eq!(record.indicator_value, 75.3);
    assert_eq!(record.category, SignalCategory::Sell);
    assert_eq!(source.calls(), 1);

    let stored = repository.lookup_latest("AAPL").await.unwrap().unwrap();
    assert_eq!(stored, record);

    let history = repository.list_history("AAPL").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].indicator_value, 75.3);
    assert_eq!(history[0].category, SignalCategory::Sell);
    assert_eq!(history[0].generated_at, record.generated_at);
}

#[tokio::test]
async fn fresh_record_is_returned_without_a_fetch() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("BTC/USD", 55.0));

    let existing = record_aged("BTC/USD", 42.0, SignalCategory::Hold, 1);
    repository.upsert_latest(&existing).await.unwrap();

    let record = engine.ensure_fresh("BTC/USD", FIVE_MINUTES).await.unwrap();
    assert_eq!(record, existing);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn repeated_calls_within_the_window_fetch_once() {
    let (source, _repository, engine) = engine_with(ScriptedSource::with_value("AAPL", 45.0));

    let first = engine.ensure_fresh("AAPL", FIVE_MINUTES).await.unwrap();
    let second = engine.ensure_fresh("AAPL", FIVE_MINUTES).await.unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn stale_record_triggers_exactly_one_refresh() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("TSLA", 25.0));

    let stale = record_aged("TSLA", 60.0, SignalCategory::Hold, 6);
    repository.upsert_latest(&stale).await.unwrap();

    let record = engine.ensure_fresh("TSLA", FIVE_MINUTES).await.unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(record.indicator_value, 25.0);
    assert_eq!(record.category, SignalCategory::Buy);
    assert!(record.generated_at > stale.generated_at);
}

#[tokio::test]
async fn fetch_failure_preserves_the_existing_record() {
    let source = ScriptedSource::new();
    source.script("AMZN", Script::Unavailable);
    let (_, repository, engine) = engine_with(source);

    let stale = record_aged("AMZN", 65.0, SignalCategory::Hold, 10);
    repository.upsert_latest(&stale).await.unwrap();

    let err = engine.ensure_fresh("AMZN", FIVE_MINUTES).await.unwrap_err();
    assert!(matches!(err, RefreshError::ProviderUnavailable(_)));

    let kept = repository.lookup_latest("AMZN").await.unwrap().unwrap();
    assert_eq!(kept, stale);
    assert!(repository.list_history("AMZN").await.unwrap().is_empty());
}

#[tokio::test]
async fn non_finite_sample_is_rejected_without_a_write() {
    let source = ScriptedSource::new();
    source.script("GOOGL", Script::NonFinite);
    let (_, repository, engine) = engine_with(source);

    let err = engine.ensure_fresh("GOOGL", FIVE_MINUTES).await.unwrap_err();
    assert!(matches!(err, RefreshError::InvalidSample(_)));
    assert!(repository.lookup_latest("GOOGL").await.unwrap().is_none());
    assert!(repository.list_history("GOOGL").await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_domain_sample_is_rejected_without_a_write() {
    let (_, repository, engine) = engine_with(ScriptedSource::with_value("MSFT", 140.0));

    let err = engine.ensure_fresh("MSFT", FIVE_MINUTES).await.unwrap_err();
    assert!(matches!(err, RefreshError::InvalidSample(_)));
    assert!(repository.lookup_latest("MSFT").await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_symbol_fails_before_any_io() {
    let (source, repository, engine) = engine_with(ScriptedSource::new());

    let err = engine.ensure_fresh("", FIVE_MINUTES).await.unwrap_err();
    assert!(matches!(err, RefreshError::InvalidSymbol(_)));
    assert_eq!(source.calls(), 0);
    assert!(repository.list_latest_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn symbols_are_normalized_before_lookup_and_write() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("BTC/USD", 33.0));

    let record = engine.ensure_fresh("btcusd", FIVE_MINUTES).await.unwrap();
    assert_eq!(record.asset, "BTC/USD");
    assert_eq!(source.calls(), 1);

    // The normalized notation is now fresh for every spelling.
    let again = engine.ensure_fresh("BTC/USD", FIVE_MINUTES).await.unwrap();
    assert_eq!(again, record);
    assert_eq!(source.calls(), 1);

    let assets = repository.list_assets().await.unwrap();
    assert_eq!(assets, vec!["BTC/USD".to_string()]);
}

#[tokio::test]
async fn concurrent_refreshes_for_one_asset_fetch_once() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("AAPL", 75.3));

    // Both callers see a cold store; the per-asset lock must serialize
    // them so the second finds a fresh record instead of fetching again.
    let (first, second) = tokio::join!(
        engine.ensure_fresh("AAPL", FIVE_MINUTES),
        engine.ensure_fresh("AAPL", FIVE_MINUTES),
    );

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(first, second);

    let history = repository.list_history("AAPL").await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn concurrent_refreshes_of_a_stale_record_fetch_once() {
    let (source, repository, engine) = engine_with(ScriptedSource::with_value("TSLA", 25.0));

    let stale = record_aged("TSLA", 60.0, SignalCategory::Hold, 6);
    repository.upsert_latest(&stale).await.unwrap();

    let (first, second) = tokio::join!(
        engine.ensure_fresh("TSLA", FIVE_MINUTES),
        engine.ensure_fresh("TSLA", FIVE_MINUTES),
    );

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(first, second);
    assert!(first.generated_at > stale.generated_at);
}

#[tokio::test]
async fn generated_at_never_decreases_across_refreshes() {
    let (_, repository, engine) = engine_with(ScriptedSource::with_value("AAPL", 50.0));

    let first = engine.ensure_fresh("AAPL", Duration::ZERO).await.unwrap();
    let second = engine.ensure_fresh("AAPL", Duration::ZERO).await.unwrap();
    assert!(second.generated_at >= first.generated_at);

    let history = repository.list_history("AAPL").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].generated_at <= history[1].generated_at);
}
