//! HTTP endpoint server using Axum
//!
//! Read-only query surface over the freshness engine and the repository:
//! latest-by-symbol (on-demand refresh), latest-for-all (aggregation, no
//! refresh), history-by-symbol, and the known asset list.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::Config;
use crate::core::engine::FreshnessEngine;
use crate::db::{PostgresRepository, SignalRepository};
use crate::error::RefreshError;
use crate::metrics::Metrics;
use crate::models::{normalize_symbol, LatestSignal, SignalHistoryEntry};
use crate::services::TwelveDataSource;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FreshnessEngine>,
    pub repository: Arc<dyn SignalRepository>,
    pub metrics: Arc<Metrics>,
    pub health: Arc<RwLock<HealthStatus>>,
    pub start_time: Arc<Instant>,
    pub interactive_staleness: Duration,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "rsipulse-signal-tracker"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    symbol: Option<String>,
}

/// Latest signal for one symbol, refreshing it first when stale.
async fn get_latest_signal(
    State(state): State<AppState>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<LatestSignal>, RefreshError> {
    let symbol = params
        .symbol
        .ok_or_else(|| RefreshError::InvalidSymbol("missing symbol parameter".to_string()))?;

    let record = state
        .engine
        .ensure_fresh(&symbol, state.interactive_staleness)
        .await?;
    Ok(Json(record))
}

/// Latest signal for every known asset. Reads the aggregation directly,
/// no refresh and no provider calls; freshness is whatever the last batch
/// or interactive refresh produced.
async fn list_all_signals(
    State(state): State<AppState>,
) -> Result<Json<Vec<LatestSignal>>, RefreshError> {
    let records = state.repository.list_latest_all().await?;
    Ok(Json(records))
}

/// History for one symbol, oldest first. Unknown symbols yield `[]`.
async fn get_signal_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Vec<SignalHistoryEntry>>, RefreshError> {
    let asset = normalize_symbol(&symbol)?;
    let entries = state.repository.list_history(&asset).await?;
    Ok(Json(entries))
}

/// Distinct asset identifiers present in the store.
async fn list_assets(State(state): State<AppState>) -> Result<Json<Vec<String>>, RefreshError> {
    let assets = state.repository.list_assets().await?;
    Ok(Json(assets))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(get_latest_signal))
        .route("/api/signals/all", get(list_all_signals))
        .route("/api/signals/{symbol}/history", get(get_signal_history))
        .route("/api/assets", get(list_assets))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Construct the full state (Postgres store + Twelve Data source) and
/// serve until the listener fails. Boot failures here are fatal.
pub async fn start_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);

    let repository: Arc<dyn SignalRepository> = Arc::new(PostgresRepository::new().await?);
    metrics.database_connected.set(1.0);

    let source = Arc::new(TwelveDataSource::new(
        crate::config::get_provider_base_url(),
        crate::config::get_provider_api_key(),
        config.fetch_timeout,
    )?);

    let engine = Arc::new(
        FreshnessEngine::new(source, repository.clone()).with_metrics(metrics.clone()),
    );

    let state = AppState {
        engine,
        repository,
        metrics,
        health: Arc::new(RwLock::new(HealthStatus::default())),
        start_time: Arc::new(Instant::now()),
        interactive_staleness: config.interactive_staleness,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
