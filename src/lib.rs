//! RSI signal tracking service.
//!
//! Samples RSI readings for a configured asset universe from an external
//! market-data provider, classifies each reading into a BUY/SELL/HOLD
//! signal, and persists both the latest record per asset and an append-only
//! history. The freshness engine in [`core::engine`] decides when a stored
//! signal is stale and drives re-fetch, classification and storage.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
