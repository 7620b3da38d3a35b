//! Prometheus metrics for the HTTP surface and the refresh path.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,

    pub provider_fetches_total: IntCounter,
    pub refreshes_total: IntCounter,
    pub refresh_failures_total: IntCounter,

    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests received")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;

        let provider_fetches_total = IntCounter::new(
            "provider_fetches_total",
            "RSI fetches issued to the indicator provider",
        )?;
        let refreshes_total = IntCounter::new(
            "signal_refreshes_total",
            "Successful signal refreshes (latest upsert + history append)",
        )?;
        let refresh_failures_total = IntCounter::new(
            "signal_refresh_failures_total",
            "Refresh attempts that failed without writing",
        )?;

        let database_connected =
            Gauge::new("database_connected", "1 when the signal store is reachable")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(provider_fetches_total.clone()))?;
        registry.register(Box::new(refreshes_total.clone()))?;
        registry.register(Box::new(refresh_failures_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            provider_fetches_total,
            refreshes_total,
            refresh_failures_total,
            database_connected,
        })
    }

    /// Prometheus text exposition of all registered metrics.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics not utf-8: {}", e)))
    }
}
