//! Prometheus metrics for the engine and the HTTP front-end.

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,

    pub cycles_total: IntCounter,
    pub errors_total: IntCounter,
    pub fetch_failures_total: IntCounter,
    pub notify_failures_total: IntCounter,
    pub signals_total: IntCounterVec,
    pub engine_running: IntGauge,
    pub last_check_timestamp_seconds: Gauge,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("engine_cycles_total", "Polling cycles started")?;
        let errors_total = IntCounter::new(
            "engine_errors_total",
            "Contained per-cycle errors (fetch, volatility, notify)",
        )?;
        let fetch_failures_total =
            IntCounter::new("engine_fetch_failures_total", "Market data fetch failures")?;
        let notify_failures_total =
            IntCounter::new("engine_notify_failures_total", "Notification delivery failures")?;
        let signals_total = IntCounterVec::new(
            Opts::new("engine_signals_total", "Signals recorded in the ledger"),
            &["direction"],
        )?;
        let engine_running = IntGauge::new("engine_running", "1 while the polling loop runs")?;
        let last_check_timestamp_seconds = Gauge::new(
            "engine_last_check_timestamp_seconds",
            "Unix time of the last successful evaluation",
        )?;

        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests in flight")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;
        registry.register(Box::new(notify_failures_total.clone()))?;
        registry.register(Box::new(signals_total.clone()))?;
        registry.register(Box::new(engine_running.clone()))?;
        registry.register(Box::new(last_check_timestamp_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            errors_total,
            fetch_failures_total,
            notify_failures_total,
            signals_total,
            engine_running,
            last_check_timestamp_seconds,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
