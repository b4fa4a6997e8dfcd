use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::IntCounterVec;
use prometheus::IntGaugeVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;


lazy_static! {
    pub static ref QUEUE_DEPTH: IntGaugeVec = IntGaugeVec::new(
        Opts::new("workqueue_depth", "Current depth of the work queue"),
        &["name"]
    )
    .expect("metric can not be created");

    pub static ref QUEUE_ADDS: IntCounterVec = IntCounterVec::new(
        Opts::new("workqueue_adds_total", "Adds accepted by the work queue"),
        &["name"]
    )
    .expect("metric can not be created");

    pub static ref QUEUE_RETRIES: IntCounterVec = IntCounterVec::new(
        Opts::new("workqueue_retries_total", "Rate limited re-adds after a failed pass"),
        &["name"]
    )
    .expect("metric can not be created");

    pub static ref SYNC_DURATION_METRIC: HistogramVec = HistogramVec::new(
        HistogramOpts::new("observed_config_sync_duration_ms", "Duration of a reconciliation pass in ms")
            .buckets(exponential_buckets(1.0, 2.0, 14).expect("valid buckets")),
        &["name"]
    )
    .expect("metric can not be created");

    pub static ref OBSERVED_CONFIG_WRITES: IntCounterVec = IntCounterVec::new(
        Opts::new("observed_config_writes_total", "Updates issued for a changed observed config"),
        &["name"]
    )
    .expect("metric can not be created");

    pub static ref SYNC_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("observed_config_sync_failures_total", "Failed reconciliation passes by error kind"),
        &["name", "kind"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

/// Registers every collector with [`REGISTRY`]. Safe to call repeatedly.
pub fn register_custom_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(QUEUE_DEPTH.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(QUEUE_ADDS.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(QUEUE_RETRIES.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(SYNC_DURATION_METRIC.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(OBSERVED_CONFIG_WRITES.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(SYNC_FAILURES.clone()))
            .expect("collector can be registered");
    });
}

/// Text exposition of the registered collectors, ready for a scrape handler.
pub fn encode_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode custom metrics: {}", e);
    }
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            warn!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
