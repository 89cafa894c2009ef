//! Ping metrics tracking using OpenTelemetry.

use crate::notify::{PingError, SkipReason};
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for ping operations.
///
/// # Examples
///
/// ```rust,no_run
/// use pubindex_notifier::metrics::PingMetrics;
/// use opentelemetry::global;
///
/// let metrics = PingMetrics::new(global::meter("pubindex-notifier"));
///
/// let timer = metrics.start_ping();
/// // ... send the ping ...
/// metrics.record_delivered(timer);
/// ```
#[derive(Clone)]
pub struct PingMetrics {
    attempts: Counter<u64>,
    delivered: Counter<u64>,
    failures: Counter<u64>,
    skipped: Counter<u64>,
    duration: Histogram<f64>,
}

impl PingMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let attempts = meter
            .u64_counter("pubindex.ping.attempts")
            .with_description("Total number of pings sent")
            .build();

        let delivered = meter
            .u64_counter("pubindex.ping.delivered")
            .with_description("Number of pings acknowledged with 200")
            .build();

        let failures = meter
            .u64_counter("pubindex.ping.failures")
            .with_description("Number of pings that failed or were rejected")
            .build();

        let skipped = meter
            .u64_counter("pubindex.ping.skipped")
            .with_description("Number of save events that did not warrant a ping")
            .build();

        let duration = meter
            .f64_histogram("pubindex.ping.duration")
            .with_description("Duration of ping requests in seconds")
            .with_unit("s")
            .build();

        Self {
            attempts,
            delivered,
            failures,
            skipped,
            duration,
        }
    }

    /// Start a ping timer.
    ///
    /// Pass the returned `Instant` to `record_delivered` or `record_failed`.
    pub fn start_ping(&self) -> Instant {
        self.attempts.add(1, &[]);
        Instant::now()
    }

    /// Record an acknowledged ping.
    pub fn record_delivered(&self, start: Instant) {
        self.delivered.add(1, &[]);
        self.duration.record(start.elapsed().as_secs_f64(), &[]);
    }

    /// Record a failed ping.
    pub fn record_failed(&self, start: Instant, error: &PingError) {
        self.failures.add(1, &[KeyValue::new("kind", error.kind())]);
        self.duration.record(start.elapsed().as_secs_f64(), &[]);
    }

    /// Record a skipped save event.
    pub fn record_skipped(&self, reason: SkipReason) {
        self.skipped.add(1, &[KeyValue::new("reason", reason.as_str())]);
    }
}
