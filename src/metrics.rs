//! In-memory metrics for the HTTP surface. Counters and latency histograms
//! are kept per route and exposed in Prometheus text format at `/metrics`.

use axum::{extract::Request, middleware::Next, response::Response};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency aggregate in whole microseconds.
#[derive(Debug, Clone)]
pub struct Histogram {
    sum_micros: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            sum_micros: Arc::new(AtomicU64::new(0)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn observe_micros(&self, micros: u64) {
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum_seconds(&self) -> f64 {
        self.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: DashMap<String, Counter>,
    histograms: DashMap<String, Histogram>,
}

impl MetricsRegistry {
    pub fn get_or_create_counter(&self, name: &str) -> Counter {
        self.counters.entry(name.to_string()).or_default().clone()
    }

    pub fn get_or_create_histogram(&self, name: &str) -> Histogram {
        self.histograms
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn export(&self) -> String {
        let mut out = String::new();
        for entry in self.counters.iter() {
            out.push_str(&format!("# TYPE {} counter\n", entry.key()));
            out.push_str(&format!("{} {}\n", entry.key(), entry.value().get()));
        }
        for entry in self.histograms.iter() {
            out.push_str(&format!("# TYPE {} summary\n", entry.key()));
            out.push_str(&format!(
                "{}_sum {}\n{}_count {}\n",
                entry.key(),
                entry.value().sum_seconds(),
                entry.key(),
                entry.value().count()
            ));
        }
        out
    }
}

static METRICS: OnceLock<MetricsRegistry> = OnceLock::new();

pub fn registry() -> &'static MetricsRegistry {
    METRICS.get_or_init(MetricsRegistry::default)
}

/// Middleware recording a request counter (per method/status) and latency
/// histogram for every request.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    registry()
        .get_or_create_counter(&format!(
            "http_requests_total{{method=\"{}\",status=\"{}\"}}",
            method, status
        ))
        .inc();
    registry()
        .get_or_create_histogram("http_request_duration_seconds")
        .observe_micros(start.elapsed().as_micros() as u64);

    response
}

/// `GET /metrics`
pub async fn metrics_handler() -> String {
    registry().export()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increments() {
        let registry = MetricsRegistry::default();
        let counter = registry.get_or_create_counter("requests");
        counter.inc();
        counter.inc();
        assert_eq!(registry.get_or_create_counter("requests").get(), 2);
    }

    #[test]
    fn histogram_aggregates_sum_and_count() {
        let histogram = Histogram::new();
        histogram.observe_micros(1_500_000);
        histogram.observe_micros(500_000);
        assert_eq!(histogram.count(), 2);
        assert!((histogram.sum_seconds() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn export_contains_metric_lines() {
        let registry = MetricsRegistry::default();
        registry.get_or_create_counter("hits").inc();
        let text = registry.export();
        assert!(text.contains("# TYPE hits counter"));
        assert!(text.contains("hits 1"));
    }
}
