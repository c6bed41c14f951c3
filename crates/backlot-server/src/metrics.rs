//! Request metrics, exposed in Prometheus text format and as JSON.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;

/// Atomics-based collector; cheap enough to sit on every request.
pub struct Metrics {
    pub http_requests_total: AtomicU64,
    pub http_requests_2xx: AtomicU64,
    pub http_requests_4xx: AtomicU64,
    pub http_requests_5xx: AtomicU64,
    pub http_request_duration_ms_total: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            http_requests_total: AtomicU64::new(0),
            http_requests_2xx: AtomicU64::new(0),
            http_requests_4xx: AtomicU64::new(0),
            http_requests_5xx: AtomicU64::new(0),
            http_request_duration_ms_total: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_request(&self, status: u16, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        match status {
            200..=299 => self.http_requests_2xx.fetch_add(1, Ordering::Relaxed),
            400..=499 => self.http_requests_4xx.fetch_add(1, Ordering::Relaxed),
            500..=599 => self.http_requests_5xx.fetch_add(1, Ordering::Relaxed),
            _ => 0,
        };
        self.http_request_duration_ms_total
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            http_requests_total: self.http_requests_total.load(Ordering::Relaxed),
            http_requests_2xx: self.http_requests_2xx.load(Ordering::Relaxed),
            http_requests_4xx: self.http_requests_4xx.load(Ordering::Relaxed),
            http_requests_5xx: self.http_requests_5xx.load(Ordering::Relaxed),
            http_request_duration_ms_total: self
                .http_request_duration_ms_total
                .load(Ordering::Relaxed),
            uptime_seconds: self.uptime_seconds(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct MetricsSnapshot {
    http_requests_total: u64,
    http_requests_2xx: u64,
    http_requests_4xx: u64,
    http_requests_5xx: u64,
    http_request_duration_ms_total: u64,
    uptime_seconds: u64,
}

/// Middleware recording status class and latency for every request.
pub async fn metrics_middleware(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics.record_request(
        response.status().as_u16(),
        start.elapsed().as_millis() as u64,
    );
    response
}

/// GET /metrics: Prometheus text exposition.
pub async fn prometheus_metrics(State(metrics): State<Arc<Metrics>>) -> String {
    let s = metrics.snapshot();
    format!(
        "# HELP backlot_http_requests_total Total HTTP requests\n\
         # TYPE backlot_http_requests_total counter\n\
         backlot_http_requests_total {}\n\
         backlot_http_requests_total{{class=\"2xx\"}} {}\n\
         backlot_http_requests_total{{class=\"4xx\"}} {}\n\
         backlot_http_requests_total{{class=\"5xx\"}} {}\n\
         # HELP backlot_http_request_duration_ms_total Summed request latency\n\
         # TYPE backlot_http_request_duration_ms_total counter\n\
         backlot_http_request_duration_ms_total {}\n\
         # HELP backlot_uptime_seconds Server uptime\n\
         # TYPE backlot_uptime_seconds gauge\n\
         backlot_uptime_seconds {}\n",
        s.http_requests_total,
        s.http_requests_2xx,
        s.http_requests_4xx,
        s.http_requests_5xx,
        s.http_request_duration_ms_total,
        s.uptime_seconds,
    )
}

/// GET /metrics.json.
pub async fn json_metrics(State(metrics): State<Arc<Metrics>>) -> Json<serde_json::Value> {
    Json(serde_json::to_value(metrics.snapshot()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_counters_bucket_by_status_class() {
        let metrics = Metrics::new();
        metrics.record_request(200, 5);
        metrics.record_request(404, 1);
        metrics.record_request(500, 2);
        metrics.record_request(201, 3);

        assert_eq!(metrics.http_requests_total.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.http_requests_2xx.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.http_requests_4xx.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.http_requests_5xx.load(Ordering::Relaxed), 1);
        assert_eq!(
            metrics.http_request_duration_ms_total.load(Ordering::Relaxed),
            11
        );
    }

    #[tokio::test]
    async fn prometheus_output_contains_series() {
        let metrics = Arc::new(Metrics::new());
        metrics.record_request(200, 1);

        let text = prometheus_metrics(State(metrics)).await;
        assert!(text.contains("backlot_http_requests_total 1"));
        assert!(text.contains("backlot_uptime_seconds"));
    }
}
