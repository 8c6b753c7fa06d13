//! Prometheus request metrics
//!
//! Each router owns its own registry, so separate routers (and tests) never
//! share counters.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Request counter and latency histogram exposed at `/metrics`
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl HttpMetrics {
    /// Creates and registers `http_requests_total` and
    /// `http_request_duration_seconds`
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration in seconds"),
            &["method", "path"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }

    /// Records one finished request
    pub fn observe(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[method, path])
            .observe(elapsed.as_secs_f64());
    }

    /// Renders every registered metric in the text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_requests_are_rendered() {
        let metrics = HttpMetrics::new().unwrap();
        metrics.observe("GET", "/schools/:id", 404, Duration::from_millis(3));
        metrics.observe("GET", "/schools/:id", 404, Duration::from_millis(5));

        let text = metrics.render().unwrap();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains("# TYPE http_request_duration_seconds histogram"));
        let line = text
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains("status=\"404\""))
            .unwrap();
        assert!(line.contains("path=\"/schools/:id\""));
        assert!(line.ends_with(" 2"));
        assert!(text.contains("http_request_duration_seconds_count{method=\"GET\",path=\"/schools/:id\"} 2"));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = HttpMetrics::new().unwrap();
        let second = HttpMetrics::new().unwrap();
        first.observe("POST", "/schools", 201, Duration::ZERO);

        assert!(first.render().unwrap().contains("status=\"201\""));
        assert!(!second.render().unwrap().contains("status=\"201\""));
    }
}
