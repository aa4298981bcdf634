use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters rendered on `/metrics` in Prometheus text format.
#[derive(Default)]
pub struct AppMetrics {
    request_count: AtomicU64,
    error_count: AtomicU64,
    latency_total_ms: AtomicU64,
    latency_count: AtomicU64,
    nearby_searches: AtomicU64,
    nearby_results: AtomicU64,
    rejected_searches: AtomicU64,
}

impl AppMetrics {
    pub fn record_request(&self, status: u16, latency_ms: u64) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if status >= 500 {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_total_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_nearby_search(&self, matched: usize) {
        self.nearby_searches.fetch_add(1, Ordering::Relaxed);
        self.nearby_results
            .fetch_add(matched as u64, Ordering::Relaxed);
    }

    pub fn record_rejected_search(&self) {
        self.rejected_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self, tracked_drivers: i64) -> String {
        let count = self.latency_count.load(Ordering::Relaxed).max(1);
        let avg_latency = self.latency_total_ms.load(Ordering::Relaxed) as f64 / count as f64;

        format!(
            concat!(
                "# TYPE http_requests_total counter\n",
                "http_requests_total {}\n",
                "# TYPE http_error_total counter\n",
                "http_error_total {}\n",
                "# TYPE http_latency_avg_ms gauge\n",
                "http_latency_avg_ms {:.2}\n",
                "# TYPE nearby_searches_total counter\n",
                "nearby_searches_total {}\n",
                "# TYPE nearby_results_total counter\n",
                "nearby_results_total {}\n",
                "# TYPE nearby_rejected_total counter\n",
                "nearby_rejected_total {}\n",
                "# TYPE tracked_drivers gauge\n",
                "tracked_drivers {}\n",
            ),
            self.request_count.load(Ordering::Relaxed),
            self.error_count.load(Ordering::Relaxed),
            avg_latency,
            self.nearby_searches.load(Ordering::Relaxed),
            self.nearby_results.load(Ordering::Relaxed),
            self.rejected_searches.load(Ordering::Relaxed),
            tracked_drivers,
        )
    }
}
