use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{from_middleware, Middleware};
use crate::context::{Context, HandlerFunc};

/// Request metrics collected with lock-free counters.
///
/// Register [`Metrics::middleware`] on the engine (or a group) and expose
/// [`Metrics::endpoint`] as a route to scrape the counters in Prometheus
/// text format:
///
/// ```rust
/// use std::sync::Arc;
/// use grove::{middleware::Metrics, Engine};
///
/// let metrics = Arc::new(Metrics::new());
/// let mut engine = Engine::new();
/// engine.use_middleware(metrics.middleware());
/// engine.get("/metrics", metrics.endpoint());
/// ```
#[derive(Default)]
pub struct Metrics {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    /// Completed responses per status class, index 0 = 1xx .. 4 = 5xx
    status_classes: [AtomicUsize; 5],
    aborted: AtomicUsize,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests that finished the chain
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean time spent in the chain below this middleware.
    ///
    /// Zero before the first request.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Responses observed with a status in `class` (`2` for 2xx, ...)
    #[must_use]
    pub fn status_class_count(&self, class: u16) -> usize {
        match class {
            1..=5 => self.status_classes[usize::from(class - 1)].load(Ordering::Relaxed),
            _ => 0,
        }
    }

    /// Requests ended through `fail`
    #[must_use]
    pub fn aborted_count(&self) -> usize {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Counters in Prometheus text exposition format
    #[must_use]
    pub fn prometheus_text(&self) -> String {
        let classes: String = (1..=5u16)
            .map(|class| {
                format!(
                    "grove_responses_total{{class=\"{class}xx\"}} {}\n",
                    self.status_class_count(class)
                )
            })
            .collect();
        format!(
            "# HELP grove_requests_total Total number of handled requests\n\
             # TYPE grove_requests_total counter\n\
             grove_requests_total {}\n\
             # HELP grove_request_latency_seconds Average request latency in seconds\n\
             # TYPE grove_request_latency_seconds gauge\n\
             grove_request_latency_seconds {}\n\
             # HELP grove_responses_total Responses by status class\n\
             # TYPE grove_responses_total counter\n\
             {}\
             # HELP grove_aborted_total Requests aborted by a handler\n\
             # TYPE grove_aborted_total counter\n\
             grove_aborted_total {}\n",
            self.request_count(),
            self.average_latency().as_secs_f64(),
            classes,
            self.aborted_count()
        )
    }

    /// Chain handler recording every request passing through it
    #[must_use]
    pub fn middleware(self: &Arc<Self>) -> HandlerFunc {
        from_middleware(Arc::clone(self))
    }

    /// Route handler serving [`Metrics::prometheus_text`]
    #[must_use]
    pub fn endpoint(self: &Arc<Self>) -> HandlerFunc {
        let metrics = Arc::clone(self);
        Arc::new(move |ctx: &mut Context| {
            ctx.set_header("content-type", "text/plain; version=0.0.4");
            ctx.data(200, metrics.prometheus_text());
        })
    }
}

impl Middleware for Metrics {
    fn after(&self, ctx: &mut Context, latency: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        let class = ctx.response().status / 100;
        if (1..=5).contains(&class) {
            self.status_classes[usize::from(class - 1)].fetch_add(1, Ordering::Relaxed);
        }
        if ctx.is_aborted() {
            self.aborted.fetch_add(1, Ordering::Relaxed);
        }
    }
}
