use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Thread-safe counters for the market data feed.
#[derive(Debug)]
pub struct FeedMetrics {
    messages_received: AtomicU64,
    depth_updates: AtomicU64,
    mark_price_updates: AtomicU64,
    parse_errors: AtomicU64,
    websocket_errors: AtomicU64,
    reconnect_attempts: AtomicU64,
    reconnect_successes: AtomicU64,

    inner: RwLock<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    start_time: Instant,
    last_depth_time: Option<Instant>,
    last_error_time: Option<Instant>,
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            depth_updates: AtomicU64::new(0),
            mark_price_updates: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            websocket_errors: AtomicU64::new(0),
            reconnect_attempts: AtomicU64::new(0),
            reconnect_successes: AtomicU64::new(0),
            inner: RwLock::new(MetricsInner {
                start_time: Instant::now(),
                last_depth_time: None,
                last_error_time: None,
            }),
        }
    }

    pub fn inc_messages_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_depth_updates(&self) {
        self.depth_updates.fetch_add(1, Ordering::Relaxed);
        self.inner.write().last_depth_time = Some(Instant::now());
    }

    pub fn inc_mark_price_updates(&self) {
        self.mark_price_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_parse_errors(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        self.inner.write().last_error_time = Some(Instant::now());
    }

    pub fn inc_websocket_errors(&self) {
        self.websocket_errors.fetch_add(1, Ordering::Relaxed);
        self.inner.write().last_error_time = Some(Instant::now());
    }

    pub fn inc_reconnect_attempts(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reconnect_successes(&self) {
        self.reconnect_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn depth_updates(&self) -> u64 {
        self.depth_updates.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> f64 {
        self.inner.read().start_time.elapsed().as_secs_f64()
    }

    pub fn secs_since_last_depth_update(&self) -> Option<f64> {
        self.inner
            .read()
            .last_depth_time
            .map(|t| t.elapsed().as_secs_f64())
    }

    /// Generates a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> FeedMetricsSnapshot {
        let uptime_secs = self.uptime_secs();
        let depth_updates = self.depth_updates();
        FeedMetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            depth_updates,
            mark_price_updates: self.mark_price_updates.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            websocket_errors: self.websocket_errors.load(Ordering::Relaxed),
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
            reconnect_successes: self.reconnect_successes.load(Ordering::Relaxed),
            uptime_secs,
            depth_updates_per_second: if uptime_secs > 0.0 {
                depth_updates as f64 / uptime_secs
            } else {
                0.0
            },
            secs_since_last_depth_update: self.secs_since_last_depth_update(),
            secs_since_last_error: self
                .inner
                .read()
                .last_error_time
                .map(|t| t.elapsed().as_secs_f64()),
        }
    }
}

/// A point-in-time snapshot of feed metrics.
#[derive(Debug, Clone)]
pub struct FeedMetricsSnapshot {
    pub messages_received: u64,
    pub depth_updates: u64,
    pub mark_price_updates: u64,
    pub parse_errors: u64,
    pub websocket_errors: u64,
    pub reconnect_attempts: u64,
    pub reconnect_successes: u64,
    pub uptime_secs: f64,
    pub depth_updates_per_second: f64,
    pub secs_since_last_depth_update: Option<f64>,
    pub secs_since_last_error: Option<f64>,
}

/// Health of the feed, derived from depth stream staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Depth updates are flowing.
    Healthy,
    /// Depth data is getting stale.
    Degraded,
    /// No depth data for an extended period.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "HEALTHY"),
            HealthStatus::Degraded => write!(f, "DEGRADED"),
            HealthStatus::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

impl FeedMetricsSnapshot {
    /// The depth stream normally ticks several times a second, so a few
    /// silent seconds already indicate trouble.
    const STALE_THRESHOLD_SECS: f64 = 10.0;
    const UNHEALTHY_THRESHOLD_SECS: f64 = 30.0;

    /// Derives health from how long the depth stream has been silent.
    pub fn health_status(&self) -> HealthStatus {
        let silent_secs = match self.secs_since_last_depth_update {
            Some(secs) => secs,
            // Nothing received yet: judge by uptime instead.
            None => self.uptime_secs,
        };

        if silent_secs > Self::UNHEALTHY_THRESHOLD_SECS {
            HealthStatus::Unhealthy
        } else if silent_secs > Self::STALE_THRESHOLD_SECS {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

impl std::fmt::Display for FeedMetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Feed Metrics ===")?;
        writeln!(f, "Uptime:              {:.1}s", self.uptime_secs)?;
        writeln!(f, "Messages received:   {}", self.messages_received)?;
        writeln!(f, "Depth updates:       {}", self.depth_updates)?;
        writeln!(f, "Depth updates/sec:   {:.2}", self.depth_updates_per_second)?;
        writeln!(f, "Mark price updates:  {}", self.mark_price_updates)?;
        writeln!(f, "Parse errors:        {}", self.parse_errors)?;
        writeln!(f, "WebSocket errors:    {}", self.websocket_errors)?;
        writeln!(f, "Reconnect attempts:  {}", self.reconnect_attempts)?;
        writeln!(f, "Reconnect successes: {}", self.reconnect_successes)?;
        if let Some(secs) = self.secs_since_last_depth_update {
            writeln!(f, "Since last depth:    {:.1}s", secs)?;
        }
        Ok(())
    }
}

/// Shared handle to metrics.
pub type SharedMetrics = Arc<FeedMetrics>;

pub fn create_metrics() -> SharedMetrics {
    Arc::new(FeedMetrics::new())
}
