// Session metrics module
//
// Lightweight counters for codec and session activity

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Session activity counters
///
/// Uses atomic operations so a shared [`SessionStore`](crate::state::SessionStore)
/// can record without locks. Logged once on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Blobs produced by the codec
    pub encodes: AtomicU64,

    /// Blobs decoded successfully
    pub decodes: AtomicU64,

    /// Blobs that failed to decode and were replaced
    pub decode_failures: AtomicU64,

    /// Sessions started from the generated default configuration
    pub bootstraps: AtomicU64,

    /// Committed configuration edits
    pub mutations: AtomicU64,

    /// Settings imports refused at the top level
    pub rejected_imports: AtomicU64,

    /// Time spent encoding, in microseconds
    pub total_encode_time_us: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            encodes: AtomicU64::new(0),
            decodes: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            bootstraps: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
            rejected_imports: AtomicU64::new(0),
            total_encode_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_encode(&self, duration: Duration) {
        self.encodes.fetch_add(1, Ordering::Relaxed);
        self.total_encode_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_decode(&self) {
        self.decodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bootstrap(&self) {
        self.bootstraps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_import(&self) {
        self.rejected_imports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average encode time in microseconds
    pub fn avg_encode_time_us(&self) -> f64 {
        let total = self.total_encode_time_us.load(Ordering::Relaxed);
        let count = self.encodes.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Codec: {} encodes (avg {:.1}us), {} decodes, {} decode failures",
            self.encodes.load(Ordering::Relaxed),
            self.avg_encode_time_us(),
            self.decodes.load(Ordering::Relaxed),
            self.decode_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Session: {} bootstraps, {} mutations, {} rejected imports",
            self.bootstraps.load(Ordering::Relaxed),
            self.mutations.load(Ordering::Relaxed),
            self.rejected_imports.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
