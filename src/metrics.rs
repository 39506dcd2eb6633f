// Sweep metrics
//
// Counters and timings for one sweep, logged once it finishes

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Sweep metrics
///
/// Atomic counters so the runner can record through a shared reference.
#[derive(Debug)]
pub struct SweepMetrics {
    /// Thicknesses the sweep started on
    pub points_attempted: AtomicUsize,

    /// Points that made it into the results
    pub points_recorded: AtomicUsize,

    /// Non-zero build exits, plus builds that never started or timed out
    pub build_failures: AtomicUsize,

    /// Simulator runs that never started or timed out
    pub run_failures: AtomicUsize,

    /// Runs whose output lacked one of the labels
    pub parse_failures: AtomicUsize,

    /// Patches that found no thickness line
    pub patch_misses: AtomicUsize,

    /// Total build time in milliseconds
    pub total_build_time_ms: AtomicU64,

    /// Total simulator time in milliseconds
    pub total_run_time_ms: AtomicU64,

    start_time: Instant,
}

impl SweepMetrics {
    pub fn new() -> Self {
        Self {
            points_attempted: AtomicUsize::new(0),
            points_recorded: AtomicUsize::new(0),
            build_failures: AtomicUsize::new(0),
            run_failures: AtomicUsize::new(0),
            parse_failures: AtomicUsize::new(0),
            patch_misses: AtomicUsize::new(0),
            total_build_time_ms: AtomicU64::new(0),
            total_run_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_attempt(&self) {
        self.points_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_point(&self) {
        self.points_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_build_failure(&self) {
        self.build_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_failure(&self) {
        self.run_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_patch_miss(&self) {
        self.patch_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_build_time(&self, duration: Duration) {
        self.total_build_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_run_time(&self, duration: Duration) {
        self.total_run_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn points_attempted(&self) -> usize {
        self.points_attempted.load(Ordering::Relaxed)
    }

    pub fn points_recorded(&self) -> usize {
        self.points_recorded.load(Ordering::Relaxed)
    }

    pub fn points_dropped(&self) -> usize {
        self.build_failures.load(Ordering::Relaxed)
            + self.run_failures.load(Ordering::Relaxed)
            + self.parse_failures.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average simulator time per recorded point in milliseconds
    pub fn avg_run_time_ms(&self) -> f64 {
        let total = self.total_run_time_ms.load(Ordering::Relaxed);
        let count = self.points_recorded.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Sweep Metrics Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
        tracing::info!(
            "Points: {} attempted, {} recorded",
            self.points_attempted(),
            self.points_recorded()
        );
        tracing::info!(
            "Dropped: {} build, {} run, {} parse",
            self.build_failures.load(Ordering::Relaxed),
            self.run_failures.load(Ordering::Relaxed),
            self.parse_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Build time: {:.2}s, simulation time: {:.2}s (avg: {:.2}ms per point)",
            self.total_build_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.total_run_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_run_time_ms()
        );

        let misses = self.patch_misses.load(Ordering::Relaxed);
        if misses > 0 {
            tracing::warn!("Header thickness line was missing on {} patches", misses);
        }
    }
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new()
    }
}
