//! Study run statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Snapshot of a study run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Pickups scanned across all experiments.
    pub records_scanned: u64,
    pub experiments_evaluated: u64,
    pub experiments_failed: u64,
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Pickups scanned per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.records_scanned as f64 / secs
        }
    }
}

/// Thread-safe collector for run statistics.
///
/// Experiments record into it from rayon workers; call
/// [`snapshot`](Self::snapshot) at any time for the current totals.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    records_scanned: AtomicU64,
    experiments_evaluated: AtomicU64,
    experiments_failed: AtomicU64,
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsCollector {
    /// Creates a collector; the start time is recorded now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            records_scanned: AtomicU64::new(0),
            experiments_evaluated: AtomicU64::new(0),
            experiments_failed: AtomicU64::new(0),
        }
    }

    pub fn record_scanned(&self, records: u64) {
        self.records_scanned.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_evaluated(&self) {
        self.experiments_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.experiments_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> RunStatistics {
        RunStatistics {
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            experiments_evaluated: self.experiments_evaluated.load(Ordering::Relaxed),
            experiments_failed: self.experiments_failed.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_concurrent_recording() {
        let collector = StatisticsCollector::new();
        (0..100).into_par_iter().for_each(|i| {
            collector.record_scanned(10);
            if i % 4 == 0 {
                collector.record_failed();
            } else {
                collector.record_evaluated();
            }
        });

        let stats = collector.snapshot();
        assert_eq!(stats.records_scanned, 1000);
        assert_eq!(stats.experiments_evaluated, 75);
        assert_eq!(stats.experiments_failed, 25);
    }

    #[test]
    fn test_throughput_of_empty_run() {
        assert_eq!(RunStatistics::default().throughput(), 0.0);
    }
}
