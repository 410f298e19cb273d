use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_evaluations: AtomicUsize,
    successful_evaluations: AtomicUsize,
    failed_evaluations: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,
    total_score_time_us: AtomicU64,
    total_evaluation_time_us: AtomicU64,

    // Counts
    documents_scored: AtomicUsize,
    documents_skipped: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_evaluations: AtomicUsize::new(0),
            successful_evaluations: AtomicUsize::new(0),
            failed_evaluations: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            total_score_time_us: AtomicU64::new(0),
            total_evaluation_time_us: AtomicU64::new(0),
            documents_scored: AtomicUsize::new(0),
            documents_skipped: AtomicUsize::new(0),
        })
    }

    pub fn record_evaluation(&self, success: bool, duration: Duration) {
        self.total_evaluations.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_evaluations.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_evaluations.fetch_add(1, Ordering::Relaxed);
        }
        self.total_evaluation_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_scored(&self, duration: Duration) {
        self.total_score_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.documents_scored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.documents_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_evaluations: self.total_evaluations.load(Ordering::Relaxed),
            successful_evaluations: self.successful_evaluations.load(Ordering::Relaxed),
            failed_evaluations: self.failed_evaluations.load(Ordering::Relaxed),
            avg_extract_time_ms: self.avg_time_ms(&self.total_extract_time_us, &self.documents_scored),
            avg_score_time_ms: self.avg_time_ms(&self.total_score_time_us, &self.documents_scored),
            avg_evaluation_time_ms: self.avg_time_ms(&self.total_evaluation_time_us, &self.total_evaluations),
            documents_scored: self.documents_scored.load(Ordering::Relaxed),
            documents_skipped: self.documents_skipped.load(Ordering::Relaxed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        let cnt = count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_evaluations: usize,
    pub successful_evaluations: usize,
    pub failed_evaluations: usize,
    pub avg_extract_time_ms: f64,
    pub avg_score_time_ms: f64,
    pub avg_evaluation_time_ms: f64,
    pub documents_scored: usize,
    pub documents_skipped: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_averages() {
        let metrics = Metrics::new();
        metrics.record_extract(Duration::from_millis(4));
        metrics.record_scored(Duration::from_millis(2));
        metrics.record_extract(Duration::from_millis(6));
        metrics.record_scored(Duration::from_millis(4));
        metrics.record_skipped();
        metrics.record_evaluation(true, Duration::from_millis(20));

        let snap = metrics.snapshot();
        assert_eq!(snap.documents_scored, 2);
        assert_eq!(snap.documents_skipped, 1);
        assert_eq!(snap.successful_evaluations, 1);
        assert!((snap.avg_extract_time_ms - 5.0).abs() < 1e-9);
        assert!((snap.avg_score_time_ms - 3.0).abs() < 1e-9);
        assert!((snap.avg_evaluation_time_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Metrics::new().snapshot();
        assert_eq!(snap.total_evaluations, 0);
        assert_eq!(snap.avg_score_time_ms, 0.0);
    }
}
