use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing intake activity.
#[derive(Default)]
pub struct IntakeMetrics {
    resumes_processed: AtomicU64,
    resumes_failed: AtomicU64,
    chunks_indexed: AtomicU64,
}

impl IntakeMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed pipeline run and the number of chunks it indexed.
    pub fn record_processed(&self, chunk_count: u64) {
        self.resumes_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_indexed
            .fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Record a pipeline run that failed and rolled back to pending.
    pub fn record_failed(&self) {
        self.resumes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            resumes_processed: self.resumes_processed.load(Ordering::Relaxed),
            resumes_failed: self.resumes_failed.load(Ordering::Relaxed),
            chunks_indexed: self.chunks_indexed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of intake counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of resumes that completed processing since startup.
    pub resumes_processed: u64,
    /// Number of pipeline runs that failed and reset to pending.
    pub resumes_failed: u64,
    /// Total chunk count indexed across all processed resumes.
    pub chunks_indexed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_processed_and_chunks() {
        let metrics = IntakeMetrics::new();
        metrics.record_processed(2);
        metrics.record_processed(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resumes_processed, 2);
        assert_eq!(snapshot.chunks_indexed, 5);
        assert_eq!(snapshot.resumes_failed, 0);
    }

    #[test]
    fn records_failures_independently() {
        let metrics = IntakeMetrics::new();
        metrics.record_failed();
        metrics.record_processed(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resumes_failed, 1);
        assert_eq!(snapshot.resumes_processed, 1);
    }
}
