use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing record activity since startup.
#[derive(Default)]
pub struct RecordMetrics {
    students_created: AtomicU64,
    students_deleted: AtomicU64,
    lookups_missed: AtomicU64,
}

impl RecordMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a persisted student.
    pub fn record_created(&self) {
        self.students_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removed student.
    pub fn record_deleted(&self) {
        self.students_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup, delete, or search that matched nothing.
    pub fn record_miss(&self) {
        self.lookups_missed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            students_created: self.students_created.load(Ordering::Relaxed),
            students_deleted: self.students_deleted.load(Ordering::Relaxed),
            lookups_missed: self.lookups_missed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of record counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of students created since startup.
    pub students_created: u64,
    /// Number of students deleted since startup.
    pub students_deleted: u64,
    /// Number of not-found outcomes across lookups, deletes, and searches.
    pub lookups_missed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_activity() {
        let metrics = RecordMetrics::new();
        metrics.record_created();
        metrics.record_created();
        metrics.record_deleted();
        metrics.record_miss();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.students_created, 2);
        assert_eq!(snapshot.students_deleted, 1);
        assert_eq!(snapshot.lookups_missed, 1);
    }

    #[test]
    fn snapshot_starts_empty() {
        let snapshot = RecordMetrics::new().snapshot();
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                students_created: 0,
                students_deleted: 0,
                lookups_missed: 0,
            }
        );
    }
}
