/// Bytes-received accounting for the current load.
///
/// Reset at the start of each load; the expected total is only known when the
/// response carried a `Content-Length` header.
pub(super) struct ProgressTracker {
    /// Number of bytes received so far.
    loaded: u64,

    /// Total number of bytes expected, when known.
    total: Option<u64>,
}

impl ProgressTracker {
    pub(super) fn new() -> Self {
        Self {
            loaded: 0,
            total: None,
        }
    }

    /// Forget everything accounted so far. To call when a new load begins.
    pub(super) fn reset(&mut self) {
        self.loaded = 0;
        self.total = None;
    }

    /// Communicate the expected total, as parsed from a `Content-Length`
    /// header. `None` leaves the length indeterminate.
    pub(super) fn set_total(&mut self, total: Option<u64>) {
        self.total = total;
    }

    /// Returns `true` once at least one byte of the current load was
    /// accounted for. Playback of an incremental load starts when the first
    /// chunk arrives.
    pub(super) fn has_received_bytes(&self) -> bool {
        self.loaded > 0
    }

    /// Account for a newly received chunk and return a snapshot suitable for
    /// a progress announcement.
    pub(super) fn record(&mut self, len: u64) -> ProgressSnapshot {
        self.loaded += len;
        ProgressSnapshot {
            loaded: self.loaded,
            total: self.total,
        }
    }
}

/// State of the progress accounting at the time a chunk was received.
pub(super) struct ProgressSnapshot {
    loaded: u64,
    total: Option<u64>,
}

impl ProgressSnapshot {
    pub(super) fn loaded_for_js(&self) -> f64 {
        self.loaded as f64
    }

    /// Total to announce. `0.` when the length is indeterminate, in which
    /// case `length_computable` returns `false`.
    pub(super) fn total_for_js(&self) -> f64 {
        self.total.map(|t| t as f64).unwrap_or(0.)
    }

    pub(super) fn length_computable(&self) -> bool {
        self.total.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates_in_order() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(Some(100));
        let s = tracker.record(30);
        assert_eq!(s.loaded_for_js(), 30.);
        assert_eq!(s.total_for_js(), 100.);
        assert!(s.length_computable());
        let s = tracker.record(70);
        assert_eq!(s.loaded_for_js(), 100.);
    }

    #[test]
    fn test_indeterminate_without_total() {
        let mut tracker = ProgressTracker::new();
        let s = tracker.record(512);
        assert_eq!(s.loaded_for_js(), 512.);
        assert_eq!(s.total_for_js(), 0.);
        assert!(!s.length_computable());
    }

    #[test]
    fn test_first_chunk_detection() {
        let mut tracker = ProgressTracker::new();
        assert!(!tracker.has_received_bytes());
        tracker.record(1);
        assert!(tracker.has_received_bytes());
        tracker.record(100);
        assert!(tracker.has_received_bytes());
        tracker.reset();
        assert!(!tracker.has_received_bytes(), "a new load has its own first chunk");
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(Some(10));
        tracker.record(10);
        tracker.reset();
        let s = tracker.record(4);
        assert_eq!(s.loaded_for_js(), 4.);
        assert!(!s.length_computable());
    }
}
