use std::sync::atomic::{AtomicU64, Ordering};

use checkin_domain::ResolutionOutcome;

#[derive(Debug, Default)]
pub struct Metrics {
    scans_received: AtomicU64,
    scans_suppressed: AtomicU64,
    scans_deferred: AtomicU64,
    checkins_new: AtomicU64,
    checkins_duplicate: AtomicU64,
    checkins_invalid: AtomicU64,
    cache_write_errors: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self) {
        self.scans_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self) {
        self.scans_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deferred(&self) {
        self.scans_deferred.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: &ResolutionOutcome) {
        let counter = match outcome {
            ResolutionOutcome::New { .. } => &self.checkins_new,
            ResolutionOutcome::Duplicate { .. } => &self.checkins_duplicate,
            ResolutionOutcome::Invalid { .. } => &self.checkins_invalid,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_write_error(&self) {
        self.cache_write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn checkins_new(&self) -> u64 {
        self.checkins_new.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let received = self.scans_received.load(Ordering::Relaxed);
        let suppressed = self.scans_suppressed.load(Ordering::Relaxed);
        let deferred = self.scans_deferred.load(Ordering::Relaxed);
        let new = self.checkins_new.load(Ordering::Relaxed);
        let duplicate = self.checkins_duplicate.load(Ordering::Relaxed);
        let invalid = self.checkins_invalid.load(Ordering::Relaxed);
        let cache_errors = self.cache_write_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE checkin_scans_received_total counter\n\
checkin_scans_received_total {}\n\
# TYPE checkin_scans_suppressed_total counter\n\
checkin_scans_suppressed_total {}\n\
# TYPE checkin_scans_deferred_total counter\n\
checkin_scans_deferred_total {}\n\
# TYPE checkin_outcomes_total counter\n\
checkin_outcomes_total{{outcome=\"new\"}} {}\n\
checkin_outcomes_total{{outcome=\"duplicate\"}} {}\n\
checkin_outcomes_total{{outcome=\"invalid\"}} {}\n\
# TYPE checkin_cache_write_errors_total counter\n\
checkin_cache_write_errors_total {}\n",
            received, suppressed, deferred, new, duplicate, invalid, cache_errors
        )
    }
}
