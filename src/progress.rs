//! # Progress — Attempt Counters and Periodic Records
//!
//! Two layers of accounting. A shared [`Progress`] aggregates the total
//! attempt count across all workers with a lock-free atomic, feeding the
//! end-of-search summary. A per-worker [`AttemptMeter`] owns that worker's
//! private count and prints the user-facing progress records: one line
//! every `interval` attempts, in the tool's classic format
//! (`<mode> - Thread <id> - Attempt <n> (<candidate>)`), plus the
//! exhausted record when the worker drains its source. An interval of 0
//! disables both record kinds.
//!
//! Thread ids are displayed 1-based; internally workers are 0-based.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::display_candidate;
use crate::search::SearchMode;

/// Search-wide attempt total, shared read-mostly across workers.
pub struct Progress {
    tested: AtomicU64,
    start: Instant,
}

impl Progress {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Progress {
            tested: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    pub fn record_attempt(&self) {
        self.tested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.tested.load(Ordering::Relaxed)
    }

    /// Attempts per second since construction.
    pub fn rate(&self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.total() as f64 / secs
        } else {
            0.0
        }
    }
}

/// One worker's attempt counter and progress printer.
pub struct AttemptMeter<'a> {
    mode: SearchMode,
    worker_id: usize,
    interval: u64,
    count: u64,
    shared: &'a Progress,
}

impl<'a> AttemptMeter<'a> {
    pub fn new(mode: SearchMode, worker_id: usize, interval: u64, shared: &'a Progress) -> Self {
        AttemptMeter {
            mode,
            worker_id,
            interval,
            count: 0,
            shared,
        }
    }

    /// Count one attempt and print a progress record on the interval.
    pub fn bump(&mut self, candidate: &[u8]) {
        self.count += 1;
        self.shared.record_attempt();
        if self.interval > 0 && self.count % self.interval == 0 {
            println!(
                "{} - Thread {} - Attempt {} ({})",
                self.mode,
                self.worker_id + 1,
                self.count,
                display_candidate(candidate)
            );
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Print the per-worker exhaustion record (suppressed when interval is 0).
    pub fn report_exhausted(&self) {
        if self.interval > 0 {
            println!(
                "{} - Thread {} - Exhausted search ({} attempts)",
                self.mode,
                self.worker_id + 1,
                self.count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn totals_start_at_zero() {
        let p = Progress::new();
        assert_eq!(p.total(), 0);
    }

    #[test]
    fn meter_counts_and_feeds_shared_total() {
        let p = Progress::new();
        let mut meter = AttemptMeter::new(SearchMode::Dictionary, 0, 0, &p);
        for _ in 0..5 {
            meter.bump(b"x");
        }
        assert_eq!(meter.count(), 5);
        assert_eq!(p.total(), 5);
    }

    #[test]
    fn two_meters_share_one_total() {
        let p = Progress::new();
        let mut a = AttemptMeter::new(SearchMode::BruteForce, 0, 0, &p);
        let mut b = AttemptMeter::new(SearchMode::BruteForce, 1, 0, &p);
        a.bump(b"x");
        a.bump(b"y");
        b.bump(b"z");
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 1);
        assert_eq!(p.total(), 3);
    }

    #[test]
    fn concurrent_attempts_are_counted_exactly() {
        let p = Arc::new(Progress::new());
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let p = Arc::clone(&p);
                scope.spawn(move || {
                    for _ in 0..1000 {
                        p.record_attempt();
                    }
                });
            }
        });
        assert_eq!(p.total(), 8000);
    }

    #[test]
    fn zero_interval_prints_nothing_but_still_counts() {
        let p = Progress::new();
        let mut meter = AttemptMeter::new(SearchMode::Dictionary, 3, 0, &p);
        meter.bump(b"q");
        meter.report_exhausted();
        assert_eq!(meter.count(), 1);
    }
}
