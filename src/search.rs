//! # Search — Worker Loops and First-Hit Termination
//!
//! The two search entry points run one worker per thread of a dedicated
//! rayon pool (`ThreadPool::broadcast` hands every pool thread exactly one
//! worker closure and a stable index). Workers share three read-only
//! things — the MAC oracle, the candidate source, and the termination
//! state — and nothing else.
//!
//! Termination is cooperative: every worker checks the `found` flag at the
//! head of each iteration, the winning worker records its [`Hit`] (first
//! `swap` wins) and returns, and the remaining workers notice the flag
//! within one MAC verification. In-flight candidates on other workers may
//! still complete; no ordering guarantee is given or needed. The flag uses
//! relaxed ordering — the hit value itself is published through the mutex.
//!
//! In dictionary mode workers drain the shared [`Wordlist`] until it is
//! empty; in brute mode each worker walks its own disjoint
//! [`Enumerator`] slice. Either way a worker that drains its source prints
//! the exhausted record and exits; the caller reads the verdict out of the
//! search state after the pool joins.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rayon::ThreadPool;
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::brute::Enumerator;
use crate::progress::{AttemptMeter, Progress};
use crate::wordlist::Wordlist;
use crate::MacOracle;

/// Which engine produced a candidate. Display form is the user-facing
/// mode name used in progress records and the hit banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Dictionary,
    BruteForce,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Dictionary => f.write_str("Dictionary attack"),
            SearchMode::BruteForce => f.write_str("Brute-force attack"),
        }
    }
}

/// A verified password, as reported by the winning worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub mode: SearchMode,
    pub worker_id: usize,
    pub password: Vec<u8>,
}

/// Single-writer-wins termination state shared by all workers of one run.
struct SearchState {
    found: AtomicBool,
    hit: Mutex<Option<Hit>>,
}

impl SearchState {
    fn new() -> Self {
        SearchState {
            found: AtomicBool::new(false),
            hit: Mutex::new(None),
        }
    }

    /// True once any worker has verified a candidate.
    fn cancelled(&self) -> bool {
        self.found.load(Ordering::Relaxed)
    }

    /// Record a hit; only the first writer's value is kept.
    fn record(&self, hit: Hit) {
        if !self.found.swap(true, Ordering::Relaxed) {
            *self.hit.lock().unwrap() = Some(hit);
        }
    }

    fn into_hit(self) -> Option<Hit> {
        self.hit.into_inner().unwrap()
    }
}

/// Stream the wordlist across the pool's workers; every line is tested by
/// exactly one worker. Returns the hit, or `None` on exhaustion.
pub fn dictionary_search(
    pool: &ThreadPool,
    oracle: &dyn MacOracle,
    wordlist: &Wordlist,
    msg_interval: u64,
    progress: &Progress,
) -> Option<Hit> {
    let state = SearchState::new();
    pool.broadcast(|ctx| {
        dictionary_worker(ctx.index(), oracle, wordlist, &state, msg_interval, progress)
    });
    state.into_hit()
}

fn dictionary_worker(
    worker_id: usize,
    oracle: &dyn MacOracle,
    wordlist: &Wordlist,
    state: &SearchState,
    msg_interval: u64,
    progress: &Progress,
) {
    let mut meter = AttemptMeter::new(SearchMode::Dictionary, worker_id, msg_interval, progress);
    while !state.cancelled() {
        let Some(word) = wordlist.next_word() else {
            meter.report_exhausted();
            debug!(worker_id, attempts = meter.count(), "dictionary worker exhausted");
            return;
        };
        meter.bump(&word);
        if oracle.verify(&word) {
            state.record(Hit {
                mode: SearchMode::Dictionary,
                worker_id,
                password: word,
            });
            return;
        }
    }
}

/// Enumerate every word of `min_len..=max_len` over the alphabet across
/// the pool's workers, partitioned by first-character index. Returns the
/// hit, or `None` on exhaustion.
pub fn brute_force_search(
    pool: &ThreadPool,
    oracle: &dyn MacOracle,
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    msg_interval: u64,
    progress: &Progress,
) -> Option<Hit> {
    let state = SearchState::new();
    pool.broadcast(|ctx| {
        brute_worker(
            ctx.index(),
            ctx.num_threads(),
            oracle,
            alphabet,
            min_len,
            max_len,
            &state,
            msg_interval,
            progress,
        )
    });
    state.into_hit()
}

#[allow(clippy::too_many_arguments)]
fn brute_worker(
    worker_id: usize,
    worker_count: usize,
    oracle: &dyn MacOracle,
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    state: &SearchState,
    msg_interval: u64,
    progress: &Progress,
) {
    let mut enumerator =
        Enumerator::new(alphabet.bytes(), worker_id, worker_count, min_len, max_len);
    let mut meter = AttemptMeter::new(SearchMode::BruteForce, worker_id, msg_interval, progress);
    while !state.cancelled() {
        let Some(word) = enumerator.next_word() else {
            meter.report_exhausted();
            debug!(worker_id, attempts = meter.count(), "brute worker exhausted");
            return;
        };
        meter.bump(word);
        if oracle.verify(word) {
            state.record(Hit {
                mode: SearchMode::BruteForce,
                worker_id,
                password: word.to_vec(),
            });
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Oracle that matches one fixed password.
    struct FixedOracle(Vec<u8>);

    impl MacOracle for FixedOracle {
        fn verify(&self, candidate: &[u8]) -> bool {
            candidate == self.0.as_slice()
        }
    }

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn wordlist(lines: &[&str]) -> (tempfile::NamedTempFile, Wordlist) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        let wl = Wordlist::open(file.path()).unwrap();
        (file, wl)
    }

    #[test]
    fn dictionary_search_finds_planted_password() {
        let oracle = FixedOracle(b"secret".to_vec());
        let (_f, wl) = wordlist(&["foo", "bar", "secret", "baz"]);
        let progress = Progress::new();
        let hit = dictionary_search(&pool(2), &oracle, &wl, 0, &progress).unwrap();
        assert_eq!(hit.mode, SearchMode::Dictionary);
        assert_eq!(hit.password, b"secret");
    }

    #[test]
    fn dictionary_search_exhausts_without_hit() {
        let oracle = FixedOracle(b"nope".to_vec());
        let (_f, wl) = wordlist(&["foo", "bar", "baz"]);
        let progress = Progress::new();
        assert!(dictionary_search(&pool(4), &oracle, &wl, 0, &progress).is_none());
        assert_eq!(progress.total(), 3);
    }

    #[test]
    fn brute_force_search_finds_planted_password() {
        let oracle = FixedOracle(b"9".to_vec());
        let alphabet = Alphabet::build("n").unwrap();
        let progress = Progress::new();
        let hit = brute_force_search(&pool(3), &oracle, &alphabet, 1, 1, 0, &progress).unwrap();
        assert_eq!(hit.mode, SearchMode::BruteForce);
        assert_eq!(hit.password, b"9");
        // First-character partitioning: index 9 belongs to worker 9 % 3 == 0.
        assert_eq!(hit.worker_id, 0);
    }

    #[test]
    fn brute_force_search_exhausts_without_hit() {
        let oracle = FixedOracle(b"zzz".to_vec());
        let alphabet = Alphabet::build("n").unwrap();
        let progress = Progress::new();
        assert!(brute_force_search(&pool(2), &oracle, &alphabet, 1, 2, 0, &progress).is_none());
        assert_eq!(progress.total(), 110);
    }

    #[test]
    fn more_workers_than_alphabet_bytes_is_legal() {
        let oracle = FixedOracle(b"7".to_vec());
        let alphabet = Alphabet::build("n").unwrap();
        let progress = Progress::new();
        let hit =
            brute_force_search(&pool(16), &oracle, &alphabet, 1, 1, 0, &progress).unwrap();
        assert_eq!(hit.password, b"7");
    }

    #[test]
    fn only_one_hit_is_recorded() {
        // Every candidate verifies; exactly one hit must survive.
        struct AlwaysYes;
        impl MacOracle for AlwaysYes {
            fn verify(&self, _candidate: &[u8]) -> bool {
                true
            }
        }
        let (_f, wl) = wordlist(&["a", "b", "c", "d", "e", "f"]);
        let progress = Progress::new();
        let hit = dictionary_search(&pool(4), &AlwaysYes, &wl, 0, &progress);
        assert!(hit.is_some());
    }
}
