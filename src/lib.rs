//! # p12crack — Core Library
//!
//! Recovers the passphrase of a PKCS#12 (PFX) keystore by exhaustively
//! testing candidate passwords against the keystore's integrity MAC. The
//! MAC check dominates runtime (a PBKDF-style key derivation plus an HMAC
//! per candidate), so everything around it is built to keep worker threads
//! saturated with candidates at near-zero coordination cost.
//!
//! ## Module Organization
//!
//! **Candidate generation**:
//! - [`alphabet`] — character-class selector → ordered byte alphabet
//! - [`wordlist`] — shared, mutex-serialized line reader over a dictionary
//! - [`brute`] — per-worker odometer enumeration of fixed-length words
//!
//! **Verification and coordination**:
//! - [`keystore`] — the parsed PKCS#12 structure and its MAC oracle
//! - [`search`] — worker loops, first-hit termination, search entry points
//! - [`progress`] — attempt counters and periodic progress records
//!
//! ## Design Philosophy
//!
//! Both engines follow the same pipeline: **generate → verify → first hit
//! wins**. The keystore is parsed exactly once and shared read-only across
//! all workers; the dictionary engine serializes only the line read, and
//! the brute engine needs no coordination at all (workers own disjoint
//! slices of the word space, partitioned by first-character index). The
//! [`MacOracle`] trait is the seam between generation and verification so
//! the search loops can be exercised against a recording oracle in tests.

pub mod alphabet;
pub mod brute;
pub mod keystore;
pub mod progress;
pub mod search;
pub mod wordlist;

use std::borrow::Cow;

/// Shortest candidate length the brute-force engine will enumerate.
pub const MIN_WORDLENGTH: usize = 1;

/// Longest candidate the tool will ever test. Dictionary lines are
/// truncated here; `-M` is clamped here.
pub const MAX_WORDLENGTH: usize = 2048;

/// Default upper length bound for brute-force search when `-M` is absent.
pub const DEFAULT_MAX_WORDLENGTH: usize = 8;

/// Default number of attempts between progress records in verbose mode.
pub const DEFAULT_MSG_INTERVAL: u64 = 100_000;

/// The password-verification capability backed by the parsed keystore.
///
/// `verify` must be callable concurrently from many threads on the same
/// instance and is total over byte inputs: a wrong password is `false`,
/// never an error. The empty candidate is legal.
pub trait MacOracle: Sync {
    fn verify(&self, candidate: &[u8]) -> bool;
}

/// Render a candidate for terminal output. Candidates are opaque bytes;
/// anything that is not valid UTF-8 is shown lossily.
pub fn display_candidate(candidate: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(candidate)
}
