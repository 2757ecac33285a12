//! # Wordlist — Shared, Serialized Dictionary Source
//!
//! A single buffered reader over the wordlist file, shared by all workers
//! behind a mutex. Each [`Wordlist::next_word`] call performs exactly one
//! line read plus terminator trimming inside the critical section; since a
//! MAC verification costs milliseconds and a buffered line read costs
//! microseconds, contention on the lock is unmeasurable and the design
//! buys an easy guarantee that every line is delivered to exactly one
//! worker. Workers self-balance: whichever thread finishes its candidate
//! first draws the next line.
//!
//! Lines keep their bytes as-is after stripping a trailing `\n` and then a
//! trailing `\r`, so `\n` and `\r\n` wordlists behave identically. Empty
//! lines are real candidates (the empty passphrase is legal). Payloads are
//! truncated at [`MAX_WORDLENGTH`], and the read itself is bounded: at most
//! `MAX_WORDLENGTH + 1` payload bytes are ever buffered, while the rest of
//! an overlong line is drained chunk-by-chunk to the next terminator — a
//! pathological multi-gigabyte line costs no more memory than a normal one.
//! End-of-file and mid-stream read errors are both terminal.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use crate::MAX_WORDLENGTH;

#[derive(Debug, Error)]
#[error("Dictionary file not found: {path}")]
pub struct WordlistError {
    pub path: String,
    #[source]
    source: io::Error,
}

/// Line-buffered reader over the wordlist, serialized by a mutex.
#[derive(Debug)]
pub struct Wordlist {
    reader: Mutex<BufReader<File>>,
}

impl Wordlist {
    pub fn open(path: &Path) -> Result<Self, WordlistError> {
        let file = File::open(path).map_err(|source| WordlistError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Wordlist {
            reader: Mutex::new(BufReader::new(file)),
        })
    }

    /// Draw the next candidate, or `None` once the file is exhausted.
    ///
    /// Terminator stripping: the `\n` is never stored, and a trailing `\r`
    /// is removed afterwards. The payload buffer is capped one byte past
    /// [`MAX_WORDLENGTH`] — enough to tell a genuine trailing `\r` at the
    /// boundary from truncated payload — and overlong lines are consumed
    /// without being retained. A read error mid-file is logged and treated
    /// as exhaustion; there is no partial-result mode worth resuming into.
    pub fn next_word(&self) -> Option<Vec<u8>> {
        const CAP: usize = MAX_WORDLENGTH + 1;
        let mut reader = self.reader.lock().unwrap();
        let mut line = Vec::with_capacity(64);
        let mut saw_input = false;
        loop {
            let (consumed, reached_newline) = {
                let chunk = match reader.fill_buf() {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        warn!(error = %err, "wordlist read failed, treating as end of file");
                        return None;
                    }
                };
                if chunk.is_empty() {
                    if saw_input {
                        break;
                    }
                    return None;
                }
                saw_input = true;
                let room = CAP - line.len();
                match chunk.iter().position(|&b| b == b'\n') {
                    Some(newline) => {
                        line.extend_from_slice(&chunk[..newline.min(room)]);
                        (newline + 1, true)
                    }
                    None => {
                        line.extend_from_slice(&chunk[..chunk.len().min(room)]);
                        (chunk.len(), false)
                    }
                }
            };
            reader.consume(consumed);
            if reached_newline {
                break;
            }
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        line.truncate(MAX_WORDLENGTH);
        Some(line)
    }
}
