//! # CLI Execution
//!
//! Extracted from `main.rs` to keep the entry point slim. Resolves the raw
//! clap arguments into a validated [`Config`], then runs the search as the
//! coordinator: crypto init, keystore construction (strictly before any
//! worker thread exists), one rayon pool shared by both engines,
//! dictionary-then-brute sequencing, and the terminal verdict.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

use thiserror::Error;
use tracing::info;

use p12crack::alphabet::Alphabet;
use p12crack::keystore::{Keystore, KeystoreError};
use p12crack::progress::Progress;
use p12crack::search::{self, Hit};
use p12crack::wordlist::{Wordlist, WordlistError};
use p12crack::{
    display_candidate, DEFAULT_MAX_WORDLENGTH, DEFAULT_MSG_INTERVAL, MAX_WORDLENGTH,
    MIN_WORDLENGTH,
};

use super::Cli;

/// Fatal errors with their fixed exit codes.
#[derive(Debug, Error)]
pub enum CrackError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Keystore(#[from] KeystoreError),
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CrackError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CrackError::Usage(_) => 100,
            CrackError::Keystore(KeystoreError::NotFound { .. }) => 10,
            CrackError::Keystore(KeystoreError::Unparseable { .. }) => 30,
            CrackError::Wordlist(_) => 20,
            CrackError::Internal(_) => 1,
        }
    }
}

fn usage(message: impl Into<String>) -> CrackError {
    CrackError::Usage(message.into())
}

/// Brute-force engine parameters, fully resolved.
#[derive(Debug)]
struct BrutePlan {
    alphabet: Alphabet,
    min_len: usize,
    max_len: usize,
}

/// A validated run configuration.
#[derive(Debug)]
struct Config {
    keystore: PathBuf,
    dictionary: Option<PathBuf>,
    brute: Option<BrutePlan>,
    threads: usize,
    threads_explicit: bool,
    verbose: bool,
    msg_interval: u64,
}

/// Validate and normalize the raw arguments.
///
/// `-m`/`-M` imply `-b`; `-s` implies `-v` (but `-s 0` still silences the
/// per-attempt records); `-c` without any brute flag is an error; at least
/// one attack mode is required.
fn resolve(cli: &Cli) -> Result<Config, CrackError> {
    let brute_requested =
        cli.brute_force || cli.min_length.is_some() || cli.max_length.is_some();

    if !brute_requested && cli.dictionary.is_none() {
        return Err(usage(
            "no attack mode selected: specify -d <wordlist> and/or -b",
        ));
    }
    if cli.charset.is_some() && !brute_requested {
        return Err(usage(
            "-c requires a brute-force mode flag (-b, -m or -M)",
        ));
    }

    let brute = if brute_requested {
        let selector = cli.charset.as_deref().unwrap_or("x");
        let alphabet = Alphabet::build(selector).map_err(|err| usage(err.to_string()))?;
        let (min_len, max_len) = resolve_lengths(cli.min_length, cli.max_length)?;
        Some(BrutePlan {
            alphabet,
            min_len,
            max_len,
        })
    } else {
        None
    };

    let threads = match cli.threads {
        Some(0) => return Err(usage("thread count must be at least 1")),
        Some(n) => n,
        None => thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
    };

    let verbose = cli.verbose || cli.message_interval.is_some();
    let msg_interval = match cli.message_interval {
        Some(n) => n,
        None if verbose => DEFAULT_MSG_INTERVAL,
        None => 0,
    };

    Ok(Config {
        keystore: cli.keystore.clone(),
        dictionary: cli.dictionary.clone(),
        brute,
        threads,
        threads_explicit: cli.threads.is_some(),
        verbose,
        msg_interval,
    })
}

/// Resolve the brute-force length bounds.
///
/// When only one bound is given the other defaults to equal it; both are
/// clamped into `[MIN_WORDLENGTH, MAX_WORDLENGTH]`. An explicit pair with
/// min > max is a usage error.
fn resolve_lengths(
    min: Option<u64>,
    max: Option<u64>,
) -> Result<(usize, usize), CrackError> {
    let clamp =
        |len: u64| len.clamp(MIN_WORDLENGTH as u64, MAX_WORDLENGTH as u64) as usize;
    match (min, max) {
        (None, None) => Ok((MIN_WORDLENGTH, DEFAULT_MAX_WORDLENGTH)),
        (Some(only), None) | (None, Some(only)) => Ok((clamp(only), clamp(only))),
        (Some(lo), Some(hi)) => {
            let (lo, hi) = (clamp(lo), clamp(hi));
            if lo > hi {
                return Err(usage(format!(
                    "minimum length {lo} exceeds maximum length {hi}"
                )));
            }
            Ok((lo, hi))
        }
    }
}

/// The coordinator: construct the oracle, spawn the workers, sequence the
/// engines, print the verdict.
pub fn run(cli: &Cli) -> Result<(), CrackError> {
    let config = resolve(cli)?;

    // Per-process crypto init must happen before any worker thread exists.
    openssl::init();
    let keystore = Keystore::open(&config.keystore)?;
    info!(
        keystore = %config.keystore.display(),
        threads = config.threads,
        "keystore loaded"
    );

    if config.verbose {
        if config.threads_explicit {
            println!("\nStarting {} threads\n", config.threads);
        } else {
            println!(
                "\nStarting {} threads (default value = number of CPUs)\n",
                config.threads
            );
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|id| format!("worker-{id}"))
        .build()
        .map_err(|err| CrackError::Internal(anyhow::Error::new(err)))?;
    let progress = Progress::new();

    if let Some(dict_path) = &config.dictionary {
        let wordlist = Wordlist::open(dict_path)?;
        info!(wordlist = %dict_path.display(), "dictionary attack starting");
        if let Some(hit) =
            search::dictionary_search(&pool, &keystore, &wordlist, config.msg_interval, &progress)
        {
            report_hit(&hit);
            return Ok(());
        }
    }

    if let Some(plan) = &config.brute {
        info!(
            alphabet = plan.alphabet.len(),
            min_len = plan.min_len,
            max_len = plan.max_len,
            "brute-force attack starting"
        );
        if let Some(hit) = search::brute_force_search(
            &pool,
            &keystore,
            &plan.alphabet,
            plan.min_len,
            plan.max_len,
            config.msg_interval,
            &progress,
        ) {
            report_hit(&hit);
            return Ok(());
        }
    }

    info!(
        tested = progress.total(),
        rate = progress.rate(),
        "search exhausted"
    );
    println!("\nNo password found");
    Ok(())
}

fn report_hit(hit: &Hit) {
    println!("\n********************************************");
    println!(
        "{} - Thread {} - Password found: {}",
        hit.mode,
        hit.worker_id + 1,
        display_candidate(&hit.password)
    );
    println!("********************************************");
}
