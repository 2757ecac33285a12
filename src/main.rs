//! # Main — CLI Entry Point
//!
//! Parses the command line and hands off to [`cli::run`]. Handles the
//! process-level concerns: the global allocator, structured logging to
//! stderr, and the exit-code contract:
//!
//! - `0` — password found, or search exhausted (distinct final lines)
//! - `10` — keystore file unreadable
//! - `20` — wordlist file unreadable
//! - `30` — keystore not a parseable PKCS#12 structure
//! - `100` — usage error
//!
//! clap would normally exit with its own code on bad arguments, so parsing
//! goes through `try_parse` and usage failures are remapped to 100 (help
//! and version output still exit 0).

mod cli;

use clap::Parser;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "p12crack",
    about = "Recover the passphrase of a PKCS#12 (PFX) keystore by dictionary or brute-force search",
    version
)]
struct Cli {
    /// Dictionary attack: wordlist file with one candidate per line
    #[arg(short = 'd', long = "dictionary", value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Brute-force attack over a character-class alphabet
    #[arg(short = 'b', long = "brute-force")]
    brute_force: bool,

    /// Minimum password length for brute force (implies -b)
    #[arg(short = 'm', long = "min-length", value_name = "LEN")]
    min_length: Option<u64>,

    /// Maximum password length for brute force (implies -b)
    #[arg(short = 'M', long = "max-length", value_name = "LEN")]
    max_length: Option<u64>,

    /// Character classes for brute force: a = lowercase, A = uppercase,
    /// n = digits, s = symbols, x = all of them (default)
    #[arg(short = 'c', long = "charset", value_name = "CLASSES")]
    charset: Option<String>,

    /// Number of worker threads (default: number of online CPUs)
    #[arg(short = 't', long = "threads", value_name = "N")]
    threads: Option<usize>,

    /// Verbose mode: print progress and per-worker records
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Number of attempts between progress messages (implies -v)
    #[arg(short = 's', long = "message-interval", value_name = "N")]
    message_interval: Option<u64>,

    /// PKCS#12 (PFX) keystore file to crack
    #[arg(value_name = "PKCS12_FILE")]
    keystore: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and exit 0; everything else is
            // a usage error.
            let code = if err.use_stderr() { 100 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = cli::run(&cli) {
        eprintln!("Error: {err}");
        if matches!(err, cli::CrackError::Usage(_)) {
            use clap::CommandFactory;
            eprintln!("\n{}", Cli::command().render_usage());
        }
        std::process::exit(err.exit_code());
    }
}
