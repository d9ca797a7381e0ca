//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the `iz_prime` library core. Thin by design:
//! argument parsing and dispatch live here, execution logic lives in
//! [`cli`].
//!
//! ## Subcommands
//!
//! `sieve` generates a prime list below `n` with a chosen algorithm;
//! `next-prime` and `random-prime`/`batch-random-prime` wrap the two
//! arbitrary-precision search entry points; `vx-segment` sieves one
//! segment of an out-of-range search directly; `verify-prime`,
//! `bitmap-inspect`, `gap-list-inspect`, and `prime-list-inspect` are
//! small utilities for poking at values and on-disk artifacts.
//!
//! ## Global Options
//!
//! - `LOG_FORMAT=json` env var: structured JSON logs instead of
//!   human-readable ones.

mod cli;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use anyhow::Result;

#[derive(Parser)]
#[command(name = "izprime", about = "Generate and verify iZ-Framework primes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// The sieve algorithm a `sieve` invocation runs. `Iz`/`Izm` are the
/// iZ-wheel sieves this engine is built around; the rest are the classic
/// reference sieves kept for cross-checking.
#[derive(Copy, Clone, ValueEnum)]
enum SieveAlgo {
    Classic,
    Optimized,
    Segmented,
    Euler,
    Atkin,
    Iz,
    Izm,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every prime up to `n` with the chosen algorithm.
    Sieve {
        /// Upper bound, inclusive.
        n: u64,
        /// Sieve algorithm.
        #[arg(long, value_enum, default_value = "izm")]
        algo: SieveAlgo,
        /// Write the result (with a content hash) to this file instead of
        /// printing it.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Find the nearest prime to `base` in a chosen direction.
    NextPrime {
        /// Base value to search from, as a decimal string.
        base: String,
        /// Search backward (toward smaller values) instead of forward.
        #[arg(long)]
        backward: bool,
    },

    /// Generate a random probable prime of roughly `bit_size` bits.
    RandomPrime {
        /// Approximate bit length of the result.
        bit_size: u32,
        /// Residue id to search: -1 for iZ-, 1 for iZ+.
        #[arg(long, default_value_t = -1)]
        id: i32,
        /// Worker threads to fan the search out across.
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },

    /// Generate `count` random probable primes concurrently.
    BatchRandomPrime {
        /// Approximate bit length of each result.
        bit_size: u32,
        /// How many primes to generate.
        count: usize,
        /// Residue id to search: -1 for iZ-, 1 for iZ+.
        #[arg(long, default_value_t = -1)]
        id: i32,
        /// Worker threads per individual search.
        #[arg(long, default_value_t = 2)]
        workers_per_search: usize,
    },

    /// Sieve a single `vx`-sized segment at index `y`, writing a gap list.
    VxSegment {
        /// Wheel width for this search.
        vx: u64,
        /// Segment index, as a decimal string.
        y: String,
        /// Output path for the gap list.
        #[arg(long)]
        output: PathBuf,
    },

    /// Run Miller-Rabin on a single value.
    VerifyPrime {
        /// Value to test, as a decimal string.
        value: String,
        /// Witness rounds (raised to the engine default if lower).
        #[arg(long, default_value_t = iz_prime::DEFAULT_MR_ROUNDS)]
        rounds: u32,
    },

    /// Print the length and set-bit count of a stored bitmap.
    BitmapInspect { path: PathBuf },

    /// Print the segment index `y` and gap count of a stored gap list.
    GapListInspect { path: PathBuf },

    /// Print the count and last value of a stored prime list.
    PrimeListInspect { path: PathBuf },
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Sieve { n, algo, output } => cli::run_sieve(algo, n, output),
        Commands::NextPrime { base, backward } => cli::run_next_prime(&base, backward),
        Commands::RandomPrime {
            bit_size,
            id,
            workers,
        } => cli::run_random_prime(bit_size, id, workers),
        Commands::BatchRandomPrime {
            bit_size,
            count,
            id,
            workers_per_search,
        } => cli::run_batch_random_prime(bit_size, id, count, workers_per_search),
        Commands::VxSegment { vx, y, output } => cli::run_vx_segment(vx, &y, output),
        Commands::VerifyPrime { value, rounds } => cli::run_verify_prime(&value, rounds),
        Commands::BitmapInspect { path } => cli::run_bitmap_inspect(path),
        Commands::GapListInspect { path } => cli::run_gap_list_inspect(path),
        Commands::PrimeListInspect { path } => cli::run_prime_list_inspect(path),
    }
}
