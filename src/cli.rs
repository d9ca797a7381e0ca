//! # CLI — Subcommand Execution
//!
//! The glue between [`Cli`]/[`Commands`] (defined in `main.rs`) and the
//! library core: each `run_*` function parses its arguments into the types
//! the core expects, calls into `iz_prime`, and prints or writes the result.
//! Nothing here is part of the core's test surface.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use rug::Integer;
use tracing::info;

use iz_prime::bitmap::Bitmap;
use iz_prime::gap_list::GapList;
use iz_prime::next_prime::next_prime;
use iz_prime::prime_list::PrimeList;
use iz_prime::random_prime::random_iz_prime;
use iz_prime::sieve_classic::atkin;
use iz_prime::sieve_iz::{sieve_iz, sieve_izm};
use iz_prime::sieve_vx::{sieve_vx, VxAssets, VxObj};
use iz_prime::{is_probable_prime, DEFAULT_MR_ROUNDS};

use crate::SieveAlgo;

pub fn run_sieve(algo: SieveAlgo, n: u64, output: Option<PathBuf>) -> Result<()> {
    use iz_prime::sieve_classic::{
        eratosthenes_classic, eratosthenes_optimized, euler, segmented_eratosthenes,
    };

    let mut primes = match algo {
        SieveAlgo::Classic => eratosthenes_classic(n),
        SieveAlgo::Optimized => eratosthenes_optimized(n),
        SieveAlgo::Segmented => segmented_eratosthenes(n),
        SieveAlgo::Euler => euler(n),
        SieveAlgo::Atkin => atkin(n),
        SieveAlgo::Iz => sieve_iz(n).context("sieve_iz failed")?,
        SieveAlgo::Izm => sieve_izm(n).context("sieve_izm failed")?,
    };

    info!(count = primes.count(), n, "sieve complete");
    if let Some(path) = output {
        primes.compute_hash();
        primes.write_file(&path).context("writing prime list")?;
        info!(path = %path.display(), "wrote prime list");
    } else {
        println!("{:?}", primes.as_slice());
    }
    Ok(())
}

pub fn run_next_prime(base: &str, backward: bool) -> Result<()> {
    let base: Integer = Integer::parse(base)
        .with_context(|| format!("invalid base integer: {base}"))?
        .into();
    match next_prime(&base, !backward) {
        Some(p) => {
            println!("{p}");
            Ok(())
        }
        None => bail!("no prime found within the search window"),
    }
}

pub fn run_random_prime(bit_size: u32, id: i32, workers: usize) -> Result<()> {
    if id != -1 && id != 1 {
        bail!("--id must be -1 or 1");
    }
    match random_iz_prime(id, bit_size, workers) {
        Some(p) => {
            println!("{p}");
            Ok(())
        }
        None => bail!("no prime found within the attempt budget"),
    }
}

/// Generates `count` random primes concurrently with `rayon`, each search
/// internally using `workers_per_search` threads. A CLI-only convenience —
/// the library core itself stays thread-based, not rayon-based.
pub fn run_batch_random_prime(
    bit_size: u32,
    id: i32,
    count: usize,
    workers_per_search: usize,
) -> Result<()> {
    if id != -1 && id != 1 {
        bail!("--id must be -1 or 1");
    }
    let results: Vec<Option<Integer>> = (0..count)
        .into_par_iter()
        .map(|_| random_iz_prime(id, bit_size, workers_per_search))
        .collect();

    let mut found = 0usize;
    for r in results {
        match r {
            Some(p) => {
                found += 1;
                println!("{p}");
            }
            None => info!("one search in the batch exhausted its attempt budget"),
        }
    }
    info!(found, requested = count, "batch complete");
    Ok(())
}

pub fn run_vx_segment(vx: u64, y: &str, output: PathBuf) -> Result<()> {
    let y: Integer = Integer::parse(y)
        .with_context(|| format!("invalid segment index: {y}"))?
        .into();
    let assets = VxAssets::new(vx).context("building vx assets")?;
    let mut obj = VxObj::new(vx, y.clone());
    sieve_vx(&mut obj, &assets).context("sieving segment")?;
    info!(
        bit_ops = obj.bit_ops(),
        p_test_ops = obj.p_test_ops(),
        count = obj.gaps.count(),
        "segment sieved"
    );
    let mut gaps = obj.gaps;
    gaps.compute_hash();
    gaps.write_file(&output, &y).context("writing gap list")?;
    info!(path = %output.display(), "wrote gap list");
    Ok(())
}

pub fn run_verify_prime(value: &str, rounds: u32) -> Result<()> {
    let n: Integer = Integer::parse(value)
        .with_context(|| format!("invalid integer: {value}"))?
        .into();
    let ok = is_probable_prime(&n, rounds.max(DEFAULT_MR_ROUNDS));
    println!("{ok}");
    Ok(())
}

pub fn run_bitmap_inspect(path: PathBuf) -> Result<()> {
    let bitmap = Bitmap::read_file(&path).context("reading bitmap")?;
    let popcount = (0..bitmap.len()).filter(|&i| bitmap.get_bit(i)).count();
    println!("len={} popcount={popcount}", bitmap.len());
    Ok(())
}

pub fn run_gap_list_inspect(path: PathBuf) -> Result<()> {
    let (gaps, y) = GapList::read_file(&path).context("reading gap list")?;
    println!("y={y} count={}", gaps.count());
    Ok(())
}

pub fn run_prime_list_inspect(path: PathBuf) -> Result<()> {
    let primes = PrimeList::read_file(&path).context("reading prime list")?;
    println!(
        "count={} last={}",
        primes.count(),
        primes.last().map(|p| p.to_string()).unwrap_or_default()
    );
    Ok(())
}
