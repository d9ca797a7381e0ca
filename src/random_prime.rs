//! # iZ-Random-Prime — Vertical Random Search
//!
//! Draws a uniformly random column inside a bit-sized `vx`, locks it onto a
//! coordinate coprime to every prime dividing `vx`, then steps by `vx`
//! (i.e. by `y`) testing each candidate with Miller–Rabin until one
//! survives or the attempt budget is exhausted. [`random_iz_prime`] fans
//! this out across worker threads with first-wins cancellation, the
//! thread-based substitute for the original's process fork.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use rand::rngs::OsRng;
use rand::RngCore;
use rug::rand::RandState;
use rug::Integer;

use crate::iz::{compute_max_vx_big, ResidueId};
use crate::next_prime::next_prime;
use crate::sieve_iz::sieve_iz;
use crate::{is_probable_prime, DEFAULT_MR_ROUNDS};

const ATTEMPTS_LIMIT: u64 = 1_000_000;
/// Upper bound on the primes needed to build a `vx` wide enough for any
/// bit size this crate supports generating primes at (a few thousand bits).
const ROOT_PRIME_BOUND: u64 = 20_000;

fn seeded_rand_state() -> RandState<'static> {
    let mut seed_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut seed_bytes);
    let seed = Integer::from_digits(&seed_bytes, rug::integer::Order::Msf);
    let mut state = RandState::new();
    state.seed(&seed);
    state
}

/// The deterministic search routine at the heart of random-prime
/// generation: lock onto a random column coprime to `vx`, then walk `y`
/// testing `6·(x + vx·y) + p_id` until a probable prime turns up or
/// `cancel` is set by a sibling worker.
fn search_iz_prime(p_id: ResidueId, vx: &Integer, cancel: &AtomicBool) -> Option<Integer> {
    let mut state = seeded_rand_state();
    let r = Integer::from(vx.random_below_ref(&mut state));
    let mut t = Integer::from(&r * 6) + p_id;

    loop {
        t += 6;
        let g = Integer::from(t.gcd_ref(vx));
        if g == 1 {
            break;
        }
    }

    for _ in 0..ATTEMPTS_LIMIT {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        t += vx;
        if is_probable_prime(&t, DEFAULT_MR_ROUNDS) {
            return Some(t);
        }
    }
    None
}

/// Generates a probable prime of approximately `bit_size` bits, of the
/// given residue id, fanning the search out across `worker_count` threads.
/// `worker_count < 2` runs the search in-process.
pub fn random_iz_prime(p_id: ResidueId, bit_size: u32, worker_count: usize) -> Option<Integer> {
    let bit_size = bit_size.max(10);
    let worker_count = worker_count.clamp(1, 16);

    let root_primes = sieve_iz(ROOT_PRIME_BOUND).expect("ROOT_PRIME_BOUND is well above MIN_N");
    let vx = compute_max_vx_big(bit_size, root_primes.as_slice());

    let cancel = Arc::new(AtomicBool::new(false));
    if worker_count < 2 {
        return search_iz_prime(p_id, &vx, &cancel);
    }

    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let vx = vx.clone();
        let cancel = Arc::clone(&cancel);
        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            if let Some(p) = search_iz_prime(p_id, &vx, &cancel) {
                let _ = tx.send(p);
            }
        }));
    }
    drop(tx);

    let result = rx.recv().ok();
    cancel.store(true, Ordering::Relaxed);
    for handle in handles {
        let _ = handle.join();
    }
    result
}

/// Draws a uniformly random base of `bit_size` bits and hands it to the
/// forward next-prime search. A cheaper alternative entry point to
/// [`random_iz_prime`] that reuses [`next_prime`] instead of re-deriving a
/// wheel search from scratch.
pub fn random_next_prime(bit_size: u32) -> Option<Integer> {
    let bit_size = bit_size.max(10);
    let mut state = seeded_rand_state();
    let base = Integer::from(Integer::random_bits(bit_size, &mut state));
    next_prime(&base, true)
}
