//! # Classic Sieves — Reference Behavior
//!
//! Five textbook sieves kept around as the cross-check for the iZ-wheel
//! sieves in [`crate::sieve_iz`]: every one of them must produce a
//! [`PrimeList`] that hashes identically to the others for the same `n`.

use crate::bitmap::Bitmap;
use crate::isqrt;
use crate::prime_list::PrimeList;

fn estimate_capacity(n: u64) -> usize {
    if n < 10 {
        return 4;
    }
    // rough prime counting function upper bound, just for Vec sizing
    let n = n as f64;
    (1.3 * n / n.ln()) as usize
}

/// 1-indexed bitmap of `n+1` bits; append `p` and strided-clear from `p*p`
/// whenever `p <= sqrt(n)`.
pub fn eratosthenes_classic(n: u64) -> PrimeList {
    let mut primes = PrimeList::with_capacity(estimate_capacity(n));
    if n < 2 {
        return primes;
    }
    let size = (n + 1) as usize;
    let mut bits = Bitmap::create(size);
    bits.set_all();
    bits.clear_bit(0);
    bits.clear_bit(1);

    let sqrt_n = isqrt(n);
    for p in 2..=n {
        if bits.get_bit(p as usize) {
            primes.push(p);
            if p <= sqrt_n {
                bits.clear_mod_p(p, p * p, size as u64);
            }
        }
    }
    primes
}

/// Same sieve restricted to odd candidates: append 2, then scan odd `p`
/// from 3 with stride `2p`.
pub fn eratosthenes_optimized(n: u64) -> PrimeList {
    let mut primes = PrimeList::with_capacity(estimate_capacity(n));
    if n < 2 {
        return primes;
    }
    primes.push(2);
    if n < 3 {
        return primes;
    }
    let size = (n + 1) as usize;
    let mut bits = Bitmap::create(size);
    bits.set_all();

    let mut p = 3u64;
    while p <= n {
        if bits.get_bit(p as usize) {
            primes.push(p);
            if let Some(start) = p.checked_mul(p) {
                if start <= n {
                    bits.clear_mod_p(2 * p, start, size as u64);
                }
            }
        }
        p += 2;
    }
    primes
}

/// Sieves small primes up to `sqrt(n)` once, then slides a `sqrt(n)`-sized
/// window across `(sqrt(n), n]`, reusing one segment bitmap and starting
/// each small prime's mark at `max(p*p, ceil(low/p)*p)`.
pub fn segmented_eratosthenes(n: u64) -> PrimeList {
    let mut primes = PrimeList::with_capacity(estimate_capacity(n));
    if n < 2 {
        return primes;
    }

    let sqrt_n = isqrt(n);
    let small = eratosthenes_classic(sqrt_n);
    for &p in small.iter() {
        primes.push(p);
    }
    if sqrt_n >= n {
        return primes;
    }

    let seg_len = sqrt_n.max(1);
    let mut low = sqrt_n + 1;
    while low <= n {
        let high = (low + seg_len - 1).min(n);
        let seg_size = (high - low + 1) as usize;
        let mut seg = Bitmap::create(seg_size);
        seg.set_all();

        // Evens are composite (except 2, already emitted and below `low`).
        for i in 0..seg_size {
            if (low + i as u64) % 2 == 0 {
                seg.clear_bit(i);
            }
        }

        for &p in small.iter() {
            if p == 2 {
                continue;
            }
            let from_square = p * p;
            let from_window = low.div_ceil(p) * p;
            let mut start = from_square.max(from_window);
            if start % 2 == 0 {
                start += p; // skip even multiples: p is odd, so this lands odd again
            }
            if start > high {
                continue;
            }
            let mut x = start;
            while x <= high {
                seg.clear_bit((x - low) as usize);
                x += 2 * p;
            }
        }

        for i in 0..seg_size {
            let v = low + i as u64;
            if seg.get_bit(i) {
                primes.push(v);
            }
        }
        low += seg_len;
    }
    primes
}

/// Linear sieve: each composite is crossed exactly once, by its least
/// prime factor.
pub fn euler(n: u64) -> PrimeList {
    let mut primes = PrimeList::with_capacity(estimate_capacity(n));
    if n < 2 {
        return primes;
    }
    let mut is_composite = vec![false; (n + 1) as usize];
    for i in 2..=n {
        if !is_composite[i as usize] {
            primes.push(i);
        }
        for &p in primes.as_slice() {
            if p > n / i {
                break;
            }
            is_composite[(i * p) as usize] = true;
            if i % p == 0 {
                break;
            }
        }
    }
    primes
}

/// Sieve of Atkin: toggle candidates satisfying one of three quadratic
/// forms under residue-mod-12 gates, then clear odd multiples of prime
/// squares; 2 and 3 are prepended since the quadratic forms never flag them.
pub fn atkin(n: u64) -> PrimeList {
    let mut primes = PrimeList::with_capacity(estimate_capacity(n));
    if n < 2 {
        return primes;
    }
    primes.push(2);
    if n >= 3 {
        primes.push(3);
    }
    if n < 5 {
        return primes;
    }

    let mut is_prime = vec![false; (n + 1) as usize];
    let limit = isqrt(n);
    for x in 1..=limit {
        let x2 = x * x;
        for y in 1..=limit {
            let y2 = y * y;

            let n1 = 4 * x2 + y2;
            if n1 <= n && (n1 % 12 == 1 || n1 % 12 == 5) {
                is_prime[n1 as usize] ^= true;
            }

            let n2 = 3 * x2 + y2;
            if n2 <= n && n2 % 12 == 7 {
                is_prime[n2 as usize] ^= true;
            }

            if x > y {
                let n3 = 3 * x2 - y2;
                if n3 <= n && n3 % 12 == 11 {
                    is_prime[n3 as usize] ^= true;
                }
            }
        }
    }

    let mut p = 5u64;
    while p * p <= n {
        if is_prime[p as usize] {
            let p2 = p * p;
            let mut k = p2;
            while k <= n {
                is_prime[k as usize] = false;
                k += 2 * p2;
            }
        }
        p += 1;
    }

    for i in 5..=n {
        if is_prime[i as usize] {
            primes.push(i);
        }
    }
    primes
}
