//! # iZ Arithmetic
//!
//! The arithmetic underlying every other component: `iZ(x, i) = 6x + i`
//! and its inverse, `solve_for_x`/`solve_for_y`, which locate a prime's
//! composite marks inside an arbitrary segment of the wheel.

use rug::Integer;

use crate::error::{EngineError, Result};

/// Residue id: `-1` for the `6x-1` coset (iZ−), `+1` for `6x+1` (iZ+).
pub type ResidueId = i32;

/// `6x + i`. Pre: `x >= 1`, `i ∈ {-1, 1}`.
#[inline]
pub fn iz(x: u64, i: ResidueId) -> u64 {
    debug_assert!(i == -1 || i == 1);
    debug_assert!(x > 0);
    if i > 0 {
        6 * x + 1
    } else {
        6 * x - 1
    }
}

/// Arbitrary-precision form of [`iz`].
pub fn iz_big(x: &Integer, i: ResidueId) -> Integer {
    debug_assert!(i == -1 || i == 1);
    debug_assert!(*x > 0);
    Integer::from(x * 6) + i
}

/// `x` such that `6x ± 1 == p`. Well-defined for every `p` coprime to 6.
#[inline]
pub fn x_of_prime(p: u64) -> u64 {
    (p + 1) / 6
}

/// `+1` if `p ≡ 1 (mod 6)`, else `-1`.
#[inline]
pub fn residue_of_prime(p: u64) -> ResidueId {
    if p % 6 == 1 {
        1
    } else {
        -1
    }
}

/// Least `x >= 1` such that `6*(x + vx*y) + target_id ≡ 0 (mod p)`: the
/// first composite mark of `p` within the segment indexed by `y`. Returned
/// `x` lies in `[1, p]`.
pub fn solve_for_x(target_id: ResidueId, p: u64, vx: u64, y: u64) -> u64 {
    let x_p = normalized_x_p(target_id, p);
    // Computed in i128 to avoid the wraparound the original relies on in C;
    // the result is identical modulo p either way.
    let yvx = vx as i128 * y as i128;
    let rem = (yvx - x_p as i128).rem_euclid(p as i128);
    p - rem as u64
}

/// Same as [`solve_for_x`] but with an arbitrary-precision `y`.
pub fn solve_for_x_big(target_id: ResidueId, p: u64, vx: u64, y: &Integer) -> u64 {
    let x_p = normalized_x_p(target_id, p);
    let yvx = Integer::from(vx) * y;
    let mut rem = Integer::from(yvx - x_p);
    rem = rem.rem_euc(p);
    p - rem.to_u64().expect("remainder mod p fits in u64")
}

/// Inverse of [`solve_for_x`]: least `y >= 0` such that the same congruence
/// holds for the given `x`. Undefined when `gcd(vx, p) != 1`.
pub fn solve_for_y(target_id: ResidueId, p: u64, vx: u64, x: u64) -> Result<u64> {
    if vx % p == 0 {
        return Err(EngineError::ModularInverseUndefined { a: vx, m: p });
    }
    let x_p = normalized_x_p(target_id, p);
    if x % p == x_p % p {
        return Ok(0);
    }
    let delta = (x_p as i64 - x as i64).rem_euclid(p as i64) as u64;
    let vx_inv = modular_inverse(vx % p, p)?;
    Ok((delta as u128 * vx_inv as u128 % p as u128) as u64)
}

fn normalized_x_p(target_id: ResidueId, p: u64) -> u64 {
    let x_p = x_of_prime(p);
    let p_id = residue_of_prime(p);
    if target_id == p_id {
        x_p
    } else {
        p - x_p
    }
}

/// Extended Euclidean algorithm. Undefined (returns
/// [`EngineError::ModularInverseUndefined`]) when `gcd(a, m) != 1`.
pub fn modular_inverse(a: u64, m: u64) -> Result<u64> {
    if m == 1 {
        return Ok(0);
    }
    let (mut old_r, mut r) = (a as i64, m as i64);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return Err(EngineError::ModularInverseUndefined { a, m });
    }
    let m_i = m as i64;
    let inv = ((old_s % m_i) + m_i) % m_i;
    Ok(inv as u64)
}

/// Multiplies primes `5, 7, 11, ...` until either the next multiplication
/// would exceed `x_n / 2` or `limit` primes have been consumed. Minimum
/// result 35 (`5 * 7`).
pub fn compute_limited_vx(x_n: u64, limit: usize) -> u64 {
    const SMALL_PRIMES: [u64; 13] = [5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
    let mut vx = 35u64;
    let mut i = 2usize; // skip 5, 7 already folded into the seed
    while i < limit && i < SMALL_PRIMES.len() {
        let p = SMALL_PRIMES[i];
        if vx.checked_mul(p).map(|v| v < x_n / 2) != Some(true) {
            break;
        }
        vx *= p;
        i += 1;
    }
    vx
}

/// Multiplies primes `5, 7, 11, ...` until the running product's bit length
/// reaches `bit_size`, then divides out the last factor so the result is
/// strictly less than `2^bit_size`.
pub fn compute_max_vx_big(bit_size: u32, root_primes: &[u64]) -> Integer {
    let mut iter = root_primes.iter().filter(|&&p| p > 3);
    let mut vx = Integer::from(*iter.next().expect("at least one prime > 3 in root_primes"));
    let mut last = vx.clone();
    while vx.significant_bits() < bit_size {
        let p = *iter
            .next()
            .expect("root_primes exhausted before reaching requested bit_size");
        last = Integer::from(p);
        vx *= p;
    }
    vx / last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iz_matches_definition() {
        assert_eq!(iz(1, -1), 5);
        assert_eq!(iz(1, 1), 7);
        assert_eq!(iz(2, -1), 11);
        assert_eq!(iz(2, 1), 13);
    }

    #[test]
    fn solve_for_x_matches_spec_scenario() {
        // spec.md §8: solve_for_x(-1, p=11, vx=35, y=0) == 2
        assert_eq!(solve_for_x(-1, 11, 35, 0), 2);
    }

    #[test]
    fn solve_for_x_returns_in_range() {
        for p in [5u64, 7, 11, 13, 17, 19, 23] {
            for y in 0..5u64 {
                for id in [-1, 1] {
                    let x = solve_for_x(id, p, 35, y);
                    assert!((1..=p).contains(&x), "p={p} y={y} id={id} x={x}");
                    let lhs = (6 * (x + 35 * y)) as i64 + id as i64;
                    assert_eq!(lhs.rem_euclid(p as i64), 0, "p={p} y={y} id={id} x={x}");
                }
            }
        }
    }

    #[test]
    fn solve_for_x_big_agrees_with_solve_for_x() {
        for p in [13u64, 17, 23, 29] {
            for y in 0..20u64 {
                let big_y = Integer::from(y);
                assert_eq!(
                    solve_for_x(1, p, 1001, y),
                    solve_for_x_big(1, p, 1001, &big_y)
                );
            }
        }
    }

    #[test]
    fn solve_for_y_round_trips_with_solve_for_x() {
        for p in [13u64, 17, 23, 29] {
            for y in 0..10u64 {
                for id in [-1, 1] {
                    let x = solve_for_x(id, p, 1001, y);
                    let recovered = solve_for_y(id, p, 1001, x).unwrap();
                    assert_eq!(recovered, y, "p={p} y={y} id={id}");
                }
            }
        }
    }

    #[test]
    fn solve_for_y_rejects_non_coprime_vx() {
        let err = solve_for_y(-1, 7, 35, 3).unwrap_err();
        assert!(matches!(err, EngineError::ModularInverseUndefined { .. }));
    }

    #[test]
    fn modular_inverse_round_trip() {
        for (a, m) in [(3u64, 11u64), (10, 17), (6, 35), (1, 2)] {
            let inv = modular_inverse(a, m).unwrap();
            assert_eq!((a * inv) % m, 1 % m);
        }
    }

    #[test]
    fn modular_inverse_undefined_when_not_coprime() {
        assert!(modular_inverse(6, 9).is_err());
    }

    #[test]
    fn compute_limited_vx_minimum_is_35() {
        assert_eq!(compute_limited_vx(1, 6), 35);
    }

    #[test]
    fn compute_limited_vx_grows_with_x_n() {
        let vx = compute_limited_vx(1_000_000, 6);
        assert!(vx > 35);
        assert_eq!(vx % 5, 0);
        assert_eq!(vx % 7, 0);
    }

    #[test]
    fn compute_max_vx_big_stays_under_bit_size() {
        let root_primes: Vec<u64> = vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
        let vx = compute_max_vx_big(24, &root_primes);
        assert!(vx.significant_bits() < 24);
    }
}
