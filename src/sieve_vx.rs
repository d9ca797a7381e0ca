//! # Sieve-vx — Per-Segment Sieve at Arbitrary y
//!
//! The component that makes the engine useful past the range a bitmap can
//! address directly: given a small, fixed `vx` and a big-integer segment
//! index `y`, sieve exactly the `vx` candidates in that segment, switching
//! from pure deterministic marking to Miller–Rabin once the segment
//! outgrows the square of the largest cheaply available root prime.

use rug::Integer;

use crate::base_segment::BaseSegment;
use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::gap_list::GapList;
use crate::iz::{self, solve_for_x_big};
use crate::prime_list::PrimeList;
use crate::sieve_iz::sieve_iz;
use crate::{is_probable_prime, DEFAULT_MR_ROUNDS};

/// Reusable, read-only sieving assets for a fixed `vx`: every prime up to
/// `vx` and the pre-sieved base segment, shared across many [`VxObj`]s.
pub struct VxAssets {
    pub vx: u64,
    pub root_primes: PrimeList,
    base: BaseSegment,
}

impl VxAssets {
    pub fn new(vx: u64) -> Result<Self> {
        let root_primes = sieve_iz(vx.max(10))?;
        let base = BaseSegment::new(vx, 10);
        Ok(VxAssets {
            vx,
            root_primes,
            base,
        })
    }
}

/// A single segment descriptor: `vx`, the big-integer segment index `y`,
/// the gap list it accumulates, and performance counters with no semantic
/// effect on the result.
pub struct VxObj {
    pub vx: u64,
    pub y: Integer,
    pub gaps: GapList,
    bit_ops: u64,
    p_test_ops: u64,
}

impl VxObj {
    pub fn new(vx: u64, y: Integer) -> Self {
        VxObj {
            vx,
            y,
            gaps: GapList::with_capacity(vx as usize / 2),
            bit_ops: 0,
            p_test_ops: 0,
        }
    }

    pub fn bit_ops(&self) -> u64 {
        self.bit_ops
    }

    pub fn p_test_ops(&self) -> u64 {
        self.p_test_ops
    }

    /// The prime-candidate slot immediately preceding `x = 1` in iZ+:
    /// `6·y·vx + 1`. Every emitted gap is a delta applied starting here.
    /// Kept derived from `(vx, y)` rather than stored, since the gap-list
    /// file format fixed by the external interfaces does not carry it.
    pub fn anchor(&self) -> Integer {
        Integer::from(&self.y * self.vx) * 6 + 1
    }
}

/// Runs one segment: mutates `vx_obj` in place, populating its gap list
/// and counters.
pub fn sieve_vx(vx_obj: &mut VxObj, assets: &VxAssets) -> Result<()> {
    let vx = vx_obj.vx;
    let mut x5 = assets.base.x5.clone();
    let mut x7 = assets.base.x7.clone();

    let yvx = Integer::from(&vx_obj.y * vx);
    let mut root_limit = Integer::from(&yvx + vx);
    root_limit *= 6;
    root_limit += 1;
    let root_limit = root_limit.sqrt();
    let is_large_limit = root_limit > vx;

    // Deterministic phase: mark composites of every root prime below vx
    // (skipping 2, 3 and primes that divide vx) whose square still falls
    // inside this segment.
    for &p in assets.root_primes.as_slice().iter().skip(2) {
        if vx % p == 0 {
            continue;
        }
        if !is_large_limit && root_limit < p {
            break;
        }
        let start_minus = solve_for_x_big(-1, p, vx, &vx_obj.y);
        x5.clear_mod_p(p, start_minus, vx);
        let start_plus = solve_for_x_big(1, p, vx, &vx_obj.y);
        x7.clear_mod_p(p, start_plus, vx);
        vx_obj.bit_ops += (2 * vx).div_ceil(p);
    }

    // Emission phase: walk x = 1..=vx, testing survivors once the segment
    // outgrows what the deterministic phase alone could guarantee.
    let mut gap: u16 = 0;
    for x in 1..=vx {
        gap += 4; // iZ(x,-1) - iZ(x-1,1) == 4
        if x5.get_bit(x as usize) {
            let is_prime = if is_large_limit {
                let candidate = iz::iz_big(&Integer::from(&yvx + x), -1);
                vx_obj.p_test_ops += 1;
                is_probable_prime(&candidate, DEFAULT_MR_ROUNDS)
            } else {
                true
            };
            if is_prime {
                vx_obj.gaps.push(gap);
                gap = 0;
            }
        }

        gap += 2; // iZ(x,1) - iZ(x,-1) == 2
        if x7.get_bit(x as usize) {
            let is_prime = if is_large_limit {
                let candidate = iz::iz_big(&Integer::from(&yvx + x), 1);
                vx_obj.p_test_ops += 1;
                is_probable_prime(&candidate, DEFAULT_MR_ROUNDS)
            } else {
                true
            };
            if is_prime {
                vx_obj.gaps.push(gap);
                gap = 0;
            }
        }
    }

    vx_obj.gaps.shrink_to_fit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_y_matches_sieve_izm() {
        let vx = 35u64;
        let assets = VxAssets::new(vx).unwrap();
        let mut obj = VxObj::new(vx, Integer::from(0));
        sieve_vx(&mut obj, &assets).unwrap();

        let anchor = obj.anchor();
        assert_eq!(anchor, 1);
        let candidates = obj.gaps.reconstruct(&anchor);

        // Primes dividing vx (5 and 7, here) never appear in the gap stream:
        // their own wheel slot (x=1) is always cleared by construction.
        let reference = crate::sieve_iz::sieve_izm(250).unwrap();
        let reference_in_range: Vec<Integer> = reference
            .as_slice()
            .iter()
            .filter(|&&p| p > 1 && p <= 6 * vx + 1 && vx % p != 0)
            .map(|&p| Integer::from(p))
            .collect();
        assert_eq!(candidates, reference_in_range);
    }

    #[test]
    fn candidates_are_all_probably_prime_for_small_segment() {
        let vx = 1001u64;
        let assets = VxAssets::new(vx).unwrap();
        let mut obj = VxObj::new(vx, Integer::from(0));
        sieve_vx(&mut obj, &assets).unwrap();
        let candidates = obj.gaps.reconstruct(&obj.anchor());
        for c in &candidates {
            assert!(is_probable_prime(c, DEFAULT_MR_ROUNDS), "{c} not prime");
        }
    }

    #[test]
    fn large_y_candidates_pass_miller_rabin() {
        // spec.md §8: vx=1616615, y=1_000_000_000 — first emitted gap, summed
        // onto the anchor, passes a 25-round Miller-Rabin test.
        let vx = 1_616_615u64; // 5*7*11*13*17*19
        let assets = VxAssets::new(vx).unwrap();
        let y = Integer::parse("1000000000").unwrap().into();
        let mut obj = VxObj::new(vx, y);
        sieve_vx(&mut obj, &assets).unwrap();
        assert!(!obj.gaps.is_empty());
        let first = obj.anchor() + Integer::from(obj.gaps.as_slice()[0]);
        assert!(is_probable_prime(&first, DEFAULT_MR_ROUNDS));
    }

    #[test]
    fn gap_sum_reconstructs_ascending_sequence() {
        let vx = 35u64;
        let assets = VxAssets::new(vx).unwrap();
        let mut obj = VxObj::new(vx, Integer::from(2));
        sieve_vx(&mut obj, &assets).unwrap();
        let seq = obj.gaps.reconstruct(&obj.anchor());
        for w in seq.windows(2) {
            assert!(w[0] < w[1]);
        }
    }
}
