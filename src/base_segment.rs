//! # Base-Segment Construction
//!
//! Builds the pre-sieved wheel pattern of length `vx`: two bitmaps where a
//! set bit at `x` means `6x∓1` survives every small prime dividing `vx`.
//! Every segmented sieve and the next-prime/random-prime searches clone
//! this pattern instead of re-deriving it per segment.

use crate::bitmap::Bitmap;

/// Primes beyond 5 and 7 that a `vx` primorial stride may include, in the
/// order `construct_iZm_segment` folds them in.
const SMALL_PRIMES: [u64; 10] = [5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

#[derive(Clone, Debug)]
pub struct BaseSegment {
    pub vx: u64,
    pub x5: Bitmap,
    pub x7: Bitmap,
}

impl BaseSegment {
    /// Builds the base segment for `vx`, a product of a prefix of
    /// `{5, 7, 11, 13, ...}`. Bitmaps are sized `vx + slack` (`slack >= 2`)
    /// so every `clear_mod_p` call with `limit = current_size + 1` stays
    /// in bounds.
    pub fn new(vx: u64, slack: usize) -> Self {
        let size = vx as usize + slack.max(2);
        let mut x5 = Bitmap::create(size);
        let mut x7 = Bitmap::create(size);
        construct_vx2(&mut x5, &mut x7);

        let mut current_size: u64 = 35;
        for &p in SMALL_PRIMES.iter().skip(2) {
            if vx % p != 0 {
                break;
            }
            let x = (p + 1) / 6;

            x5.duplicate_segment(1, current_size as usize, p as usize);
            x7.duplicate_segment(1, current_size as usize, p as usize);
            current_size *= p;

            if p % 6 > 1 {
                // p is in iZ+: mark its own iZ- slot, then its composites.
                x5.clear_bit(x as usize);
                x5.clear_mod_p(p, p * x + x, current_size + 1);
                x7.clear_mod_p(p, p * x - x, current_size + 1);
            } else {
                x7.clear_bit(x as usize);
                x5.clear_mod_p(p, p * x - x, current_size + 1);
                x7.clear_mod_p(p, p * x + x, current_size + 1);
            }
        }

        BaseSegment { vx, x5, x7 }
    }
}

/// Seeds positions `1..=35` of `x5`/`x7` using the mod-5/mod-7 residue
/// rules — the `vx = 35` base case every larger stride extends.
fn construct_vx2(x5: &mut Bitmap, x7: &mut Bitmap) {
    for i in 1..=35usize {
        if (i - 1) % 5 != 0 && (i + 1) % 7 != 0 {
            x5.set_bit(i);
        }
        if (i + 1) % 5 != 0 && (i - 1) % 7 != 0 {
            x7.set_bit(i);
        }
    }
}
