//! # iZ-Next-Prime — Nearest-Prime Search From a Base
//!
//! Finds the nearest prime to a big-integer `base` in a chosen direction by
//! walking a fixed-size wheel segment (`vx = 5·7·11·13 = 5005`, covering
//! `6·vx = 30030` integers per segment) outward from `base`, testing every
//! surviving candidate with Miller–Rabin.

use rug::Integer;

use crate::base_segment::BaseSegment;
use crate::iz;
use crate::{is_probable_prime, DEFAULT_MR_ROUNDS};

/// Segment stride: the first four odd primes beyond 3, covering a span of
/// `6 * VX = 30030` integers per segment — wide enough that exhausting the
/// 1000-segment search window in practice never happens for real inputs.
pub const VX: u64 = 5 * 7 * 11 * 13;
const MAX_SEGMENTS: u64 = 1000;

/// Searches outward from `base` for the nearest prime, `forward` or
/// backward. Returns `None` if the 1000-segment window is exhausted.
pub fn next_prime(base: &Integer, forward: bool) -> Option<Integer> {
    let rem6: u64 = base.clone().rem_euc(&Integer::from(6)).to_u64().unwrap();
    if forward && rem6 == 5 {
        let candidate = Integer::from(base + 2);
        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
            return Some(candidate);
        }
    } else if !forward && rem6 == 1 {
        let candidate = Integer::from(base - 2);
        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
            return Some(candidate);
        }
    }

    let vx = VX;
    let base_seg = BaseSegment::new(vx, 10);

    let six_vx = Integer::from(6 * vx);
    let y = Integer::from(base / &six_vx);
    let mut yvx = Integer::from(&y * vx);

    let x_p = Integer::from(base / 6);
    let x_p_mod_vx = x_p
        .clone()
        .rem_euc(&Integer::from(vx))
        .to_u64()
        .unwrap() as i64;
    let step: i64 = if forward { 1 } else { -1 };
    let mut start_x = x_p_mod_vx + step;

    for i in 0..MAX_SEGMENTS {
        if forward {
            if i > 0 {
                start_x = 1;
            }
            let mut x = start_x;
            while x < vx as i64 + 1 {
                if x >= 1 {
                    let ux = x as u64;
                    if base_seg.x5.get_bit(ux as usize) {
                        let candidate_x = Integer::from(&yvx + ux);
                        let candidate = iz::iz_big(&candidate_x, -1);
                        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
                            return Some(candidate);
                        }
                    }
                    if base_seg.x7.get_bit(ux as usize) {
                        let candidate_x = Integer::from(&yvx + ux);
                        let candidate = iz::iz_big(&candidate_x, 1);
                        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
                            return Some(candidate);
                        }
                    }
                }
                x += 1;
            }
            yvx += vx;
        } else {
            if i > 0 {
                start_x = vx as i64;
            }
            let mut x = start_x;
            while x > 1 {
                if x >= 1 && x <= vx as i64 {
                    let ux = x as u64;
                    if base_seg.x7.get_bit(ux as usize) {
                        let candidate_x = Integer::from(&yvx + ux);
                        let candidate = iz::iz_big(&candidate_x, 1);
                        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
                            return Some(candidate);
                        }
                    }
                    if base_seg.x5.get_bit(ux as usize) {
                        let candidate_x = Integer::from(&yvx + ux);
                        let candidate = iz::iz_big(&candidate_x, -1);
                        if is_probable_prime(&candidate, DEFAULT_MR_ROUNDS) {
                            return Some(candidate);
                        }
                    }
                }
                x -= 1;
            }
            yvx -= vx;
        }
    }

    None
}
