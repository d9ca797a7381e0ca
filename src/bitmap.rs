//! # Bitmap — Packed Bit Array with Strided Clear
//!
//! The hot path of the whole engine. Every sieve variant spends almost all of
//! its time inside [`Bitmap::clear_mod_p`]: clearing bits at a fixed stride
//! is the machine-level expression of "mark composites of this prime".
//!
//! Bit `i` lives in byte `i / 8`, bit position `i % 8` (LSB-first within the
//! byte — matches [`crate::prime_list::PrimeList`]'s little-endian file
//! layout and keeps `to_string`/`from_string` straightforward to read).
//! Indices at or beyond `size` are never read by any operation below; the
//! padding bits in the final byte are left undefined.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{EngineError, Result};

pub const BITMAP_EXT: &str = "bitmap";

/// A fixed-size, heap-allocated bit array with a content hash slot.
///
/// The hash in [`Bitmap::hash`] is authoritative only immediately after a
/// call to [`Bitmap::compute_hash`]; mutating the bitmap afterwards makes it
/// stale until recomputed, exactly as `spec.md` §3 describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    size: usize,
    data: Vec<u8>,
    hash: [u8; 32],
}

impl Bitmap {
    /// Zero-initialized bitmap of exactly `size` bits.
    pub fn create(size: usize) -> Self {
        let nbytes = size.div_ceil(8);
        Bitmap {
            size,
            data: vec![0u8; nbytes],
            hash: [0u8; 32],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn set_all(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0xFF);
    }

    pub fn clear_all(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0);
    }

    #[inline]
    pub fn get_bit(&self, i: usize) -> bool {
        debug_assert!(i < self.size, "bit index {i} out of bounds ({})", self.size);
        self.data[i / 8] & (1 << (i % 8)) != 0
    }

    #[inline]
    pub fn set_bit(&mut self, i: usize) {
        debug_assert!(i < self.size, "bit index {i} out of bounds ({})", self.size);
        self.data[i / 8] |= 1 << (i % 8);
    }

    #[inline]
    pub fn clear_bit(&mut self, i: usize) {
        debug_assert!(i < self.size, "bit index {i} out of bounds ({})", self.size);
        self.data[i / 8] &= !(1 << (i % 8));
    }

    #[inline]
    pub fn flip_bit(&mut self, i: usize) {
        debug_assert!(i < self.size, "bit index {i} out of bounds ({})", self.size);
        self.data[i / 8] ^= 1 << (i % 8);
    }

    /// Clears bits at `start, start+p, start+2p, ...` while the index is
    /// strictly less than `limit`. This is the Xp-Wheel primitive: every
    /// composite-marking loop in the engine bottoms out here.
    ///
    /// Pre: `p >= 1`, `start <= limit`, `limit <= size`.
    pub fn clear_mod_p(&mut self, p: u64, start: u64, limit: u64) {
        debug_assert!(p >= 1);
        debug_assert!(start <= limit);
        debug_assert!(limit as usize <= self.size);
        let mut i = start;
        while i < limit {
            self.clear_bit(i as usize);
            i += p;
        }
    }

    /// Bit-wise copy of `length` bits from `src[src_idx..]` into
    /// `self[dst_idx..]`. Handles non-byte-aligned offsets; overlapping
    /// copies within the same bitmap are not supported.
    pub fn copy(&mut self, dst_idx: usize, src: &Bitmap, src_idx: usize, length: usize) {
        for k in 0..length {
            if src.get_bit(src_idx + k) {
                self.set_bit(dst_idx + k);
            } else {
                self.clear_bit(dst_idx + k);
            }
        }
    }

    /// Given bits already populated in `[start, start + segment_size)`,
    /// replicate them `y - 1` further times, tiling
    /// `[start + segment_size, start + y * segment_size)`.
    ///
    /// Used while folding a new prime into the base-segment wheel: the
    /// pattern for the smaller vx is correct modulo the new prime's
    /// residues, so it can be stamped out `p` times before those residues
    /// are marked (see [`crate::base_segment::BaseSegment::new`]).
    pub fn duplicate_segment(&mut self, start: usize, segment_size: usize, y: usize) {
        if segment_size == 0 || y <= 1 {
            return;
        }
        for k in 1..y {
            let dst = start + k * segment_size;
            for j in 0..segment_size {
                if self.get_bit(start + j) {
                    self.set_bit(dst + j);
                } else {
                    self.clear_bit(dst + j);
                }
            }
        }
    }

    pub fn to_string_bits(&self) -> String {
        (0..self.size)
            .map(|i| if self.get_bit(i) { '1' } else { '0' })
            .collect()
    }

    pub fn from_string_bits(s: &str) -> Result<Self> {
        let size = s.len();
        let mut bm = Bitmap::create(size);
        for (i, c) in s.chars().enumerate() {
            match c {
                '1' => bm.set_bit(i),
                '0' => {}
                _ => {
                    return Err(EngineError::InvalidArgument(format!(
                        "bitmap string contains non-binary character '{c}' at position {i}"
                    )))
                }
            }
        }
        Ok(bm)
    }

    /// Writes the SHA-256 hash of the packed byte buffer into the hash slot.
    pub fn compute_hash(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        self.hash.copy_from_slice(&hasher.finalize());
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Recomputes the hash over the current data and compares against the
    /// stored slot, without mutating `self`.
    pub fn validate_hash(&self) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        let fresh: [u8; 32] = hasher.finalize().into();
        fresh == self.hash
    }

    /// Layout: `size` (u64 LE) | packed bytes | 32 hash bytes.
    /// Appends [`BITMAP_EXT`] if the path has no extension.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let path = with_default_ext(path, BITMAP_EXT);
        let mut file = File::create(&path).map_err(|e| io_err(&path, e))?;
        file.write_all(&(self.size as u64).to_le_bytes())
            .map_err(|e| io_err(&path, e))?;
        file.write_all(&self.data).map_err(|e| io_err(&path, e))?;
        file.write_all(&self.hash).map_err(|e| io_err(&path, e))?;
        Ok(())
    }

    pub fn read_file(path: &Path) -> Result<Self> {
        let path = with_default_ext(path, BITMAP_EXT);
        let mut file = File::open(&path).map_err(|e| io_err(&path, e))?;

        let mut size_buf = [0u8; 8];
        file.read_exact(&mut size_buf).map_err(|e| io_err(&path, e))?;
        let size = u64::from_le_bytes(size_buf) as usize;

        let mut data = vec![0u8; size.div_ceil(8)];
        file.read_exact(&mut data).map_err(|e| io_err(&path, e))?;

        let mut hash = [0u8; 32];
        file.read_exact(&mut hash).map_err(|e| io_err(&path, e))?;

        let bm = Bitmap { size, data, hash };
        if !bm.validate_hash() {
            return Err(EngineError::HashMismatch { what: "bitmap file" });
        }
        Ok(bm)
    }
}

fn with_default_ext(path: &Path, ext: &str) -> std::path::PathBuf {
    if path.extension().is_none() {
        path.with_extension(ext)
    } else {
        path.to_path_buf()
    }
}

fn io_err(path: &Path, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.display().to_string(),
        source,
    }
}
