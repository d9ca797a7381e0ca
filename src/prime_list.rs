//! # PrimeList — Append-Only 64-bit Prime Sequence
//!
//! The output container every sieve in [`crate::sieve_classic`] and
//! [`crate::sieve_iz`] converges on. Byte-for-byte hash agreement between
//! six independently-derived `PrimeList`s is the crate's central testable
//! property (`spec.md` §8.1).

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{EngineError, Result};

pub const PRIME_LIST_EXT: &str = "primes";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PrimeList {
    values: Vec<u64>,
    hash: [u8; 32],
}

impl PrimeList {
    pub fn with_capacity(capacity: usize) -> Self {
        PrimeList {
            values: Vec::with_capacity(capacity),
            hash: [0u8; 32],
        }
    }

    pub fn push(&mut self, p: u64) {
        self.values.push(p);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    pub fn last(&self) -> Option<u64> {
        self.values.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.values.iter()
    }

    /// Drops the trailing value while it exceeds `n`. `spec.md` §9 requires
    /// looping this trim rather than a single conditional: a sieve must
    /// never overshoot by more than one in practice, but the contract is
    /// "strictly ≤ n" regardless.
    pub fn trim_overshoot(&mut self, n: u64) {
        while matches!(self.values.last(), Some(&last) if last > n) {
            self.values.pop();
        }
    }

    /// Shrinks backing storage to the true element count.
    pub fn shrink_to_fit(&mut self) {
        self.values.shrink_to_fit();
    }

    pub fn compute_hash(&mut self) {
        self.hash = hash_values(&self.values);
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn validate_hash(&self) -> bool {
        hash_values(&self.values) == self.hash
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.values
    }

    /// Layout: count (u64 LE) | count * 8 little-endian prime bytes | 32 hash bytes.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let path = with_default_ext(path, PRIME_LIST_EXT);
        let mut file = File::create(&path).map_err(|e| io_err(&path, e))?;
        file.write_all(&(self.values.len() as u64).to_le_bytes())
            .map_err(|e| io_err(&path, e))?;
        for v in &self.values {
            file.write_all(&v.to_le_bytes()).map_err(|e| io_err(&path, e))?;
        }
        file.write_all(&self.hash).map_err(|e| io_err(&path, e))?;
        Ok(())
    }

    pub fn read_file(path: &Path) -> Result<Self> {
        let path = with_default_ext(path, PRIME_LIST_EXT);
        let mut file = File::open(&path).map_err(|e| io_err(&path, e))?;

        let mut count_buf = [0u8; 8];
        file.read_exact(&mut count_buf).map_err(|e| io_err(&path, e))?;
        let count = u64::from_le_bytes(count_buf) as usize;

        let mut values = Vec::with_capacity(count);
        let mut v_buf = [0u8; 8];
        for _ in 0..count {
            file.read_exact(&mut v_buf).map_err(|e| io_err(&path, e))?;
            values.push(u64::from_le_bytes(v_buf));
        }

        let mut hash = [0u8; 32];
        file.read_exact(&mut hash).map_err(|e| io_err(&path, e))?;

        let list = PrimeList { values, hash };
        if !list.validate_hash() {
            return Err(EngineError::HashMismatch { what: "prime-list file" });
        }
        Ok(list)
    }
}

impl From<Vec<u64>> for PrimeList {
    fn from(values: Vec<u64>) -> Self {
        PrimeList {
            values,
            hash: [0u8; 32],
        }
    }
}

fn hash_values(values: &[u64]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for v in values {
        hasher.update(v.to_le_bytes());
    }
    hasher.finalize().into()
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
