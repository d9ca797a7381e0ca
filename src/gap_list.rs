//! # GapList — Append-Only Prime-Gap Stream
//!
//! The output of [`crate::sieve_vx`]. Gaps are stored relative to an
//! implicit anchor (`6·y·vx + 1`, see [`crate::sieve_vx::VxObj::anchor`])
//! rather than as absolute values, which is why the container alone cannot
//! be interpreted without knowing the `(vx, y)` it was produced from.

use rug::Integer;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{EngineError, Result};

pub const GAP_LIST_EXT: &str = "gaps";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GapList {
    gaps: Vec<u16>,
    hash: [u8; 32],
}

impl GapList {
    pub fn with_capacity(capacity: usize) -> Self {
        GapList {
            gaps: Vec::with_capacity(capacity),
            hash: [0u8; 32],
        }
    }

    pub fn push(&mut self, gap: u16) {
        self.gaps.push(gap);
    }

    pub fn count(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.gaps
    }

    pub fn shrink_to_fit(&mut self) {
        self.gaps.shrink_to_fit();
    }

    pub fn compute_hash(&mut self) {
        self.hash = hash_gaps(&self.gaps);
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn validate_hash(&self) -> bool {
        hash_gaps(&self.gaps) == self.hash
    }

    /// Reconstructs the ascending candidate sequence by running the sums
    /// onto `anchor` (`spec.md` §8.9).
    pub fn reconstruct(&self, anchor: &Integer) -> Vec<Integer> {
        let mut out = Vec::with_capacity(self.gaps.len());
        let mut running = anchor.clone();
        for &g in &self.gaps {
            running += Integer::from(g);
            out.push(running.clone());
        }
        out
    }

    /// Layout: len(y-string) (u64 LE) | y as decimal bytes, NUL-terminated |
    /// count (u64 LE) | count * 2 gap bytes | 32 hash bytes. The hash is
    /// computed over the gap bytes only, per `spec.md` §6.
    pub fn write_file(&self, path: &Path, y: &Integer) -> Result<()> {
        let path = with_default_ext(path, GAP_LIST_EXT);
        let mut file = File::create(&path).map_err(|e| io_err(&path, e))?;

        let mut y_bytes = y.to_string().into_bytes();
        y_bytes.push(0);
        file.write_all(&(y_bytes.len() as u64).to_le_bytes())
            .map_err(|e| io_err(&path, e))?;
        file.write_all(&y_bytes).map_err(|e| io_err(&path, e))?;

        file.write_all(&(self.gaps.len() as u64).to_le_bytes())
            .map_err(|e| io_err(&path, e))?;
        for g in &self.gaps {
            file.write_all(&g.to_le_bytes()).map_err(|e| io_err(&path, e))?;
        }
        file.write_all(&self.hash).map_err(|e| io_err(&path, e))?;
        Ok(())
    }

    /// Returns the loaded gap list together with the `y` decoded from the header.
    pub fn read_file(path: &Path) -> Result<(Self, Integer)> {
        let path = with_default_ext(path, GAP_LIST_EXT);
        let mut file = File::open(&path).map_err(|e| io_err(&path, e))?;

        let mut len_buf = [0u8; 8];
        file.read_exact(&mut len_buf).map_err(|e| io_err(&path, e))?;
        let y_len = u64::from_le_bytes(len_buf) as usize;

        let mut y_bytes = vec![0u8; y_len];
        file.read_exact(&mut y_bytes).map_err(|e| io_err(&path, e))?;
        if y_bytes.last() != Some(&0) {
            return Err(EngineError::InvalidArgument(
                "gap-list file: y field is not NUL-terminated".into(),
            ));
        }
        y_bytes.pop();
        let y_str = String::from_utf8(y_bytes).map_err(|_| {
            EngineError::InvalidArgument("gap-list file: y field is not valid UTF-8".into())
        })?;
        let y = Integer::parse(&y_str)
            .map_err(|_| EngineError::InvalidArgument(format!("gap-list file: bad y '{y_str}'")))?
            .into();

        let mut count_buf = [0u8; 8];
        file.read_exact(&mut count_buf).map_err(|e| io_err(&path, e))?;
        let count = u64::from_le_bytes(count_buf) as usize;

        let mut gaps = Vec::with_capacity(count);
        let mut g_buf = [0u8; 2];
        for _ in 0..count {
            file.read_exact(&mut g_buf).map_err(|e| io_err(&path, e))?;
            gaps.push(u16::from_le_bytes(g_buf));
        }

        let mut hash = [0u8; 32];
        file.read_exact(&mut hash).map_err(|e| io_err(&path, e))?;

        let list = GapList { gaps, hash };
        if !list.validate_hash() {
            return Err(EngineError::HashMismatch { what: "gap-list file" });
        }
        Ok((list, y))
    }
}

fn hash_gaps(gaps: &[u16]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for g in gaps {
        hasher.update(g.to_le_bytes());
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
