//! # Error — Typed Failure Modes
//!
//! The core never panics on bad input from a caller (debug-only `assert!`s
//! exist where `spec.md` calls for undefined behavior on contract violation);
//! everything a user can trigger from outside surfaces as an [`EngineError`].

use thiserror::Error;

/// The error kinds named in `spec.md` §7.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("out of memory allocating {what} ({size} bits/bytes)")]
    OutOfMemory { what: &'static str, size: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no modular inverse of {a} mod {m} exists (gcd != 1)")]
    ModularInverseUndefined { a: u64, m: u64 },

    #[error("hash mismatch reading {what}: stored hash does not match recomputed hash")]
    HashMismatch { what: &'static str },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} not found after exhausting the search window")]
    NotFound { what: &'static str },
}

pub type Result<T> = std::result::Result<T, EngineError>;
