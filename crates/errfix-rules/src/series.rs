//! Error-code counters
//!
//! A series hands out consecutive codes: each call advances the counter by
//! one and returns the new value, so the first code issued is `seed + 1`.
//! A counter at `u64::MAX` is exhausted and refuses to advance.

use errfix_core::{ErrfixError, Result};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Seed used when a file name yields no usable digits
pub const FALLBACK_SEED: u64 = 10000;

/// Source of error codes for a rewrite
pub trait ErrorSeries {
    /// Advance by one and return the new code
    fn next_code(&mut self) -> Result<u64>;
}

/// Counter owned by a single rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSeries {
    current: u64,
}

impl LocalSeries {
    pub fn new(seed: u64) -> Self {
        Self { current: seed }
    }

    /// The last code issued, or the seed if none was
    pub fn current(&self) -> u64 {
        self.current
    }
}

impl ErrorSeries for LocalSeries {
    fn next_code(&mut self) -> Result<u64> {
        self.current = self
            .current
            .checked_add(1)
            .ok_or(ErrfixError::series_exhausted(self.current))?;
        Ok(self.current)
    }
}

/// Counter shared between rewrites of several files
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct SharedSeries {
    current: Arc<AtomicU64>,
}

impl SharedSeries {
    pub fn new(seed: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(seed)),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl ErrorSeries for SharedSeries {
    fn next_code(&mut self) -> Result<u64> {
        self.current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(ErrfixError::series_exhausted)
    }
}

/// Seed derived from a file name when none is configured
///
/// The name without its `.extension` is summed as `byte - 64` per byte. The
/// first three digits of the absolute sum, right-padded with zeros to five
/// digits, form the seed: `cymon.py` sums to 230 and seeds 23000.
pub fn default_series_for(path: &Path, extension: &str) -> u64 {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dotted = format!(".{extension}");
    let stem = name.strip_suffix(dotted.as_str()).unwrap_or(&name);

    let sum: i64 = stem.bytes().map(|b| i64::from(b) - 64).sum();
    let digits: String = sum.unsigned_abs().to_string().chars().take(3).collect();
    let padded = format!("{digits:0<5}");

    match padded.parse::<u64>() {
        Ok(0) | Err(_) => FALLBACK_SEED,
        Ok(seed) => seed,
    }
}
