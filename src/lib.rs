pub mod bitstream;
pub mod codec;
pub mod dict;
pub mod ffi;

#[cfg(test)]
mod validation;

use std::sync::atomic::{AtomicI32, Ordering};

pub use codec::{compress, compress_bound, compress_to_buf, expand, expand_to_buf};

/// Error types for lzw15 operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LzwError {
    /// Output buffer is too small to hold the result.
    BufferTooSmall,
    /// Input data is invalid or corrupt.
    InvalidInput,
}

impl std::fmt::Display for LzwError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "output buffer too small"),
            Self::InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl std::error::Error for LzwError {}

pub type LzwResult<T> = Result<T, LzwError>;

/// Process-wide verbose level, observational only: it never alters the
/// compressed output.
static VERBOSE: AtomicI32 = AtomicI32::new(0);

/// Set the verbose level. Zero is silent; nonzero makes the compressor
/// emit a one-character `B` marker to stderr on every code-width bump.
pub fn set_verbose(level: i32) {
    VERBOSE.store(level, Ordering::Relaxed);
}

pub(crate) fn verbose_level() -> i32 {
    VERBOSE.load(Ordering::Relaxed)
}
