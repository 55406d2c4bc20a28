//! Error types for word-source shaping operations.
//!
//! This module provides:
//! - `EntropyError`: validation failures raised before any source word is drawn
//! - `EntropyResult<T>`: convenience alias used throughout the workspace

use thiserror::Error;

/// Result alias for shaping operations.
pub type EntropyResult<T> = Result<T, EntropyError>;

/// Shaping errors.
///
/// Every variant is a local, synchronous validation failure. Operations
/// check their arguments before touching the word source, so a returned
/// error never implies partial progress.
///
/// Rejection loops (rejection sampling, Marsaglia polar, Ziggurat wedge and
/// tail) are part of the algorithms and never surface as errors.
///
/// # Examples
/// ```
/// use entropy_core::EntropyError;
///
/// let err = EntropyError::MaskTooWide { popcount: 12, budget: 8 };
/// assert!(format!("{}", err).contains("12"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntropyError {
    /// The mask has no set bits.
    #[error("Invalid mask: mask must have at least one set bit")]
    InvalidMask,

    /// The mask selects more bits than the target can hold.
    #[error("Mask too wide: {popcount} set bits exceed a budget of {budget}")]
    MaskTooWide {
        /// Population count of the offending mask
        popcount: u32,
        /// Maximum number of bits allowed
        budget: u32,
    },

    /// A bit-count parameter is out of range or not evenly divisible.
    #[error("Invalid bit count {bits}: {reason}")]
    InvalidBitCount {
        /// The offending bit count
        bits: u32,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Range reduction was asked for a zero modulus.
    #[error("Invalid modulus: modulus must be non-zero")]
    InvalidModulus,

    /// A distribution parameter is out of its domain.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value, rendered
        value: String,
    },

    /// Key material length does not match the primitive's key size.
    #[error("Key size mismatch: expected {expected} bytes, got {actual}")]
    KeySizeMismatch {
        /// Key size required by the primitive
        expected: usize,
        /// Key size supplied
        actual: usize,
    },

    /// Block length does not match the primitive's block size.
    #[error("Block size mismatch: expected {expected} bytes, got {actual}")]
    BlockSizeMismatch {
        /// Block size required by the primitive
        expected: usize,
        /// Block size supplied
        actual: usize,
    },

    /// A hardware or operating-system entropy source is not usable here.
    #[error("Entropy source unavailable: {source_name}")]
    EntropyUnavailable {
        /// Name of the missing source
        source_name: &'static str,
    },
}

impl EntropyError {
    /// Builds an [`EntropyError::InvalidBitCount`].
    pub(crate) fn bit_count(bits: u32, reason: &'static str) -> Self {
        Self::InvalidBitCount { bits, reason }
    }
}
