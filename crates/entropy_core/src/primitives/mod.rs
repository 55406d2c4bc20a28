//! # Hash and Block-Cipher Contracts
//!
//! The counter-mode wideners consume cryptographic primitives only through
//! the two traits defined here. Any hash or cipher can be plugged in by
//! implementing them; two small references are provided:
//!
//! - [`Fnv1a64`]: FNV-1a, 8-byte digest (fast, not collision resistant)
//! - [`Philox4x32`]: Philox-4x32-10 keyed bijection on 128-bit blocks

mod fnv;
mod philox;

pub use fnv::Fnv1a64;
pub use philox::Philox4x32;

use crate::error::EntropyResult;

/// A hash function with a fixed output size.
pub trait HashFunction {
    /// Digest length in bytes.
    fn output_size(&self) -> usize;

    /// Hashes `input`; the result is exactly [`output_size`](Self::output_size) bytes.
    fn compute(&self, input: &[u8]) -> Vec<u8>;
}

/// A block cipher used block-by-block with no padding and no chaining.
pub trait BlockCipher {
    /// Key length in bytes.
    fn key_size(&self) -> usize;

    /// Block length in bytes.
    fn block_size(&self) -> usize;

    /// Installs `key`.
    ///
    /// # Errors
    ///
    /// [`EntropyError::KeySizeMismatch`](crate::EntropyError::KeySizeMismatch)
    /// when `key.len() != self.key_size()`.
    fn set_key(&mut self, key: &[u8]) -> EntropyResult<()>;

    /// Encrypts one block.
    ///
    /// # Errors
    ///
    /// [`EntropyError::BlockSizeMismatch`](crate::EntropyError::BlockSizeMismatch)
    /// when `block.len() != self.block_size()`.
    fn encrypt_block(&self, block: &[u8]) -> EntropyResult<Vec<u8>>;
}
