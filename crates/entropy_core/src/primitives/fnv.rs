//! FNV-1a 64-bit hash.

use super::HashFunction;

const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01B3;

/// FNV-1a with a 64-bit state, emitted as 8 little-endian bytes.
///
/// # Examples
///
/// ```rust
/// use entropy_core::primitives::{Fnv1a64, HashFunction};
///
/// let digest = Fnv1a64.compute(b"a");
/// assert_eq!(digest, 0xaf63_dc4c_8601_ec8c_u64.to_le_bytes());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1a64;

impl Fnv1a64 {
    /// Hashes `bytes` to a `u64`.
    #[inline]
    pub fn hash64(bytes: &[u8]) -> u64 {
        bytes.iter().fold(OFFSET, |hash, &b| {
            (hash ^ b as u64).wrapping_mul(PRIME)
        })
    }
}

impl HashFunction for Fnv1a64 {
    fn output_size(&self) -> usize {
        8
    }

    fn compute(&self, input: &[u8]) -> Vec<u8> {
        Self::hash64(input).to_le_bytes().to_vec()
    }
}
