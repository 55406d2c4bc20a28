//! Fixed-width multi-word unsigned values.

use std::ops::{BitAnd, BitOr, BitXor, Not};

/// An unsigned value of `64 * N` bits stored as little-endian words.
///
/// Word 0 holds bits `0..64`, word 1 holds bits `64..128`, and so on. Used
/// both as wide random output and as wide masks.
///
/// # Examples
///
/// ```rust
/// use entropy_core::bits::Wide256;
///
/// let mut value = Wide256::ZERO;
/// value.set_bit(130);
/// assert!(value.bit(130));
/// assert_eq!(value.words()[2], 1 << 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wide<const N: usize>(pub [u64; N]);

/// 128-bit wide value.
pub type Wide128 = Wide<2>;
/// 256-bit wide value.
pub type Wide256 = Wide<4>;
/// 512-bit wide value.
pub type Wide512 = Wide<8>;

impl<const N: usize> Wide<N> {
    /// Total width in bits.
    pub const BITS: u32 = 64 * N as u32;

    /// All bits clear.
    pub const ZERO: Self = Self([0; N]);

    /// All bits set.
    pub const MAX: Self = Self([u64::MAX; N]);

    /// Builds a value from little-endian words.
    #[inline]
    pub const fn from_words(words: [u64; N]) -> Self {
        Self(words)
    }

    /// The little-endian words.
    #[inline]
    pub fn words(&self) -> &[u64; N] {
        &self.0
    }

    /// True when no bit is set.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Reads the bit at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= Self::BITS`.
    #[inline]
    pub fn bit(&self, pos: u32) -> bool {
        (self.0[(pos / 64) as usize] >> (pos % 64)) & 1 == 1
    }

    /// Sets the bit at `pos`.
    #[inline]
    pub fn set_bit(&mut self, pos: u32) {
        self.0[(pos / 64) as usize] |= 1 << (pos % 64);
    }

    /// Clears the bit at `pos`.
    #[inline]
    pub fn clear_bit(&mut self, pos: u32) {
        self.0[(pos / 64) as usize] &= !(1 << (pos % 64));
    }

    /// ORs the low `len` bits of `chunk` into the value starting at bit
    /// `offset`, spilling into the next word when needed.
    ///
    /// Bits that would land past `Self::BITS` are dropped.
    pub fn or_bits_at(&mut self, offset: u32, chunk: u64, len: u32) {
        if len == 0 || offset >= Self::BITS {
            return;
        }
        let chunk = chunk & super::low_mask(len);
        let word = (offset / 64) as usize;
        let shift = offset % 64;
        self.0[word] |= chunk << shift;
        if shift != 0 && shift + len > 64 && word + 1 < N {
            self.0[word + 1] |= chunk >> (64 - shift);
        }
    }

    /// Little-endian byte representation.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

impl<const N: usize> Default for Wide<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[u64; N]> for Wide<N> {
    fn from(words: [u64; N]) -> Self {
        Self(words)
    }
}

impl From<u128> for Wide128 {
    fn from(value: u128) -> Self {
        Self([value as u64, (value >> 64) as u64])
    }
}

impl From<Wide128> for u128 {
    fn from(value: Wide128) -> Self {
        (value.0[0] as u128) | ((value.0[1] as u128) << 64)
    }
}

impl<const N: usize> BitAnd for Wide<N> {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a &= b;
        }
        self
    }
}

impl<const N: usize> BitOr for Wide<N> {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a |= b;
        }
        self
    }
}

impl<const N: usize> BitXor for Wide<N> {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a ^= b;
        }
        self
    }
}

impl<const N: usize> Not for Wide<N> {
    type Output = Self;

    fn not(mut self) -> Self {
        for a in self.0.iter_mut() {
            *a = !*a;
        }
        self
    }
}
