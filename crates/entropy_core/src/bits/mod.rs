//! # Bit Math
//!
//! Population count, trailing-zero position chaining, and parallel bit
//! extract/scatter over 64-bit and multi-word (128/256/512-bit) masks.
//!
//! The free functions validate their masks and dispatch to the
//! process-wide [`BitKernel`]. Raw, unvalidated primitives are available on
//! the kernel itself.
//!
//! ## Usage Example
//!
//! ```rust
//! use entropy_core::bits::{parallel_bit_extract, parallel_bit_scatter};
//!
//! // Bits 1 and 3 of 0b1011 are both set.
//! assert_eq!(parallel_bit_extract(0b1011, 0b1010).unwrap(), 0b11);
//! assert_eq!(parallel_bit_scatter(0b11, 0b1010).unwrap(), 0b1010);
//! ```

mod kernel;
mod wide;

pub use kernel::BitKernel;
pub use wide::{Wide, Wide128, Wide256, Wide512};

use crate::error::{EntropyError, EntropyResult};

/// Mask with the low `n` bits set (`n` in `0..=64`).
#[inline]
pub fn low_mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Number of set bits in `mask`.
#[inline]
pub fn popcount(mask: u64) -> u32 {
    BitKernel::active().popcount(mask)
}

/// Number of set bits across all words of a wide mask.
///
/// Each word is counted on its own and the counts are summed.
pub fn popcount_wide(mask: &[u64]) -> u32 {
    let kernel = BitKernel::active();
    mask.iter().map(|&w| kernel.popcount(w)).sum()
}

/// Checks that `mask` is non-zero and selects at most `budget` bits.
///
/// Returns the population count of the mask.
///
/// # Errors
///
/// - [`EntropyError::InvalidMask`] for an all-zero mask
/// - [`EntropyError::MaskTooWide`] when the count exceeds `budget`
pub fn validate_mask(mask: &[u64], budget: u32) -> EntropyResult<u32> {
    let count = popcount_wide(mask);
    if count == 0 {
        return Err(EntropyError::InvalidMask);
    }
    if count > budget {
        return Err(EntropyError::MaskTooWide {
            popcount: count,
            budget,
        });
    }
    Ok(count)
}

/// Position of the lowest set bit of a multi-word value, or `None` if every
/// word is zero.
///
/// Words are scanned from least significant upwards. An all-zero word has a
/// trailing-zero count of 64; that count is carried into the scan of the
/// next word, so offsets accumulate across word boundaries.
///
/// # Examples
///
/// ```rust
/// use entropy_core::bits::next_set_position;
///
/// assert_eq!(next_set_position(&[0, 0b100]), Some(66));
/// assert_eq!(next_set_position(&[0, 0]), None);
/// ```
pub fn next_set_position(words: &[u64]) -> Option<u32> {
    let mut offset = 0u32;
    for &word in words {
        let zeros = word.trailing_zeros();
        offset += zeros;
        if zeros < 64 {
            return Some(offset);
        }
    }
    None
}

/// Gathers the bits of `value` at the positions set in `mask` into a
/// contiguous low-order result, lowest set mask bit to result bit 0.
///
/// # Errors
///
/// [`EntropyError::InvalidMask`] when `mask` is zero.
#[inline]
pub fn parallel_bit_extract(value: u64, mask: u64) -> EntropyResult<u64> {
    validate_mask(&[mask], 64)?;
    Ok(BitKernel::active().extract(value, mask))
}

/// Distributes the low `popcount(mask)` bits of `bits` into the positions
/// set in `mask`, lowest first.
///
/// # Errors
///
/// [`EntropyError::InvalidMask`] when `mask` is zero.
#[inline]
pub fn parallel_bit_scatter(bits: u64, mask: u64) -> EntropyResult<u64> {
    validate_mask(&[mask], 64)?;
    Ok(BitKernel::active().scatter(bits, mask))
}

/// Parallel bit extract over a multi-word value and mask.
///
/// The selected bits of word 0 land lowest in the result, followed by
/// those of word 1, and so on.
///
/// # Errors
///
/// [`EntropyError::InvalidMask`] when `mask` is zero.
pub fn extract_wide<const N: usize>(value: &Wide<N>, mask: &Wide<N>) -> EntropyResult<Wide<N>> {
    validate_mask(mask.words(), Wide::<N>::BITS)?;
    let kernel = BitKernel::active();
    let mut out = Wide::ZERO;
    let mut offset = 0u32;
    for (&v, &m) in value.words().iter().zip(mask.words()) {
        if m == 0 {
            continue;
        }
        let count = kernel.popcount(m);
        out.or_bits_at(offset, kernel.extract(v, m), count);
        offset += count;
    }
    Ok(out)
}

/// Scatters the low `popcount(mask)` bits of `bits` into the positions set
/// in a multi-word mask.
///
/// Positions are located with [`next_set_position`] on a working copy of
/// the mask; each placed position is cleared from the copy so the next bit
/// goes to the next free position. Positions outside the mask stay zero.
///
/// # Errors
///
/// - [`EntropyError::InvalidMask`] when `mask` is zero
/// - [`EntropyError::MaskTooWide`] when `mask` selects more than 64 bits
pub fn scatter_wide<const N: usize>(bits: u64, mask: &Wide<N>) -> EntropyResult<Wide<N>> {
    validate_mask(mask.words(), 64)?;
    let mut working = *mask;
    let mut out = Wide::ZERO;
    let mut consumed = 0u32;
    while let Some(pos) = next_set_position(working.words()) {
        if (bits >> consumed) & 1 == 1 {
            out.set_bit(pos);
        }
        working.clear_bit(pos);
        consumed += 1;
    }
    Ok(out)
}
