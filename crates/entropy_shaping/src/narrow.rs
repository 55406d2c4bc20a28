//! Narrowing: deriving outputs of fewer than 64 bits from one source word.
//!
//! This module provides [`Narrower`], which offers truncation, shifting,
//! mask extraction, XOR-fold sponging and multi-round construction, plus
//! the pure word-slicing helpers [`slice_2`], [`slice_4`] and [`slice_8`].

use entropy_core::bits::{low_mask, validate_mask, BitKernel};
use entropy_core::{EntropyError, EntropyResult, RandomWordSource};

/// Largest bit count accepted by the narrowing operations.
pub const MAX_NARROW_BITS: u32 = 63;

/// Derives narrow values from a word source.
///
/// Every operation draws exactly one word, except [`construct`](Self::construct)
/// which draws one word per round. Arguments are validated before drawing.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::SequenceSource;
/// use entropy_shaping::narrow::Narrower;
///
/// let mut narrower = Narrower::new(SequenceSource::constant(u64::MAX));
/// assert_eq!(narrower.truncate(1).unwrap(), 1);
/// assert_eq!(narrower.shift(4).unwrap(), 0xF);
/// ```
#[derive(Debug, Clone)]
pub struct Narrower<S> {
    source: S,
}

impl<S: RandomWordSource> Narrower<S> {
    /// Wraps `source`. Pass `&mut source` to borrow instead of move.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the narrower, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Low `n` bits of one word.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidBitCount`] unless `1 <= n <= 63`.
    pub fn truncate(&mut self, n: u32) -> EntropyResult<u64> {
        check_bits(n)?;
        Ok(self.source.next_word() & low_mask(n))
    }

    /// High `n` bits of one word.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidBitCount`] unless `1 <= n <= 63`.
    pub fn shift(&mut self, n: u32) -> EntropyResult<u64> {
        check_bits(n)?;
        Ok(self.source.next_word() >> (64 - n))
    }

    /// Gathers the bits at the positions set in `mask` into a `width`-bit
    /// result.
    ///
    /// # Errors
    ///
    /// - [`EntropyError::InvalidBitCount`] unless `1 <= width <= 63`
    /// - [`EntropyError::InvalidMask`] for a zero mask
    /// - [`EntropyError::MaskTooWide`] when `mask` selects more than `width` bits
    pub fn mask_extract(&mut self, mask: u64, width: u32) -> EntropyResult<u64> {
        check_bits(width)?;
        validate_mask(&[mask], width)?;
        Ok(BitKernel::active().extract(self.source.next_word(), mask))
    }

    /// 8-bit mask extraction.
    pub fn extract_u8(&mut self, mask: u64) -> EntropyResult<u8> {
        self.mask_extract(mask, 8).map(|v| v as u8)
    }

    /// 16-bit mask extraction.
    pub fn extract_u16(&mut self, mask: u64) -> EntropyResult<u16> {
        self.mask_extract(mask, 16).map(|v| v as u16)
    }

    /// 32-bit mask extraction.
    pub fn extract_u32(&mut self, mask: u64) -> EntropyResult<u32> {
        self.mask_extract(mask, 32).map(|v| v as u32)
    }

    /// 63-bit mask extraction.
    pub fn extract_u63(&mut self, mask: u64) -> EntropyResult<u64> {
        self.mask_extract(mask, 63)
    }

    /// XOR-folds one word in half repeatedly until `width` bits remain.
    ///
    /// Every source bit influences every output bit, so non-uniformity in
    /// the low bits of a weak source is not passed through as truncation
    /// would.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidBitCount`] unless `width` is a power of two
    /// no larger than 32.
    pub fn sponge(&mut self, width: u32) -> EntropyResult<u64> {
        if !width.is_power_of_two() || width > 32 {
            return Err(EntropyError::InvalidBitCount {
                bits: width,
                reason: "sponge width must be a power of two in [1, 32]",
            });
        }
        Ok(sponge_fold(self.source.next_word(), width))
    }

    /// Builds a `total_bits`-wide value from repeated mask extractions.
    ///
    /// Runs `total_bits / popcount(mask)` rounds; each round shifts the
    /// accumulator left by `popcount(mask)` and ORs in the bits extracted
    /// from a fresh word. The first round ends up in the highest bits.
    ///
    /// # Errors
    ///
    /// - [`EntropyError::InvalidMask`] for a zero mask
    /// - [`EntropyError::InvalidBitCount`] when `total_bits` is zero, above
    ///   64, or not a multiple of `popcount(mask)`
    /// - [`EntropyError::MaskTooWide`] when `popcount(mask) > total_bits`
    pub fn construct(&mut self, total_bits: u32, mask: u64) -> EntropyResult<u64> {
        let per_round = validate_mask(&[mask], 64)?;
        if total_bits == 0 || total_bits > 64 {
            return Err(EntropyError::InvalidBitCount {
                bits: total_bits,
                reason: "total bits must be in [1, 64]",
            });
        }
        if per_round > total_bits {
            return Err(EntropyError::MaskTooWide {
                popcount: per_round,
                budget: total_bits,
            });
        }
        if total_bits % per_round != 0 {
            return Err(EntropyError::InvalidBitCount {
                bits: total_bits,
                reason: "total bits must be a multiple of the mask population count",
            });
        }

        let kernel = BitKernel::active();
        let mut result = 0u64;
        for _ in 0..total_bits / per_round {
            let bits = kernel.extract(self.source.next_word(), mask);
            result = result.checked_shl(per_round).unwrap_or(0) | bits;
        }
        Ok(result)
    }

    /// High 32 bits of one word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.source.next_word() >> 32) as u32
    }

    /// High 16 bits of one word.
    #[inline]
    pub fn next_u16(&mut self) -> u16 {
        (self.source.next_word() >> 48) as u16
    }

    /// High 8 bits of one word.
    #[inline]
    pub fn next_u8(&mut self) -> u8 {
        (self.source.next_word() >> 56) as u8
    }

    /// Top bit of one word.
    #[inline]
    pub fn next_bool(&mut self) -> bool {
        self.source.next_word() >> 63 == 1
    }

    /// One word as two 32-bit parts.
    pub fn next_slice_2(&mut self) -> [u32; 2] {
        slice_2(self.source.next_word())
    }

    /// One word as four 16-bit parts.
    pub fn next_slice_4(&mut self) -> [u16; 4] {
        slice_4(self.source.next_word())
    }

    /// One word as eight 8-bit parts.
    pub fn next_slice_8(&mut self) -> [u8; 8] {
        slice_8(self.source.next_word())
    }
}

fn check_bits(n: u32) -> EntropyResult<()> {
    if n == 0 || n > MAX_NARROW_BITS {
        return Err(EntropyError::InvalidBitCount {
            bits: n,
            reason: "must be in [1, 63]",
        });
    }
    Ok(())
}

/// XOR-folds `word` down to `width` bits (64 -> 32 -> ... -> `width`).
///
/// `width` is expected to be a power of two no larger than 64.
pub fn sponge_fold(word: u64, width: u32) -> u64 {
    let mut folded = word;
    let mut current = 64;
    while current > width {
        current /= 2;
        folded = (folded >> current) ^ (folded & low_mask(current));
    }
    folded
}

/// Splits a word into two 32-bit parts, low part first.
#[inline]
pub fn slice_2(value: u64) -> [u32; 2] {
    [value as u32, (value >> 32) as u32]
}

/// Splits a word into four 16-bit parts, low part first.
#[inline]
pub fn slice_4(value: u64) -> [u16; 4] {
    std::array::from_fn(|i| (value >> (16 * i)) as u16)
}

/// Splits a word into eight 8-bit parts, low part first.
#[inline]
pub fn slice_8(value: u64) -> [u8; 8] {
    std::array::from_fn(|i| (value >> (8 * i)) as u8)
}
