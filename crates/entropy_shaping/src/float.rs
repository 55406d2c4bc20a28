//! Uniform floating-point values from source words.
//!
//! Values are built by packing the high bits of a word into the mantissa of
//! a float in `[1, 2)` and subtracting one. Every result is an exact
//! multiple of `2^-52` (`2^-23` for `f32`), so the outputs are evenly spaced
//! and no rounding from integer-to-float division is involved.

use entropy_core::RandomWordSource;

const F64_ONE_BITS: u64 = 0x3FF0_0000_0000_0000;
const F32_ONE_BITS: u32 = 0x3F80_0000;

/// Maps the top 52 bits of `word` to an `f64` in `[0, 1)`.
///
/// # Examples
///
/// ```rust
/// use entropy_shaping::float::f64_from_word;
///
/// assert_eq!(f64_from_word(0), 0.0);
/// assert_eq!(f64_from_word(1 << 63), 0.5);
/// assert!(f64_from_word(u64::MAX) < 1.0);
/// ```
#[inline]
pub fn f64_from_word(word: u64) -> f64 {
    f64::from_bits((word >> 12) | F64_ONE_BITS) - 1.0
}

/// Maps the top 23 bits of `word` to an `f32` in `[0, 1)`.
#[inline]
pub fn f32_from_word(word: u64) -> f32 {
    f32::from_bits(((word >> 41) as u32) | F32_ONE_BITS) - 1.0
}

/// Converts source words into uniform floats.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::SplitMix64;
/// use entropy_shaping::float::FloatConverter;
///
/// let mut floats = FloatConverter::new(SplitMix64::new(42));
/// let u = floats.next_f64();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[derive(Debug, Clone)]
pub struct FloatConverter<S> {
    source: S,
}

impl<S: RandomWordSource> FloatConverter<S> {
    /// Wraps `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the converter, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64_from_word(self.source.next_word())
    }

    /// Uniform `f32` in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        f32_from_word(self.source.next_word())
    }

    /// Uniform `f64` in `(0, 1]`, safe to pass to `ln`.
    #[inline]
    pub fn next_f64_open(&mut self) -> f64 {
        1.0 - self.next_f64()
    }

    /// Uniform `f64` in `[-1, 1)` as `2u - 1`.
    #[inline]
    pub fn next_signed_f64(&mut self) -> f64 {
        2.0 * self.next_f64() - 1.0
    }

    /// Fills `buffer` with uniform values in `[0, 1)`.
    pub fn fill_f64(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_f64();
        }
    }
}
