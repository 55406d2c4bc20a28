//! Range reduction: mapping words onto `[0, m)`.
//!
//! Four strategies with different bias/cost trade-offs:
//!
//! | Method | Bias | Source draws |
//! |---|---|---|
//! | [`modulo`](RangeReducer::modulo) | biased unless `m` divides 2^64 | 1 |
//! | [`rejection`](RangeReducer::rejection) | none | geometric, `2^64 / m` expected |
//! | [`masked_rejection`](RangeReducer::masked_rejection) | none | < 2 expected |
//! | [`modulo_rejection`](RangeReducer::modulo_rejection) | none | < 2 expected |

use entropy_core::{EntropyError, EntropyResult, RandomWordSource};

/// Reduces source words to a bounded range.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::SplitMix64;
/// use entropy_shaping::range::RangeReducer;
///
/// let mut reducer = RangeReducer::new(SplitMix64::new(7));
/// let die = reducer.modulo_rejection(6).unwrap() + 1;
/// assert!((1..=6).contains(&die));
/// ```
#[derive(Debug, Clone)]
pub struct RangeReducer<S> {
    source: S,
}

impl<S: RandomWordSource> RangeReducer<S> {
    /// Wraps `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the reducer, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// `word % m`.
    ///
    /// Biased toward small residues whenever `m` does not divide 2^64; kept
    /// as a fast path for callers that accept that.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidModulus`] when `m == 0`.
    pub fn modulo(&mut self, m: u64) -> EntropyResult<u64> {
        check_modulus(m)?;
        Ok(self.source.next_word() % m)
    }

    /// Draws until a word falls below `m`.
    ///
    /// Unbiased. The loop is unbounded: with a 64-bit source the expected
    /// number of draws is `2^64 / m`, which only makes sense for `m` close to
    /// the full word range.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidModulus`] when `m == 0`.
    pub fn rejection(&mut self, m: u64) -> EntropyResult<u64> {
        check_modulus(m)?;
        loop {
            let word = self.source.next_word();
            if word < m {
                return Ok(word);
            }
        }
    }

    /// Rejection on words masked down to the smallest power of two that
    /// covers `m`.
    ///
    /// Unbiased, with a rejection probability below one half for any `m`.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidModulus`] when `m == 0`.
    pub fn masked_rejection(&mut self, m: u64) -> EntropyResult<u64> {
        check_modulus(m)?;
        let mask = if m == 1 {
            0
        } else {
            u64::MAX >> (m - 1).leading_zeros()
        };
        loop {
            let candidate = self.source.next_word() & mask;
            if candidate < m {
                return Ok(candidate);
            }
        }
    }

    /// Modulo with rejection of the incomplete final block.
    ///
    /// Words at or above `u64::MAX - (u64::MAX % m)` are redrawn, the rest
    /// are reduced modulo `m`. A power-of-two `m` takes a direct masking path
    /// with exactly one draw.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidModulus`] when `m == 0`.
    pub fn modulo_rejection(&mut self, m: u64) -> EntropyResult<u64> {
        check_modulus(m)?;
        if m.is_power_of_two() {
            return Ok(self.source.next_word() & (m - 1));
        }
        let threshold = rejection_threshold(m);
        loop {
            let word = self.source.next_word();
            if word < threshold {
                return Ok(word % m);
            }
        }
    }

    /// Uniform integer in `[low, high)` via [`modulo_rejection`](Self::modulo_rejection).
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidModulus`] when `high <= low`.
    pub fn in_range(&mut self, low: u64, high: u64) -> EntropyResult<u64> {
        if high <= low {
            return Err(EntropyError::InvalidModulus);
        }
        Ok(low + self.modulo_rejection(high - low)?)
    }
}

/// Upper bound (exclusive) of the words [`RangeReducer::modulo_rejection`]
/// accepts for a non-zero `m`: the largest multiple of `m` not above
/// `u64::MAX`.
#[inline]
pub fn rejection_threshold(m: u64) -> u64 {
    u64::MAX - (u64::MAX % m)
}

fn check_modulus(m: u64) -> EntropyResult<()> {
    if m == 0 {
        return Err(EntropyError::InvalidModulus);
    }
    Ok(())
}
