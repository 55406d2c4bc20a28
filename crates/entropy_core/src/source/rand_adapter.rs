//! Adapters between [`RandomWordSource`] and the `rand` ecosystem.
//!
//! This module provides [`RandSource`], which lets any seedable `rand`
//! generator act as a word source, and [`SourceRng`], which goes the other
//! way so that word sources can drive `rand` / `rand_distr` samplers.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::RandomWordSource;

/// A word source backed by a seedable `rand` generator.
///
/// The seed used for the most recent initialisation is recorded, which
/// helps when reproducing a run from logs.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::{RandomWordSource, StdSource};
///
/// let mut a = StdSource::from_seed(12345);
/// let mut b = StdSource::from_seed(12345);
///
/// // Same seed produces identical sequences
/// assert_eq!(a.next_word(), b.next_word());
/// assert_eq!(a.seed_value(), 12345);
/// ```
#[derive(Debug, Clone)]
pub struct RandSource<R> {
    /// The underlying generator.
    inner: R,
    /// The seed used for initialisation.
    seed: u64,
}

/// [`RandSource`] over `rand`'s standard generator.
pub type StdSource = RandSource<StdRng>;

impl<R: RngCore + SeedableRng> RandSource<R> {
    /// Creates a source initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: R::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for the most recent initialisation.
    #[inline]
    pub fn seed_value(&self) -> u64 {
        self.seed
    }

    /// Consumes the adapter, returning the wrapped generator.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: RngCore + SeedableRng> RandomWordSource for RandSource<R> {
    fn seed(&mut self, value: u64) {
        self.inner = R::seed_from_u64(value);
        self.seed = value;
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// Exposes a [`RandomWordSource`] as a `rand::RngCore`.
///
/// `next_u32` keeps the high half of a word; bytes are filled little-endian,
/// one word per eight bytes.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::{SourceRng, SplitMix64};
/// use rand::Rng;
///
/// let mut rng = SourceRng::new(SplitMix64::new(1));
/// let x: f64 = rng.gen();
/// assert!((0.0..1.0).contains(&x));
/// ```
#[derive(Debug, Clone)]
pub struct SourceRng<S> {
    source: S,
}

impl<S: RandomWordSource> SourceRng<S> {
    /// Wraps `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Consumes the adapter, returning the wrapped source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: RandomWordSource> RngCore for SourceRng<S> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.source.next_word() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.source.next_word()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.source.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
