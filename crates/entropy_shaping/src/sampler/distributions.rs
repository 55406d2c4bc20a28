//! `rand_distr` adapters so the samplers plug into any `rand::Rng`.

use entropy_core::{EntropyError, EntropyResult, RandomWordSource};
use rand::{Rng, RngCore};
use rand_distr::Distribution;

use super::ZigguratTables;
use crate::float::f64_from_word;

/// Borrowed `RngCore` seen as a word source.
struct RngWords<'a, R: ?Sized>(&'a mut R);

impl<R: RngCore + ?Sized> RandomWordSource for RngWords<'_, R> {
    fn seed(&mut self, _value: u64) {}

    fn next_word(&mut self) -> u64 {
        self.0.next_u64()
    }
}

/// Standard normal distribution sampled with the shared Ziggurat tables.
///
/// # Examples
///
/// ```rust
/// use entropy_shaping::sampler::StandardGaussian;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use rand_distr::Distribution;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let z: f64 = StandardGaussian.sample(&mut rng);
/// assert!(z.is_finite());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardGaussian;

impl Distribution<f64> for StandardGaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        ZigguratTables::global().sample(&mut RngWords(rng))
    }
}

/// Exponential distribution by inverse transform, `-ln(1 - u) / rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseExponential {
    rate: f64,
}

impl InverseExponential {
    /// Distribution with rate `rate`.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidParameter`] unless `rate` is positive and
    /// finite.
    pub fn new(rate: f64) -> EntropyResult<Self> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(EntropyError::InvalidParameter {
                name: "rate",
                value: rate.to_string(),
            });
        }
        Ok(Self { rate })
    }

    /// The rate parameter.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Distribution<f64> for InverseExponential {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = f64_from_word(rng.next_u64());
        -(1.0 - u).ln() / self.rate
    }
}
