//! SplitMix64 reference generator.

use super::RandomWordSource;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// The SplitMix64 output finaliser applied to `x + GOLDEN_GAMMA`.
///
/// A bijection on `u64` with full avalanche; also used as the chained
/// mixing step of the mix-expansion widener.
#[inline]
pub fn splitmix64_mix(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// SplitMix64 generator (Steele, Lea & Flood, 2014).
///
/// Weyl-sequence state with the [`splitmix64_mix`] finaliser. Cheap and
/// well distributed; not cryptographically secure.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::{RandomWordSource, SplitMix64};
///
/// let mut a = SplitMix64::new(12345);
/// let mut b = SplitMix64::new(12345);
/// assert_eq!(a.next_word(), b.next_word());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator seeded with `seed`.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomWordSource for SplitMix64 {
    #[inline]
    fn seed(&mut self, value: u64) {
        self.state = value;
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let out = splitmix64_mix(self.state);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        out
    }
}
