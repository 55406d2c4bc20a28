//! Operating-system CSPRNG as a word source.

use rand::rngs::OsRng;
use rand::RngCore;

use super::RandomWordSource;

/// Draws words from the operating system's cryptographic generator
/// (`getrandom(2)`, `BCryptGenRandom`, `SecRandomCopyBytes`, ...).
///
/// Seeding has no effect: the kernel owns the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropySource;

impl OsEntropySource {
    /// Creates a handle to the OS generator.
    pub fn new() -> Self {
        Self
    }
}

impl RandomWordSource for OsEntropySource {
    fn seed(&mut self, _value: u64) {}

    #[inline]
    fn next_word(&mut self) -> u64 {
        OsRng.next_u64()
    }
}
