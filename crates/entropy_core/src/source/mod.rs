//! # Uniform Word Sources
//!
//! The [`RandomWordSource`] contract is the only thing the shaping layer
//! assumes about a base generator: it can be (re-)seeded and it yields
//! independent, uniformly distributed 64-bit words.
//!
//! Concrete generator families live outside this workspace. The sources in
//! this module are references that make the shaping layer usable on its own:
//!
//! - [`SplitMix64`]: small deterministic generator
//! - [`SequenceSource`]: replays a fixed word sequence (deterministic tests)
//! - [`RandSource`]: any `rand` generator as a word source
//! - [`SourceRng`]: any word source as a `rand::RngCore`
//! - [`OsEntropySource`]: operating-system CSPRNG
//! - [`HardwareEntropySource`]: x86_64 `RDRAND` / `RDSEED`
//!
//! ## Usage Example
//!
//! ```rust
//! use entropy_core::source::{RandomWordSource, SplitMix64};
//!
//! let mut source = SplitMix64::new(42);
//! let first = source.next_word();
//!
//! source.seed(42);
//! assert_eq!(source.next_word(), first);
//! ```

mod hardware;
mod os;
mod rand_adapter;
mod sequence;
mod splitmix;

pub use hardware::{HardwareEntropySource, HardwareInstruction};
pub use os::OsEntropySource;
pub use rand_adapter::{RandSource, SourceRng, StdSource};
pub use sequence::SequenceSource;
pub use splitmix::{splitmix64_mix, SplitMix64};

/// A generator of independent, uniformly distributed 64-bit words.
///
/// Implementations are single-owner and not reentrant: every call mutates
/// internal state without synchronisation.
///
/// The trait is object safe, so a catalog of structurally unrelated
/// generators can be driven through `Box<dyn RandomWordSource>`.
pub trait RandomWordSource {
    /// (Re-)initialises internal state from `value`.
    ///
    /// The first word produced afterwards is not assumed to equal `value`.
    fn seed(&mut self, value: u64);

    /// Advances internal state and returns one uniformly distributed word.
    fn next_word(&mut self) -> u64;
}

impl<S: RandomWordSource + ?Sized> RandomWordSource for &mut S {
    #[inline]
    fn seed(&mut self, value: u64) {
        (**self).seed(value)
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        (**self).next_word()
    }
}

impl<S: RandomWordSource + ?Sized> RandomWordSource for Box<S> {
    #[inline]
    fn seed(&mut self, value: u64) {
        (**self).seed(value)
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        (**self).next_word()
    }
}
