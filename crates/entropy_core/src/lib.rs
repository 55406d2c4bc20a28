//! # entropy_core: Foundation for Uniform Random Stream Shaping
//!
//! ## Layer 1 (Foundation) Role
//!
//! entropy_core is the bottom layer of the workspace, providing:
//! - The word-source contract: `RandomWordSource` (`source`)
//! - Reference sources: SplitMix64, fixed sequences, `rand` adapters, OS and
//!   on-chip entropy (`source`)
//! - Bit math: population count, trailing-zero position chaining, parallel
//!   bit extract/scatter over 64- to 512-bit masks (`bits`)
//! - Hash and block-cipher contracts with reference primitives (`primitives`)
//! - Error types: `EntropyError` (`error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other entropy_* crates, with minimal
//! external dependencies:
//! - thiserror: Error derivation
//! - rand: Adapters and the OS entropy backend
//! - tracing: One-off diagnostics (kernel selection, hardware probing)
//!
//! ## Concurrency
//!
//! Every source and stream is single-owner and not reentrant. The only
//! process-wide state is the selected [`bits::BitKernel`], which is
//! immutable once chosen.
//!
//! ## Usage Examples
//!
//! ```rust
//! use entropy_core::bits::parallel_bit_extract;
//! use entropy_core::source::{RandomWordSource, SplitMix64};
//!
//! let mut source = SplitMix64::new(2024);
//! let word = source.next_word();
//!
//! // Keep the bits at even positions of the low byte.
//! let packed = parallel_bit_extract(word, 0b0101_0101).unwrap();
//! assert!(packed < 16);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bits;
pub mod error;
pub mod primitives;
pub mod source;

pub use error::{EntropyError, EntropyResult};
pub use source::RandomWordSource;
