//! # entropy_shaping: Shaping Uniform Word Streams
//!
//! ## Layer 2 Role
//!
//! entropy_shaping turns the 64-bit words of any
//! [`RandomWordSource`](entropy_core::RandomWordSource) into the values
//! callers actually need:
//! - Narrower outputs: truncation, shifts, masks, sponge folding and
//!   multi-round construction (`narrow`)
//! - Wider outputs: concatenation, mix expansion, bit spreading and
//!   unbounded Feistel, hash and cipher byte streams (`widen`)
//! - Bias-free integers in `[0, m)` (`range`)
//! - Uniform `f32`/`f64` in `[0, 1)` by mantissa packing (`float`)
//! - Gaussian and exponential variates, including a 128-layer Ziggurat
//!   and `rand_distr` adapters (`sampler`)
//!
//! Ambient pieces:
//! - `config`: `ShapingConfig` from environment and TOML
//! - `telemetry`: `tracing-subscriber` bootstrap
//!
//! ## Ownership
//!
//! Every shaper owns its source and is single-threaded. To drive several
//! shapers from one source, wrap `&mut source`: the word-source contract
//! is implemented for mutable references.
//!
//! ## Usage Examples
//!
//! ```rust
//! use entropy_core::source::SplitMix64;
//! use entropy_shaping::narrow::Narrower;
//! use entropy_shaping::range::RangeReducer;
//! use entropy_shaping::sampler::NonUniformSampler;
//!
//! let mut source = SplitMix64::new(42);
//!
//! let byte = Narrower::new(&mut source).sponge(8).unwrap();
//! let card = RangeReducer::new(&mut source).modulo_rejection(52).unwrap();
//! let z = NonUniformSampler::new(&mut source).gaussian();
//!
//! assert!(byte < 256 && card < 52 && z.is_finite());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod float;
pub mod narrow;
pub mod range;
pub mod sampler;
pub mod telemetry;
pub mod widen;

pub use config::{build_config, ConfigError, ShapingConfig};
pub use float::FloatConverter;
pub use narrow::Narrower;
pub use range::RangeReducer;
pub use sampler::{GaussianMethod, NonUniformSampler};
pub use widen::Widener;
