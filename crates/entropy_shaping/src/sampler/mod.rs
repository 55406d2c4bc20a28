//! # Non-uniform sampling
//!
//! Gaussian and exponential variates built on [`FloatConverter`] (and, for
//! the Ziggurat, [`RangeReducer`](crate::range::RangeReducer)):
//!
//! | Method | Draws per value | Notes |
//! |---|---|---|
//! | [`exponential`](NonUniformSampler::exponential) | 1 | inverse transform |
//! | [`box_muller`](NonUniformSampler::box_muller) | 2 per pair | `ln(x)` form, NaN for `x <= 0` |
//! | [`box_muller_standard`](NonUniformSampler::box_muller_standard) | 2 per pair | textbook form |
//! | [`polar`](NonUniformSampler::polar) | ~2.55 per pair | Marsaglia, rejects ~21.5% |
//! | [`ziggurat`](NonUniformSampler::ziggurat) | ~2.03 | 128 layers, shared tables |
//!
//! Rejection loops are part of the algorithms and carry no iteration cap.

mod distributions;
mod ziggurat;

#[cfg(test)]
mod tests;

pub use distributions::{InverseExponential, StandardGaussian};
pub use ziggurat::{ZigguratTables, LAYERS, LAYER_AREA, TAIL_START};

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use entropy_core::{EntropyError, EntropyResult, RandomWordSource};
use serde::Deserialize;

use crate::config::ShapingConfig;
use crate::float::FloatConverter;

/// Gaussian algorithm used by [`NonUniformSampler::gaussian`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaussianMethod {
    /// [`NonUniformSampler::box_muller`].
    BoxMuller,
    /// [`NonUniformSampler::polar`].
    Polar,
    /// [`NonUniformSampler::ziggurat`].
    #[default]
    Ziggurat,
}

impl GaussianMethod {
    /// Lowercase name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            GaussianMethod::BoxMuller => "box_muller",
            GaussianMethod::Polar => "polar",
            GaussianMethod::Ziggurat => "ziggurat",
        }
    }
}

impl FromStr for GaussianMethod {
    type Err = EntropyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "box_muller" => Ok(GaussianMethod::BoxMuller),
            "polar" => Ok(GaussianMethod::Polar),
            "ziggurat" => Ok(GaussianMethod::Ziggurat),
            _ => Err(EntropyError::InvalidParameter {
                name: "gaussian_method",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GaussianMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draws Gaussian and exponential variates from a word source.
///
/// Pair-producing methods return both values; [`gaussian`](Self::gaussian)
/// hands out the second one on the next call instead of drawing again.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::SplitMix64;
/// use entropy_shaping::sampler::{GaussianMethod, NonUniformSampler};
///
/// let mut sampler = NonUniformSampler::new(SplitMix64::new(3));
/// let z = sampler.gaussian();
/// assert!(z.is_finite());
///
/// let mut polar = NonUniformSampler::with_method(SplitMix64::new(3), GaussianMethod::Polar);
/// let wait = polar.exponential(2.0).unwrap();
/// assert!(wait >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct NonUniformSampler<S> {
    floats: FloatConverter<S>,
    method: GaussianMethod,
    spare: Option<f64>,
}

impl<S: RandomWordSource> NonUniformSampler<S> {
    /// Sampler using the default method (Ziggurat).
    pub fn new(source: S) -> Self {
        Self::with_method(source, GaussianMethod::default())
    }

    /// Sampler using `method` for [`gaussian`](Self::gaussian).
    pub fn with_method(source: S, method: GaussianMethod) -> Self {
        Self {
            floats: FloatConverter::new(source),
            method,
            spare: None,
        }
    }

    /// Sampler using the configured `gaussian_method`.
    pub fn from_config(source: S, config: &ShapingConfig) -> Self {
        Self::with_method(source, config.gaussian_method)
    }

    /// Selected Gaussian method.
    pub fn method(&self) -> GaussianMethod {
        self.method
    }

    /// Switches the Gaussian method, discarding any cached spare value.
    pub fn set_method(&mut self, method: GaussianMethod) {
        self.method = method;
        self.spare = None;
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        self.floats.source_mut()
    }

    /// Consumes the sampler, returning the source.
    pub fn into_inner(self) -> S {
        self.floats.into_inner()
    }

    /// Exponential variate with rate `rate`: `-ln(1 - u) / rate`.
    ///
    /// `u` lies in `[0, 1)`, so the logarithm is always finite.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidParameter`] when `rate` is not a positive
    /// finite number.
    pub fn exponential(&mut self, rate: f64) -> EntropyResult<f64> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(EntropyError::InvalidParameter {
                name: "rate",
                value: rate.to_string(),
            });
        }
        let u = self.floats.next_f64();
        Ok(-(1.0 - u).ln() / rate)
    }

    /// Box-Muller pair from `x = 2u - 1`, `y = 2v - 1`:
    /// `r = sqrt(-2 ln x)`, `theta = 2 pi y`, `(r cos theta, r sin theta)`.
    ///
    /// This is the `ln(x)` variant, not the textbook form: for `x <= 0`
    /// (half of all draws) both values are NaN. Use
    /// [`box_muller_standard`](Self::box_muller_standard) for a
    /// well-defined pair.
    pub fn box_muller(&mut self) -> (f64, f64) {
        let x = self.floats.next_signed_f64();
        let y = self.floats.next_signed_f64();
        let r = (-2.0 * x.ln()).sqrt();
        let theta = TAU * y;
        (r * theta.cos(), r * theta.sin())
    }

    /// Textbook Box-Muller pair: `r = sqrt(-2 ln u1)` with `u1` in `(0, 1]`,
    /// `theta = 2 pi u2`. Always finite.
    pub fn box_muller_standard(&mut self) -> (f64, f64) {
        let u1 = self.floats.next_f64_open();
        let u2 = self.floats.next_f64();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = TAU * u2;
        (r * theta.cos(), r * theta.sin())
    }

    /// Marsaglia polar pair.
    ///
    /// Redraws `(x, y)` in `[-1, 1)^2` until `s = x^2 + y^2` lies in
    /// `(0, 1)`, then scales both by `sqrt(-2 ln s / s)`.
    pub fn polar(&mut self) -> (f64, f64) {
        loop {
            let x = self.floats.next_signed_f64();
            let y = self.floats.next_signed_f64();
            let s = x * x + y * y;
            if s > 0.0 && s < 1.0 {
                let mult = (-2.0 * s.ln() / s).sqrt();
                return (x * mult, y * mult);
            }
        }
    }

    /// Standard normal value from the shared 128-layer Ziggurat.
    pub fn ziggurat(&mut self) -> f64 {
        ZigguratTables::global().sample(self.floats.source_mut())
    }

    /// Standard normal value using the selected method.
    pub fn gaussian(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }
        let (first, second) = match self.method {
            GaussianMethod::Ziggurat => return self.ziggurat(),
            GaussianMethod::BoxMuller => self.box_muller(),
            GaussianMethod::Polar => self.polar(),
        };
        self.spare = Some(second);
        first
    }

    /// `mean + std_dev * gaussian()`.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidParameter`] when `mean` is not finite or
    /// `std_dev` is negative or not finite.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> EntropyResult<f64> {
        if !mean.is_finite() {
            return Err(EntropyError::InvalidParameter {
                name: "mean",
                value: mean.to_string(),
            });
        }
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(EntropyError::InvalidParameter {
                name: "std_dev",
                value: std_dev.to_string(),
            });
        }
        Ok(mean + std_dev * self.gaussian())
    }

    /// Fills `buffer` with [`gaussian`](Self::gaussian) values.
    pub fn fill_gaussian(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.gaussian();
        }
    }
}
