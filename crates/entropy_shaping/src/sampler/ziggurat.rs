//! 128-layer Ziggurat tables and sampler for the standard normal.
//!
//! Tables follow Doornik's ZIGNOR construction:
//!
//! Jurgen A. Doornik. 2005. An Improved Ziggurat Method to Generate Normal Random Samples. University of Oxford.
//!
//! Layer 0 is the bottom box together with the tail, layer 1 starts at
//! `R`, and widths shrink with the layer index up to the apex
//! (`width[128] == 0`).

use std::sync::OnceLock;

use entropy_core::RandomWordSource;
use tracing::debug;

use crate::float::FloatConverter;
use crate::range::RangeReducer;

/// Number of layers.
pub const LAYERS: usize = 128;

/// Start of the tail.
pub const TAIL_START: f64 = 3.442619855899;

/// Area of every layer (and of the bottom box plus tail).
pub const LAYER_AREA: f64 = 9.91256303526217e-3;

static TABLES: OnceLock<ZigguratTables> = OnceLock::new();

/// Precomputed layer geometry, shared read-only by every sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct ZigguratTables {
    widths: [f64; LAYERS + 1],
    ratios: [f64; LAYERS],
}

impl ZigguratTables {
    /// Process-wide tables, computed on first use.
    pub fn global() -> &'static ZigguratTables {
        TABLES.get_or_init(|| {
            let tables = Self::compute();
            debug!(
                layers = LAYERS,
                bottom_width = tables.widths[0],
                "ziggurat tables computed"
            );
            tables
        })
    }

    /// Evaluates the layer recurrence.
    pub fn compute() -> Self {
        let mut widths = [0.0; LAYERS + 1];
        let mut density = (-0.5 * TAIL_START * TAIL_START).exp();

        widths[0] = LAYER_AREA / density;
        widths[1] = TAIL_START;
        for i in 2..LAYERS {
            widths[i] = (-2.0 * (LAYER_AREA / widths[i - 1] + density).ln()).sqrt();
            density = (-0.5 * widths[i] * widths[i]).exp();
        }
        widths[LAYERS] = 0.0;

        let mut ratios = [0.0; LAYERS];
        for (i, ratio) in ratios.iter_mut().enumerate() {
            *ratio = widths[i + 1] / widths[i];
        }
        Self { widths, ratios }
    }

    /// Widths of layers `0..128`.
    pub fn layer_widths(&self) -> &[f64] {
        &self.widths[..LAYERS]
    }

    /// `width[i + 1] / width[i]` for layers `0..128`; the last entry is zero.
    pub fn height_ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Width at `index` in `0..=128`.
    pub fn width(&self, index: usize) -> f64 {
        self.widths[index]
    }

    /// Draws one standard normal value.
    ///
    /// Each attempt draws the layer with `modulo_rejection(128)` and then a
    /// signed uniform `u`. Most attempts end in the rectangular accept;
    /// the rest go to the tail (layer 0) or the wedge test.
    pub fn sample<S: RandomWordSource + ?Sized>(&self, source: &mut S) -> f64 {
        loop {
            // A power-of-two modulus never fails and never rejects.
            let layer = RangeReducer::new(&mut *source)
                .modulo_rejection(LAYERS as u64)
                .unwrap_or_default() as usize;
            let u = FloatConverter::new(&mut *source).next_signed_f64();
            let x = u * self.widths[layer];

            if u.abs() < self.ratios[layer] {
                return x;
            }
            if layer == 0 {
                return self.sample_tail(source, u < 0.0);
            }

            let x_sq = x * x;
            let f0 = (-0.5 * (self.widths[layer] * self.widths[layer] - x_sq)).exp();
            let f1 = (-0.5 * (self.widths[layer + 1] * self.widths[layer + 1] - x_sq)).exp();
            let u3 = FloatConverter::new(&mut *source).next_f64();
            if f1 + u3 * (f0 - f1) < 1.0 {
                return x;
            }
        }
    }

    fn sample_tail<S: RandomWordSource + ?Sized>(&self, source: &mut S, negative: bool) -> f64 {
        let mut floats = FloatConverter::new(source);
        loop {
            let x = -floats.next_f64_open().ln() / TAIL_START;
            let y = -floats.next_f64_open().ln();
            if 2.0 * y >= x * x {
                let value = TAIL_START + x;
                return if negative { -value } else { value };
            }
        }
    }
}
