//! Unit tests for NonUniformSampler.

use super::*;
use approx::assert_relative_eq;
use entropy_core::source::{SequenceSource, SplitMix64};

const THREE_QUARTERS: u64 = 0xC000_0000_0000_0000;
const HALF: u64 = 1 << 63;

fn scripted(words: Vec<u64>) -> NonUniformSampler<SequenceSource> {
    NonUniformSampler::new(SequenceSource::new(words).unwrap())
}

fn moments(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|z| (z - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

// ========================================
// Exponential
// ========================================

#[test]
fn test_exponential_inverse_transform() {
    let mut s = scripted(vec![HALF]);
    assert_relative_eq!(s.exponential(2.0).unwrap(), std::f64::consts::LN_2 / 2.0);

    let mut s = scripted(vec![0]);
    assert_eq!(s.exponential(1.0).unwrap(), 0.0);

    // The largest uniform still gives a finite value.
    let mut s = scripted(vec![u64::MAX]);
    assert!(s.exponential(1.0).unwrap().is_finite());
}

#[test]
fn test_exponential_rejects_bad_rate() {
    let mut s = scripted(vec![HALF]);
    for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            s.exponential(rate),
            Err(EntropyError::InvalidParameter { name: "rate", .. })
        ));
    }
    assert_eq!(s.source_mut().draws(), 0);
}

// ========================================
// Box-Muller
// ========================================

#[test]
fn test_box_muller_log_x_form() {
    // x = 0.5, y = 0 -> (sqrt(-2 ln 0.5), 0).
    let mut s = scripted(vec![THREE_QUARTERS, HALF]);
    let (a, b) = s.box_muller();
    assert_relative_eq!(a, 1.177_410_022_515_474_6, max_relative = 1e-12);
    assert_relative_eq!(b, 0.0);
}

#[test]
fn test_box_muller_nan_for_non_positive_x() {
    // Word 0 gives x = -1; the ln(x) form is undefined there.
    let mut s = scripted(vec![0, HALF]);
    let (a, b) = s.box_muller();
    assert!(a.is_nan());
    assert!(b.is_nan());
}

#[test]
fn test_box_muller_standard_is_finite() {
    let mut s = scripted(vec![u64::MAX, 0]);
    let (a, b) = s.box_muller_standard();
    assert!(a.is_finite() && b.is_finite());

    let mut s = NonUniformSampler::new(SplitMix64::new(5));
    let samples: Vec<f64> = (0..50_000)
        .flat_map(|_| {
            let (a, b) = s.box_muller_standard();
            [a, b]
        })
        .collect();
    let (mean, var) = moments(&samples);
    assert_relative_eq!(mean, 0.0, epsilon = 0.02);
    assert_relative_eq!(var, 1.0, epsilon = 0.03);
}

// ========================================
// Marsaglia polar
// ========================================

#[test]
fn test_polar_rejects_outside_unit_disc() {
    // (-1, -1) has s = 2 and is redrawn; (0.5, 0) is accepted.
    let mut s = scripted(vec![0, 0, THREE_QUARTERS, HALF]);
    let (a, b) = s.polar();
    let mult = (-2.0 * 0.25f64.ln() / 0.25).sqrt();
    assert_relative_eq!(mult, 3.330_218_444_199_917, max_relative = 1e-12);
    assert_relative_eq!(a, 0.5 * mult);
    assert_relative_eq!(b, 0.0);
    assert_eq!(s.source_mut().draws(), 4);
}

#[test]
fn test_polar_rejects_origin() {
    // Word 1 << 63 maps to 0, so s = 0 must be redrawn.
    let mut s = scripted(vec![HALF, HALF, THREE_QUARTERS, HALF]);
    let (a, _) = s.polar();
    assert!(a > 0.0);
    assert_eq!(s.source_mut().draws(), 4);
}

#[test]
fn test_polar_moments() {
    let mut s = NonUniformSampler::with_method(SplitMix64::new(17), GaussianMethod::Polar);
    let mut samples = vec![0.0; 100_000];
    s.fill_gaussian(&mut samples);
    let (mean, var) = moments(&samples);
    assert_relative_eq!(mean, 0.0, epsilon = 0.02);
    assert_relative_eq!(var, 1.0, epsilon = 0.03);
}

// ========================================
// Ziggurat and dispatch
// ========================================

#[test]
fn test_ziggurat_deterministic_sequence() {
    // Layer 5 and layer 9 accept in the rectangle; layer 127 has a zero
    // ratio and is accepted by the wedge test with u3 close to 1.
    let words = vec![
        5,
        THREE_QUARTERS,
        9,
        HALF,
        0x7F,
        0x4000_0000_0000_0000,
        u64::MAX,
    ];
    let tables = ZigguratTables::global();

    let mut s = scripted(words);
    assert_eq!(s.ziggurat(), 0.5 * tables.width(5));
    assert_eq!(s.ziggurat(), 0.0);
    assert_eq!(s.ziggurat(), -0.5 * tables.width(127));
    assert_eq!(s.source_mut().draws(), 7);
}

#[test]
fn test_ziggurat_moments() {
    let mut s = NonUniformSampler::new(SplitMix64::new(99));
    let samples: Vec<f64> = (0..200_000).map(|_| s.ziggurat()).collect();
    let (mean, var) = moments(&samples);
    assert_relative_eq!(mean, 0.0, epsilon = 0.015);
    assert_relative_eq!(var, 1.0, epsilon = 0.02);

    let beyond_two = samples.iter().filter(|z| z.abs() > 2.0).count() as f64;
    assert_relative_eq!(beyond_two / samples.len() as f64, 0.0455, epsilon = 0.003);
}

#[test]
fn test_gaussian_uses_spare() {
    let mut s = NonUniformSampler::with_method(
        SequenceSource::new(vec![THREE_QUARTERS, HALF]).unwrap(),
        GaussianMethod::BoxMuller,
    );
    let first = s.gaussian();
    let second = s.gaussian();
    assert_relative_eq!(first, 1.177_410_022_515_474_6, max_relative = 1e-12);
    assert_relative_eq!(second, 0.0);
    assert_eq!(s.source_mut().draws(), 2);
}

#[test]
fn test_set_method_drops_spare() {
    let mut s = NonUniformSampler::with_method(
        SequenceSource::new(vec![THREE_QUARTERS, HALF]).unwrap(),
        GaussianMethod::BoxMuller,
    );
    s.gaussian();
    s.set_method(GaussianMethod::Ziggurat);
    assert_eq!(s.method(), GaussianMethod::Ziggurat);
    s.gaussian();
    assert_eq!(s.source_mut().draws(), 4);
}

#[test]
fn test_from_config_uses_configured_method() {
    let config = ShapingConfig {
        gaussian_method: GaussianMethod::BoxMuller,
        ..Default::default()
    };
    let mut s = NonUniformSampler::from_config(
        SequenceSource::new(vec![THREE_QUARTERS, HALF]).unwrap(),
        &config,
    );
    assert_eq!(s.method(), GaussianMethod::BoxMuller);
    assert_relative_eq!(s.gaussian(), 1.177_410_022_515_474_6, max_relative = 1e-12);
    assert_eq!(s.source_mut().draws(), 2);

    let s = NonUniformSampler::from_config(SplitMix64::new(1), &ShapingConfig::default());
    assert_eq!(s.method(), GaussianMethod::Ziggurat);
}

#[test]
fn test_normal_scaling() {
    let mut a = NonUniformSampler::new(SplitMix64::new(8));
    let mut b = NonUniformSampler::new(SplitMix64::new(8));
    let z = a.gaussian();
    assert_relative_eq!(b.normal(10.0, 3.0).unwrap(), 10.0 + 3.0 * z);
    assert_eq!(b.normal(4.0, 0.0).unwrap(), 4.0);
}

#[test]
fn test_normal_rejects_bad_parameters() {
    let mut s = scripted(vec![1]);
    assert!(matches!(
        s.normal(0.0, -1.0),
        Err(EntropyError::InvalidParameter { name: "std_dev", .. })
    ));
    assert!(matches!(
        s.normal(f64::NAN, 1.0),
        Err(EntropyError::InvalidParameter { name: "mean", .. })
    ));
    assert!(s.normal(0.0, f64::INFINITY).is_err());
    assert_eq!(s.source_mut().draws(), 0);
}

#[test]
fn test_method_parsing() {
    assert_eq!("ziggurat".parse::<GaussianMethod>().unwrap(), GaussianMethod::Ziggurat);
    assert_eq!("Box-Muller".parse::<GaussianMethod>().unwrap(), GaussianMethod::BoxMuller);
    assert_eq!("POLAR".parse::<GaussianMethod>().unwrap(), GaussianMethod::Polar);
    assert!("cauchy".parse::<GaussianMethod>().is_err());
    assert_eq!(GaussianMethod::default(), GaussianMethod::Ziggurat);
    assert_eq!(GaussianMethod::BoxMuller.to_string(), "box_muller");
}
