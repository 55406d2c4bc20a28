//! A configuration driving a whole shaping pipeline.
//!
//! Kept as a single test in its own binary: installing the bit kernel is a
//! process-wide, first-wins selection.

use entropy_core::bits::BitKernel;
use entropy_core::source::StdSource;
use entropy_shaping::config::BitStrategy;
use entropy_shaping::narrow::Narrower;
use entropy_shaping::sampler::{GaussianMethod, NonUniformSampler};
use entropy_shaping::ShapingConfig;

#[test]
fn test_config_selects_kernel_source_and_method() {
    let config = ShapingConfig::from_toml_str(
        r#"
            bit_strategy = "portable"
            gaussian_method = "polar"
            seed = 2024
        "#,
    )
    .unwrap();
    assert_eq!(config.bit_strategy, BitStrategy::Portable);

    let kernel = config.install_bit_kernel();
    assert_eq!(*kernel, BitKernel::PORTABLE);
    assert_eq!(*BitKernel::active(), BitKernel::PORTABLE);
    assert!(!BitKernel::active().is_hardware());

    // Shapers go through the installed kernel.
    let mut narrower = Narrower::new(config.source());
    let mut expected = Narrower::new(StdSource::from_seed(2024));
    for _ in 0..16 {
        assert_eq!(
            narrower.mask_extract(0xF0F0_0000_FFFF_0001, 25).unwrap(),
            expected.mask_extract(0xF0F0_0000_FFFF_0001, 25).unwrap()
        );
    }

    let mut sampler = NonUniformSampler::from_config(config.source(), &config);
    assert_eq!(sampler.method(), GaussianMethod::Polar);
    let mut direct =
        NonUniformSampler::with_method(StdSource::from_seed(2024), GaussianMethod::Polar);
    for _ in 0..32 {
        assert_eq!(sampler.gaussian(), direct.gaussian());
    }
}
