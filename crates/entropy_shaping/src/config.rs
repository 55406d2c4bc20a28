//! Shaping configuration
//!
//! Loaded from environment variables, a TOML file, or both, with the
//! precedence environment > file > defaults.
//!
//! | Field | Env var | Default |
//! |---|---|---|
//! | `bit_strategy` | `ENTROPY_BIT_STRATEGY` | `auto` |
//! | `gaussian_method` | `ENTROPY_GAUSSIAN_METHOD` | `ziggurat` |
//! | `log_level` | `ENTROPY_LOG_LEVEL` | `info` |
//! | `seed` | `ENTROPY_SEED` | none |

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use entropy_core::bits::BitKernel;
use entropy_core::source::{OsEntropySource, StdSource};
use entropy_core::RandomWordSource;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::sampler::GaussianMethod;

const ENV_BIT_STRATEGY: &str = "ENTROPY_BIT_STRATEGY";
const ENV_GAUSSIAN_METHOD: &str = "ENTROPY_GAUSSIAN_METHOD";
const ENV_LOG_LEVEL: &str = "ENTROPY_LOG_LEVEL";
const ENV_SEED: &str = "ENTROPY_SEED";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown bit strategy name.
    #[error("Invalid bit strategy: {0}. Must be one of: auto, portable, hardware")]
    InvalidBitStrategy(String),

    /// Unknown Gaussian method name.
    #[error("Invalid gaussian method: {0}. Must be one of: box_muller, polar, ziggurat")]
    InvalidGaussianMethod(String),

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Seed is not an unsigned 64-bit integer.
    #[error("Invalid seed: {0}. Must be an unsigned 64-bit integer")]
    InvalidSeed(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted by [`init_tracing`](crate::telemetry::init_tracing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-stream construction.
    Trace,
    /// Kernel selection, table construction, configuration loading.
    Debug,
    /// Default.
    #[default]
    Info,
    /// Fallbacks such as a missing hardware bit kernel.
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Which bit-manipulation kernel to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitStrategy {
    /// The process-wide kernel chosen by runtime detection.
    #[default]
    Auto,
    /// Always the portable kernel.
    Portable,
    /// The hardware kernel, falling back to portable when unsupported.
    Hardware,
}

impl FromStr for BitStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(BitStrategy::Auto),
            "portable" | "software" => Ok(BitStrategy::Portable),
            "hardware" | "hw" => Ok(BitStrategy::Hardware),
            _ => Err(ConfigError::InvalidBitStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for BitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitStrategy::Auto => write!(f, "auto"),
            BitStrategy::Portable => write!(f, "portable"),
            BitStrategy::Hardware => write!(f, "hardware"),
        }
    }
}

/// Shaping configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Bit-manipulation kernel selection
    pub bit_strategy: BitStrategy,
    /// Algorithm behind `NonUniformSampler::gaussian`
    pub gaussian_method: GaussianMethod,
    /// Log level
    pub log_level: LogLevel,
    /// Seed for reproducible sources; `None` means seed from the OS
    pub seed: Option<u64>,
}

impl ShapingConfig {
    /// Create a new ShapingConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ShapingConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Every field is an enum or an optional integer, so a parsed config is
    /// always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Resolve the bit strategy into a kernel.
    pub fn bit_kernel(&self) -> BitKernel {
        match self.bit_strategy {
            BitStrategy::Auto => *BitKernel::active(),
            BitStrategy::Portable => BitKernel::PORTABLE,
            BitStrategy::Hardware => BitKernel::hardware().unwrap_or_else(|| {
                warn!("hardware bit kernel unavailable, using portable kernel");
                BitKernel::PORTABLE
            }),
        }
    }

    /// Makes the configured kernel the process-wide one used by every
    /// shaper and returns the kernel in effect.
    ///
    /// Call before the first shaping operation; afterwards the kernel that
    /// was already selected stays (see [`BitKernel::install`]).
    pub fn install_bit_kernel(&self) -> &'static BitKernel {
        BitKernel::install(self.bit_kernel())
    }

    /// A word source for this configuration: a [`StdSource`] seeded with
    /// `seed`, or the OS generator when no seed is set.
    pub fn source(&self) -> Box<dyn RandomWordSource> {
        match self.seed {
            Some(seed) => {
                debug!(seed, "seeded source");
                Box::new(StdSource::from_seed(seed))
            }
            None => {
                debug!("os entropy source");
                Box::new(OsEntropySource::new())
            }
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(ENV_BIT_STRATEGY) {
            self.bit_strategy = BitStrategy::from_str(&value)?;
        }
        if let Ok(value) = std::env::var(ENV_GAUSSIAN_METHOD) {
            self.gaussian_method = GaussianMethod::from_str(&value)
                .map_err(|_| ConfigError::InvalidGaussianMethod(value.clone()))?;
        }
        if let Ok(value) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&value)?;
        }
        if let Ok(value) = std::env::var(ENV_SEED) {
            self.seed = Some(parse_seed(&value)?);
        }
        Ok(())
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal seed.
fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidSeed(value.to_string()))
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Config file
/// 3. Default values
pub fn build_config(config_file: Option<&Path>) -> Result<ShapingConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => ShapingConfig::from_file(path)?,
        None => ShapingConfig::default(),
    };

    config.apply_env()?;
    config.validate()?;

    debug!(
        bit_strategy = %config.bit_strategy,
        gaussian_method = %config.gaussian_method,
        log_level = %config.log_level,
        seed = ?config.seed,
        "configuration resolved"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShapingConfig::default();
        assert_eq!(config.bit_strategy, BitStrategy::Auto);
        assert_eq!(config.gaussian_method, GaussianMethod::Ziggurat);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_bit_strategy_parsing() {
        assert_eq!(BitStrategy::from_str("auto").unwrap(), BitStrategy::Auto);
        assert_eq!(BitStrategy::from_str("Portable").unwrap(), BitStrategy::Portable);
        assert_eq!(BitStrategy::from_str("software").unwrap(), BitStrategy::Portable);
        assert_eq!(BitStrategy::from_str("HW").unwrap(), BitStrategy::Hardware);
        assert!(matches!(
            BitStrategy::from_str("gpu"),
            Err(ConfigError::InvalidBitStrategy(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LogLevel::Warn), "warn");
        assert_eq!(format!("{}", BitStrategy::Hardware), "hardware");
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 1_000 ").unwrap(), 1000);
        assert_eq!(parse_seed("0xDEAD_BEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed("18446744073709551615").unwrap(), u64::MAX);
        assert!(matches!(parse_seed("-1"), Err(ConfigError::InvalidSeed(_))));
        assert!(parse_seed("18446744073709551616").is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            bit_strategy = "portable"
            gaussian_method = "box_muller"
            log_level = "debug"
            seed = 12345
        "#;

        let config = ShapingConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.bit_strategy, BitStrategy::Portable);
        assert_eq!(config.gaussian_method, GaussianMethod::BoxMuller);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.seed, Some(12345));
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config = ShapingConfig::from_toml_str("gaussian_method = \"polar\"").unwrap();
        // Should use defaults for unspecified fields
        assert_eq!(config.gaussian_method, GaussianMethod::Polar);
        assert_eq!(config.bit_strategy, BitStrategy::Auto);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_invalid_toml_value() {
        let err = ShapingConfig::from_toml_str("bit_strategy = \"quantum\"").unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "entropy_shaping_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "log_level = \"trace\"\nseed = 7\n").unwrap();
        let config = ShapingConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.seed, Some(7));

        let missing = ShapingConfig::from_file(&path).unwrap_err();
        assert!(missing.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_bit_kernel_resolution() {
        let portable = ShapingConfig {
            bit_strategy: BitStrategy::Portable,
            ..Default::default()
        };
        assert_eq!(portable.bit_kernel(), BitKernel::PORTABLE);

        let auto = ShapingConfig::default();
        assert_eq!(auto.bit_kernel(), *BitKernel::active());

        // Either the real hardware kernel or the portable fallback; both
        // must agree with the portable kernel on every input.
        let hardware = ShapingConfig {
            bit_strategy: BitStrategy::Hardware,
            ..Default::default()
        }
        .bit_kernel();
        assert_eq!(hardware.extract(0b1011, 0b1010), 0b11);
        assert_eq!(hardware.scatter(0b11, 0b1010), 0b1010);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let config = ShapingConfig {
            seed: Some(12345),
            ..Default::default()
        };
        let mut configured = config.source();
        let mut direct = StdSource::from_seed(12345);
        for _ in 0..8 {
            assert_eq!(configured.next_word(), direct.next_word());
        }

        let mut again = config.source();
        let mut other = ShapingConfig {
            seed: Some(54321),
            ..Default::default()
        }
        .source();
        let first = again.next_word();
        assert_ne!(first, other.next_word());
    }

    #[test]
    fn test_unseeded_source_uses_os() {
        let mut source = ShapingConfig::default().source();
        let words: Vec<u64> = (0..4).map(|_| source.next_word()).collect();
        assert!(words.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_build_config_env_overrides_file() {
        std::env::remove_var(ENV_BIT_STRATEGY);
        std::env::remove_var(ENV_LOG_LEVEL);
        std::env::remove_var(ENV_SEED);
        std::env::set_var(ENV_GAUSSIAN_METHOD, "polar");

        let path = std::env::temp_dir().join(format!(
            "entropy_shaping_build_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "gaussian_method = \"box_muller\"\nseed = 3\n").unwrap();
        let config = build_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        std::env::remove_var(ENV_GAUSSIAN_METHOD);

        let config = config.unwrap();
        assert_eq!(config.gaussian_method, GaussianMethod::Polar);
        assert_eq!(config.seed, Some(3));
        assert_eq!(build_config(None).unwrap(), ShapingConfig::default());
        assert_eq!(ShapingConfig::from_env().unwrap(), ShapingConfig::default());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));

        let err = ConfigError::InvalidSeed("x".to_string());
        assert!(err.to_string().contains("Invalid seed"));

        let err = ConfigError::InvalidGaussianMethod("x".to_string());
        assert!(err.to_string().contains("ziggurat"));
    }
}
