//! Tracing bootstrap for binaries and tests that embed the shaping layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogLevel;

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used. Returns `false`
/// when a global subscriber was already installed, in which case nothing
/// changes.
///
/// # Examples
///
/// ```rust
/// use entropy_shaping::config::LogLevel;
/// use entropy_shaping::telemetry::init_tracing;
///
/// init_tracing(LogLevel::Warn);
/// assert!(!init_tracing(LogLevel::Debug));
/// ```
pub fn init_tracing(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
