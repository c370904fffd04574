//! Debug switch and tracing setup for the `benjis` binary
//!
//! # Environment Variables
//!
//! - `BENJIS_DEBUG=1` - Raise the log level to `debug`
//! - `RUST_LOG` - Standard `tracing-subscriber` filter directives

use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Cached debug enabled state (checked once at startup)
static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if debug mode is enabled through `BENJIS_DEBUG`
#[inline]
pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| debug_flag_value(std::env::var("BENJIS_DEBUG").ok().as_deref()))
}

fn debug_flag_value(value: Option<&str>) -> bool {
    value
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Level used when `RUST_LOG` is unset or empty
pub fn default_level(debug: bool) -> Level {
    if debug || is_debug_enabled() {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Builds the env filter from `RUST_LOG`, falling back to the default level.
pub fn env_filter(debug: bool) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    env_filter_from(debug, &directives)
}

fn env_filter_from(debug: bool, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level(debug)).into())
        .parse_lossy(directives)
}
