//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the default log level from the verbose flag
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` always wins over the configured default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

const DEFAULT_FILTER: &str = "argon_proxy=info,tower_http=info";
const VERBOSE_FILTER: &str = "argon_proxy=debug,tower_http=debug";

/// Default filter directives for a configuration.
pub fn default_filter(config: &ObservabilityConfig) -> &'static str {
    if config.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_level() {
        let quiet = ObservabilityConfig { verbose: false };
        let verbose = ObservabilityConfig { verbose: true };
        assert!(default_filter(&quiet).contains("argon_proxy=info"));
        assert!(default_filter(&verbose).contains("argon_proxy=debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(&ObservabilityConfig::default());
        init(&ObservabilityConfig::default());
    }
}
