//! ## ecsctl-telemetry::logging
//! Structured logging with `tracing`.
//!
//! `RUST_LOG` takes precedence over the filter passed to [`init`], so an
//! operator can always turn on `debug` output for a single run.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the caller supply one.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter: `RUST_LOG` first, then `fallback`, then [`DEFAULT_FILTER`].
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean. Later calls are no-ops.
pub fn init(filter: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(filter))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn fallback_applies_without_rust_log() {
        // `RUST_LOG` may be set by whoever runs the tests.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter("warn").to_string(), "warn");
        }
    }

    #[traced_test]
    #[test]
    fn events_reach_the_subscriber() {
        tracing::info!(path = "config.yml", "saved configuration");
        assert!(logs_contain("saved configuration"));
    }
}
