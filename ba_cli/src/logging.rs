//! Structured logging configuration.
//!
//! Log lines go to stderr so that stdout only carries command output.
//! Records emitted through the `log` facade by the library are forwarded
//! to the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a given number of `-v` flags
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug,hyper=info,reqwest=info",
    }
}

/// Initialize logging.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
///
/// # Example
///
/// ```no_run
/// use ba_cli::logging;
///
/// logging::init(1);
/// tracing::info!("Client starting");
/// ```
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbosity > 1)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log how long a subcommand took
///
/// # Arguments
///
/// * `command` - Subcommand name
/// * `duration_ms` - Duration in milliseconds
/// * `success` - Whether the command completed without error
pub fn log_command(command: &str, duration_ms: u64, success: bool) {
    if success {
        tracing::debug!(command = command, duration_ms = duration_ms, "Command completed");
    } else {
        tracing::warn!(command = command, duration_ms = duration_ms, "Command failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert!(default_filter(2).starts_with("debug"));
        assert!(default_filter(7).starts_with("debug"));
    }

    #[test]
    fn test_log_command() {
        // Just ensure it doesn't panic without a subscriber
        log_command("list", 120, true);
        log_command("delete", 4000, false);
    }
}
