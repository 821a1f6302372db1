//! Structured logging with environment variable configuration.
//!
//! Logs are written to stderr so they never mix with query results on stdout.

use tracing_subscriber::EnvFilter;

use super::Settings;

fn filter_from_settings(settings: &Settings) -> EnvFilter {
    EnvFilter::new(settings.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on settings.
///
/// If a global subscriber is already set, this function silently ignores
/// the error. The first subscriber wins.
pub fn init_logging(settings: &Settings) {
    let filter = filter_from_settings(settings);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LogLevel;

    #[test]
    fn init_logging_is_idempotent() {
        let settings = Settings::default();
        init_logging(&settings);
        init_logging(&settings);
    }

    #[test]
    fn filter_uses_configured_log_level() {
        let settings = Settings::default().with_log_level(LogLevel::Trace);
        let filter = filter_from_settings(&settings);
        assert_eq!(filter.to_string(), "trace");
    }
}
