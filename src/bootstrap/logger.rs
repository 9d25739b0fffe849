//! tracing-subscriber setup for the server.
//!
//! Output goes to stderr so stdout stays free for the startup summary.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where the requested level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    /// `-v` flags on the command line. Beats `RUST_LOG`.
    Cli,
    /// `log_level` from config (or `PETIT_PROF_LOG_LEVEL`). `RUST_LOG` wins when set.
    Config,
}

/// Build the filter for `level`, which may be a plain level (`"debug"`) or a
/// full directive list (`"petit_prof=debug,tower_http=info"`).
pub fn build_filter(level: &str, source: LevelSource) -> Result<EnvFilter, AppError> {
    let from_level = || {
        EnvFilter::try_new(level)
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
    };

    match source {
        LevelSource::Cli => from_level(),
        LevelSource::Config => match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => from_level(),
        },
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(level: &str, source: LevelSource) -> Result<(), AppError> {
    let filter = build_filter(level, source)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(source == LevelSource::Cli)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_levels_and_directives_build() {
        for l in ["warn", "info", "debug", "petit_prof=debug,tower_http=info"] {
            assert!(build_filter(l, LevelSource::Cli).is_ok(), "expected '{l}' to build");
        }
    }

    #[test]
    fn garbage_cli_level_is_rejected() {
        let err = build_filter("petit_prof=loud", LevelSource::Cli).unwrap_err();
        assert!(matches!(err, AppError::Logger(ref m) if m.contains("petit_prof=loud")));
    }

    #[test]
    fn init_twice_reports_subscriber_error() {
        let _ = init("info", LevelSource::Cli);
        match init("info", LevelSource::Cli) {
            Err(AppError::Logger(msg)) => assert!(msg.contains("set subscriber")),
            other => panic!("expected logger error, got {other:?}"),
        }
    }
}
