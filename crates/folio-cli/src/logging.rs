use folio_config::LoggingConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Filter precedence: `RUST_LOG`, then the command line, then the config file
pub fn env_filter(requested: Option<LogLevel>, config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    match requested {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from(level).into()),
        None => EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init(requested: Option<LogLevel>, config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(requested, config))
        .with_writer(std::io::stderr)
        .init();
}
