//! Logging for the command-line front end. Logs go to stderr so that stdout only carries
//! results.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// `--log-level` wins over `RUST_LOG`, which wins over the default.
fn filter_from(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Installs the global subscriber. A subscriber that is already set stays in place.
pub fn init_logging(log_level: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from(log_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
