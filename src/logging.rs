//! Diagnostic logging setup
//!
//! Events go to stderr; stdout carries workflow commands only.

use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Filter variable, e.g. `INFISICAL_AUTH_LOG=infisical_auth=debug`
pub const LOG_ENV_VAR: &str = "INFISICAL_AUTH_LOG";

/// Install the global subscriber. A second call is a no-op.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
