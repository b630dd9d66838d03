use tracing_subscriber::EnvFilter;

use crate::ags4::tools::error::{Result, ToolError};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "AGS4_LOG";

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// console output or reports. A non-zero `verbosity` overrides [`LOG_ENV`].
pub fn init(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}
