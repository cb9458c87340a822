//! Log subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Installs a `fmt` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, defaulting to `warn`; `verbose` forces
/// `debug`.
pub fn init(is_verbose: bool) -> Result<(), CliError> {
    let filter = if is_verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}
