//! `figment::Jail` helpers for configuration layering tests.
//!
//! A jail gives each test a private working directory and environment, so the
//! file and `VALUE_SYNTH_` layers can be set up without leaking between tests.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] and returns its output.
///
/// # Errors
///
/// Returns an error when the jail cannot be set up or `f` fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Runs `f` in a jail whose working directory holds `value-synth.toml` with
/// `contents`.
///
/// # Errors
///
/// Returns an error when the file cannot be written or `f` fails.
pub fn with_config_file<F, T>(contents: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    with_jail(|jail| {
        jail.create_file("value-synth.toml", contents)?;
        f(jail)
    })
}

/// Converts any displayable error into a [`figment::Error`] so it can cross a
/// jail closure.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over owned errors from `map_err`"
)]
pub fn jail_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
