//! Configuration layering.
//!
//! Sources are merged lowest to highest: built-in defaults, the TOML file
//! (`--config`, else `value-synth.toml` in the working directory), variables
//! prefixed `VALUE_SYNTH_`, then command-line flags.


use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use tracing::debug;
use value_synth::SynthesisConfig;

use crate::cli::Args;
use crate::error::CliError;

/// File consulted when `--config` is not given.
pub const CONFIG_FILE: &str = "value-synth.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "VALUE_SYNTH_";

/// Settings a flag can override; unset flags leave lower layers alone.
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_map_pairs: Option<u8>,
}

impl From<&Args> for FlagOverrides {
    fn from(args: &Args) -> Self {
        Self {
            max_map_pairs: args.max_map_pairs,
        }
    }
}

fn read_optional(path: &Utf8Path, is_required: bool) -> Result<Option<String>, CliError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if is_required {
                Err(CliError::MissingConfig(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(err) => Err(CliError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Loads the layered configuration for one run.
pub fn load(args: &Args) -> Result<SynthesisConfig, CliError> {
    let file = args.config.as_deref().map_or_else(
        || read_optional(Utf8Path::new(CONFIG_FILE), false),
        |path| read_optional(path, true),
    )?;
    let mut figment = Figment::from(Serialized::defaults(SynthesisConfig::default()));
    if let Some(contents) = file {
        debug!("merging configuration file");
        figment = figment.merge(Toml::string(&contents));
    }
    let config: SynthesisConfig = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(FlagOverrides::from(args)))
        .extract()?;
    debug!(max_map_pairs = config.max_map_pairs, "configuration loaded");
    Ok(config)
}
