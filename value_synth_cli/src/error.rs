//! Error types for `value-synth`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `value-synth` pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A JSON input did not hold a declaration.
    #[error("failed to parse {path} as JSON: {source}")]
    Json {
        /// Offending input.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// A TOML input did not hold a declaration.
    #[error("failed to parse {path} as TOML: {source}")]
    Toml {
        /// Offending input.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// The input's extension names no supported format.
    #[error("unsupported input {0}: expected a .json or .toml file")]
    UnsupportedInput(Utf8PathBuf),

    /// An explicitly requested configuration file is absent.
    #[error("configuration file {0} does not exist")]
    MissingConfig(Utf8PathBuf),

    /// The layered configuration did not extract.
    #[error("invalid configuration: {0}")]
    Config(Box<figment::Error>),

    /// Plans could not be serialised.
    #[error("failed to serialise plans: {0}")]
    Serialise(#[from] serde_json::Error),

    /// The log subscriber could not be installed.
    #[error("failed to install the log subscriber: {0}")]
    Logging(String),

    /// At least one schema failed; successful plans were still written.
    #[error("{count} schema(s) failed to synthesize")]
    SchemasFailed {
        /// Number of failed schemas.
        count: usize,
    },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
