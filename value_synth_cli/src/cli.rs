//! Command-line interface definitions for `value-synth`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parsed CLI arguments for `value-synth`.
#[derive(Debug, Parser)]
#[command(name = "value-synth")]
#[command(about = "Synthesize builder emission plans from value-type declarations")]
#[command(version)]
pub struct Args {
    /// Configuration file; `value-synth.toml` in the working directory is
    /// used when present and this is not given.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Write one `<Builder>.plan.json` per schema here instead of printing a
    /// JSON array to stdout.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Pretty-print the emitted JSON.
    #[arg(long = "pretty")]
    pub should_pretty_print: bool,
    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(short = 'v', long = "verbose")]
    pub is_verbose: bool,
    /// Largest arity of the positional key/value map setters.
    #[arg(long, value_name = "n")]
    pub max_map_pairs: Option<u8>,
    /// Declaration files (`.json` or `.toml`), each holding one declaration
    /// or a `declarations` list.
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<Utf8PathBuf>,
}
