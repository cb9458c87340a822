//! CLI entrypoint for `value-synth`.
//!
//! Loads declaration files, synthesizes them as one batch, and writes the
//! resulting emission plans. Diagnostics for failed schemas go to stderr;
//! the exit status is non-zero when any schema failed, after every
//! successful plan has been written.

mod cli;
mod config;
mod error;
mod input;
mod logging;
mod output;

use std::io::Write;

use clap::Parser;
use tracing::info;
use value_synth::{Diagnostic, Synthesizer};

use crate::cli::Args;
use crate::error::CliError;

fn main() -> Result<(), CliError> {
    run()
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    logging::init(args.is_verbose)?;

    let config = config::load(&args)?;
    let declarations = input::load_all(&args.inputs)?;
    let report = Synthesizer::new(config).synthesize_all(&declarations);
    info!(
        plans = report.plans.len(),
        failures = report.failures.len(),
        "batch synthesized"
    );

    let pretty = args.should_pretty_print;
    args.out_dir.as_deref().map_or_else(
        || output::print_all(&mut std::io::stdout().lock(), &report.plans, pretty),
        |out_dir| output::write_plans(out_dir, &report.plans, pretty).map(drop),
    )?;

    report_diagnostics(&report.diagnostics())?;
    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::SchemasFailed {
            count: report.failures.len(),
        })
    }
}

fn report_diagnostics(diagnostics: &[Diagnostic]) -> Result<(), CliError> {
    let mut err = std::io::stderr().lock();
    for diagnostic in diagnostics {
        writeln!(err, "error: {}: {}", diagnostic.schema, diagnostic.message).map_err(|source| {
            CliError::Io {
                path: "<stderr>".into(),
                source,
            }
        })?;
    }
    Ok(())
}
