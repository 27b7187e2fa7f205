//! Binary entry point for stencil.
//!
//! Parses the arguments, runs the render job, and turns any failure into a
//! message on stderr and a non-zero exit status. Usage errors exit with 2
//! (clap's convention), everything else with 1.

mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use console::style;
use stencil_render::RenderError;

use crate::cli::{normalize_legacy_flags, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, cli.verbose);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let job = cli.job();
    tracing::debug!(?job, "starting");
    let summary = job.run()?;
    tracing::debug!(
        bytes = summary.bytes_written,
        keys = summary.value_keys,
        "done"
    );
    Ok(())
}

fn report(err: &anyhow::Error, verbose: bool) {
    eprintln!("{} {:#}", style("error:").for_stderr().red().bold(), err);

    // MiniJinja can point at the offending template line.
    if verbose {
        if let Some(engine_err) = err
            .downcast_ref::<RenderError>()
            .and_then(RenderError::template_error)
        {
            eprintln!("{}", engine_err.display_debug_info());
        }
    }
}
