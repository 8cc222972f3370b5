#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use defuse_cli::args::CliArgs;
use defuse_cli::{driver, reporter::Reporter, tracing_config};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    tracing_config::init_tracing(args.verbose);

    let result = driver::run(&args)?;

    // Dropped files are reported but never fail the batch.
    if !result.diagnostics.is_empty() {
        let reporter = Reporter::new(std::io::stderr().is_terminal());
        eprint!("{}", reporter.render(&result.diagnostics));
    }
    Ok(())
}
