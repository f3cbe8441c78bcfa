//! # Plotsight command-line entry point
//!
//! ```bash
//! plotsight columns data.csv
//! plotsight analyze data.csv --columns price,weight,colour --plots heatmap,count --theme light
//! plotsight analyze data.csv --json > result.json
//! ```
//!
//! Logging goes to the console and, unless `--no-log-file` is passed, to
//! daily-rotating files in the platform data directory. `RUST_LOG` overrides
//! the default `info` level.

#![expect(clippy::print_stdout)] // The CLI reports results on stdout.

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_log_file {
        plotsight::logging::init_console()?;
    } else {
        plotsight::logging::init()?;
    }

    cli::run_command(cli.command)
}
