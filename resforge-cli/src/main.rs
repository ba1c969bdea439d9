//! resforge CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use resforge::observability;
use resforge_cli_lib::{GenerateCommand, InspectCommand, LogFormatArg};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "resforge")]
#[command(version)]
#[command(
    about = "Generate Laravel and Symfony CRUD resources from JDL, JSON or YAML definitions",
    long_about = None
)]
struct Cli {
    /// Debug logging for resforge targets
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for every resource in a definition file
    Generate(GenerateCommand),
    /// Print the resolved resource model as JSON
    Inspect(InspectCommand),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    observability::init(cli.verbose, cli.log_format.into())?;

    match cli.command {
        Commands::Generate(cmd) => {
            let report = cmd.execute()?;
            if report.has_failures() {
                eprintln!(
                    "\n{} {} resource(s) failed",
                    style("✗").red().bold(),
                    report.failed.len()
                );
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect(cmd) => {
            cmd.execute()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
