mod cli;
mod commands;
mod compare;
mod extract;
mod model;
mod pdf;
mod store;
mod util;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::compare::QaGateFailure;

/// Exit status when a report was written but `--fail-on` rejected it.
const QA_GATE_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            exit_code_for(&err)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Status(args) => commands::status::run(args),
    }
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<QaGateFailure>().is_some() {
        ExitCode::from(QA_GATE_EXIT_CODE)
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("RETROFIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
