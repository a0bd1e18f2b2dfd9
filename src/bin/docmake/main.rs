//! docmake CLI - A make-style front end for Sphinx documentation builds

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use docmake::ops::error_exit_code;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}

fn run() -> Result<ExitCode> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("docmake=debug")
    } else {
        EnvFilter::new("docmake=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.print_config {
        commands::run::print_config(cli.run)?;
        return Ok(ExitCode::SUCCESS);
    }

    commands::run::execute(cli.run)
}
