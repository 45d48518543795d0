//! buildfe CLI - Build front-end for HPCToolkit

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildfe::core::ConfigureError;
use buildfe::util::diagnostic::emit;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ConfigureError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("buildfe=debug")
    } else {
        EnvFilter::new("buildfe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color && std::io::stdout().is_terminal();

    // Execute command
    match cli.command {
        Commands::Variants(args) => commands::variants::execute(args),
        Commands::Configure(args) => commands::configure::execute(args, color),
        Commands::CheckInstall(args) => commands::check_install::execute(args, color),
    }
}
