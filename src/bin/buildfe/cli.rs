//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// buildfe - Build front-end for HPCToolkit
#[derive(Parser)]
#[command(name = "buildfe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the build variants matching a spec
    Variants(VariantsArgs),

    /// Derive configure arguments for matching variants
    Configure(ConfigureArgs),

    /// Check an install tree against the expected manifest
    CheckInstall(CheckInstallArgs),
}

#[derive(Args)]
pub struct VariantsArgs {
    /// Variant spec, e.g. "+mpi ~debug" (defaults to the configured filter)
    pub spec: Option<String>,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: String,
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Dependency file to load, optionally with a context directory
    /// (FILE or FILE:CTX). Earlier files take precedence.
    #[arg(short = 'd', long = "deps", value_name = "FILE[:CTX]")]
    pub deps: Vec<String>,

    /// Only configure variants matching this spec
    #[arg(long)]
    pub variant: Option<String>,

    /// Install prefix
    #[arg(long, default_value = "/usr/local")]
    pub prefix: PathBuf,

    /// HPCToolkit source directory
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Run configure (requires exactly one matching variant)
    #[arg(long)]
    pub exec: bool,
}

#[derive(Args)]
pub struct CheckInstallArgs {
    /// Install prefix to check
    pub root: PathBuf,

    /// Variant the install was built as (only `mpi` matters)
    #[arg(long, conflicts_with = "mpi")]
    pub variant: Option<String>,

    /// The install was built with MPI
    #[arg(long)]
    pub mpi: bool,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: String,
}
