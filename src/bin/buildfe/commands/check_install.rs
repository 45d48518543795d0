//! `buildfe check-install` command

use anyhow::{Context, Result};

use crate::cli::CheckInstallArgs;
use buildfe::core::{Feature, Variant};
use buildfe::ops::{check_install, format_report_for_output, CheckInstallOptions, OutputFormat};

pub fn execute(args: CheckInstallArgs, color: bool) -> Result<()> {
    let output_format: OutputFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.format))?;

    let mpi = match args.variant {
        Some(ref spec) => Variant::parse(spec)?.enabled(Feature::Mpi),
        None => args.mpi,
    };

    let options = CheckInstallOptions {
        root: args.root,
        mpi,
    };

    let report = check_install(&options)?;
    print!("{}", format_report_for_output(&report, output_format, color));

    // Exit with error code if the install does not match
    if !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}
