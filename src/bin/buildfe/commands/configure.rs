//! `buildfe configure` command

use std::collections::BTreeSet;

use anyhow::{Context, Result};

use crate::cli::ConfigureArgs;
use buildfe::ops::{
    configure_variants, format_outcomes_for_output, run_configure, ConfigureOptions,
    OutputFormat, VariantOutcome,
};
use buildfe::util::config::{Config, DependencyFile};
use buildfe::util::diagnostic::{emit, Severity};

pub fn execute(args: ConfigureArgs, color: bool) -> Result<()> {
    let output_format: OutputFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.format))?;

    let mut config = super::current_config()?;
    let filter = super::variant_filter(args.variant.as_deref(), &config)?;

    // command-line files are searched before configured ones
    let mut cli_files = Config::default();
    cli_files.dependencies.files = args.deps.iter().map(|d| DependencyFile::from_arg(d)).collect();
    config.merge(cli_files);

    let depcfg = config.dependency_config()?;
    if depcfg.is_empty() {
        tracing::warn!("No dependency lines loaded, pass --deps FILE");
    }

    let options = ConfigureOptions {
        filter,
        source_dir: args.source,
        prefix: args.prefix,
    };

    let outcomes = configure_variants(&depcfg, &options)?;

    // one diagnostic per distinct reason
    let mut reported = BTreeSet::new();
    for outcome in &outcomes {
        if let VariantOutcome::Skipped { reason, .. } = outcome {
            if reported.insert(reason.to_string()) {
                emit(
                    &reason.to_diagnostic().with_severity(Severity::Warning),
                    color,
                );
            }
        }
    }

    if args.exec {
        return run_configure(&outcomes, &options);
    }

    print!(
        "{}",
        format_outcomes_for_output(&outcomes, &options, output_format)
    );

    Ok(())
}
