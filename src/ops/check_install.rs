//! Verification of an installed HPCToolkit tree.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::manifest::{InstallReport, Manifest};
use crate::ops::format::OutputFormat;

/// Options for checking an install.
#[derive(Debug, Clone)]
pub struct CheckInstallOptions {
    /// Install prefix to scan
    pub root: PathBuf,

    /// Whether the install was built with MPI
    pub mpi: bool,
}

/// Compare the install at `options.root` against its manifest.
pub fn check_install(options: &CheckInstallOptions) -> Result<InstallReport> {
    if !options.root.is_dir() {
        bail!("install root {} is not a directory", options.root.display());
    }

    tracing::info!(
        "Checking {} ({})",
        options.root.display(),
        if options.mpi { "with MPI" } else { "without MPI" }
    );
    Manifest::new(options.mpi).check(&options.root)
}

/// Format a report for human consumption.
pub fn format_report(report: &InstallReport, color: bool) -> String {
    let mut output = report.format(color);
    if report.is_clean() {
        output.push_str("install matches manifest\n");
    } else {
        output.push_str(&format!(
            "{} missing, {} unexpected\n",
            report.missing, report.unexpected
        ));
    }
    output
}

/// Format a report as JSON.
pub fn format_report_json(report: &InstallReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize report: {}"}}"#, e))
}

/// Format a report in the requested output format.
pub fn format_report_for_output(report: &InstallReport, format: OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Human => format_report(report, color),
        OutputFormat::Json => format_report_json(report),
    }
}
