//! High-level operations.
//!
//! This module contains the implementation of buildfe commands.

pub mod check_install;
pub mod configure;
pub mod format;
pub mod variants;

pub use check_install::{check_install, format_report_for_output, CheckInstallOptions};
pub use configure::{
    configure_variants, format_outcomes_for_output, run_configure, ConfigureOptions,
    VariantOutcome,
};
pub use format::OutputFormat;
pub use variants::list_variants;
