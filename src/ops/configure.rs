//! Configuration of HPCToolkit variants.
//!
//! Every complete variant satisfying a filter is assembled against the loaded
//! dependency lines. Variants the dependency lines cannot satisfy are skipped
//! and reported; any other failure aborts the whole run.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::builder::{Configuration, DependencyConfig};
use crate::core::errors::ConfigureError;
use crate::core::variant::{all_variants, Variant};
use crate::ops::format::OutputFormat;

/// Options for configuring variants.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Only variants satisfying this filter are configured
    pub filter: Variant,

    /// HPCToolkit source directory holding `configure`
    pub source_dir: PathBuf,

    /// Install prefix passed as `--prefix=`
    pub prefix: PathBuf,
}

impl Default for ConfigureOptions {
    fn default() -> Self {
        ConfigureOptions {
            filter: Variant::empty(),
            source_dir: PathBuf::from("."),
            prefix: PathBuf::from("/usr/local"),
        }
    }
}

impl ConfigureOptions {
    /// Path of the `configure` script.
    pub fn script(&self) -> PathBuf {
        self.source_dir.join("configure")
    }
}

/// What happened to a single variant.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VariantOutcome {
    Configured(Configuration),
    Skipped {
        variant: Variant,
        #[serde(serialize_with = "serialize_error")]
        reason: ConfigureError,
    },
}

fn serialize_error<S>(error: &ConfigureError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

impl VariantOutcome {
    pub fn variant(&self) -> &Variant {
        match self {
            VariantOutcome::Configured(cfg) => &cfg.variant,
            VariantOutcome::Skipped { variant, .. } => variant,
        }
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        match self {
            VariantOutcome::Configured(cfg) => Some(cfg),
            VariantOutcome::Skipped { .. } => None,
        }
    }
}

/// Assemble a configuration for every variant matching `options.filter`.
pub fn configure_variants(
    depcfg: &DependencyConfig,
    options: &ConfigureOptions,
) -> Result<Vec<VariantOutcome>> {
    let mut outcomes = Vec::new();

    for variant in all_variants().filter(|v| v.satisfies(&options.filter)) {
        match Configuration::new(depcfg, &variant) {
            Ok(cfg) => outcomes.push(VariantOutcome::Configured(cfg)),
            Err(e) if e.is_unsatisfiable() => {
                tracing::debug!("Skipping {}: {}", variant, e);
                outcomes.push(VariantOutcome::Skipped { variant, reason: e });
            }
            Err(e) => return Err(e.into()),
        }
    }

    let configured = outcomes
        .iter()
        .filter(|o| o.configuration().is_some())
        .count();
    tracing::info!(
        "{} variants configured, {} skipped",
        configured,
        outcomes.len() - configured
    );

    Ok(outcomes)
}

/// Run `configure` for the single configured variant in `outcomes`.
pub fn run_configure(outcomes: &[VariantOutcome], options: &ConfigureOptions) -> Result<()> {
    let configured: Vec<&Configuration> =
        outcomes.iter().filter_map(VariantOutcome::configuration).collect();

    let cfg = match configured.as_slice() {
        [cfg] => *cfg,
        [] => bail!("no configurable variant matches the filter"),
        many => bail!(
            "{} variants match, narrow the filter to a single variant to run configure",
            many.len()
        ),
    };

    let cmd = cfg.configure_command(&options.script(), &options.prefix);
    tracing::info!("Running {}", cmd.display_command());
    cmd.run()
}

fn shell_quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| word.to_string())
}

/// The command line for `cfg`, with environment overrides as leading
/// assignments.
pub fn command_line(cfg: &Configuration, script: &Path, prefix: &Path) -> String {
    let cmd = cfg.configure_command(script, prefix);

    let env = cmd
        .get_envs()
        .iter()
        .map(|(k, v)| format!("{}={}", k, shell_quote(v)));
    let program = std::iter::once(shell_quote(&cmd.get_program().to_string_lossy()));
    let args = cmd.get_args().iter().map(|a| shell_quote(a));

    env.chain(program).chain(args).collect::<Vec<_>>().join(" ")
}

/// Format outcomes for human consumption.
pub fn format_outcomes(outcomes: &[VariantOutcome], options: &ConfigureOptions) -> String {
    let mut output = String::new();
    let script = options.script();

    for outcome in outcomes {
        match outcome {
            VariantOutcome::Configured(cfg) => {
                let _ = writeln!(output, "[{}]", cfg.variant);
                let _ = writeln!(output, "  make: {}", cfg.make.display());
                let _ = writeln!(
                    output,
                    "  {}",
                    command_line(cfg, &script, &options.prefix)
                );
            }
            VariantOutcome::Skipped { variant, reason } => {
                let _ = writeln!(output, "[{}]", variant);
                let _ = writeln!(output, "  skipped: {}", reason);
            }
        }
    }

    output
}

/// Format outcomes as JSON.
pub fn format_outcomes_json(outcomes: &[VariantOutcome]) -> String {
    serde_json::to_string_pretty(outcomes)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize result: {}"}}"#, e))
}

/// Format outcomes in the requested output format.
pub fn format_outcomes_for_output(
    outcomes: &[VariantOutcome],
    options: &ConfigureOptions,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Human => format_outcomes(outcomes, options),
        OutputFormat::Json => format_outcomes_json(outcomes),
    }
}
