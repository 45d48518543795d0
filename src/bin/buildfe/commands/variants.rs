//! `buildfe variants` command

use anyhow::{Context, Result};

use crate::cli::VariantsArgs;
use buildfe::ops::variants::{format_variants, format_variants_json};
use buildfe::ops::{list_variants, OutputFormat};

pub fn execute(args: VariantsArgs) -> Result<()> {
    let output_format: OutputFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.format))?;

    let config = super::current_config()?;
    let filter = super::variant_filter(args.spec.as_deref(), &config)?;

    let variants = list_variants(&filter);
    tracing::debug!("{} variants satisfy `{}`", variants.len(), filter);

    let output = match output_format {
        OutputFormat::Human => format_variants(&variants),
        OutputFormat::Json => format_variants_json(&variants),
    };
    print!("{}", output);

    Ok(())
}
