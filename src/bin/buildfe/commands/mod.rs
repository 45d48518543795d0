//! Command implementations

pub mod check_install;
pub mod configure;
pub mod variants;

use anyhow::{Context, Result};

use buildfe::core::Variant;
use buildfe::util::config::{global_config_path, load_config, project_config_path};
use buildfe::util::Config;

/// Load the global and project configuration for the current directory.
pub fn current_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let global = global_config_path();
    Ok(load_config(global.as_deref(), &project_config_path(&cwd)))
}

/// The variant filter from the command line, falling back to the config.
pub fn variant_filter(spec: Option<&str>, config: &Config) -> Result<Variant> {
    let spec = spec.or(config.variants.filter.as_deref()).unwrap_or("");
    Ok(Variant::parse(spec)?)
}
