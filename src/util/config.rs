//! Configuration file support for buildfe.
//!
//! buildfe reads two optional configuration files:
//! - Global: `~/.buildfe/config.toml` - User-wide defaults
//! - Project: `.buildfe/config.toml` - Project-specific overrides
//!
//! ```toml
//! [dependencies]
//! files = [{ path = "spack.conf", context = "spack-env" }, { path = "site.conf" }]
//!
//! [variants]
//! filter = "~debug"
//! ```
//!
//! Dependency files from the project config are searched before those from
//! the global config. Relative paths are resolved against the directory
//! containing the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::DependencyConfig;

/// buildfe configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dependency line files
    pub dependencies: DependenciesConfig,

    /// Variant selection
    pub variants: VariantsConfig,
}

/// Dependency files to load, in search order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependenciesConfig {
    pub files: Vec<DependencyFile>,
}

/// A dependency file and the directory `${CTX}` expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    pub path: PathBuf,
    #[serde(default)]
    pub context: Option<PathBuf>,
}

impl DependencyFile {
    pub fn new(path: impl Into<PathBuf>, context: Option<PathBuf>) -> Self {
        DependencyFile {
            path: path.into(),
            context,
        }
    }

    /// Parse the command-line form `FILE` or `FILE:CTX`.
    pub fn from_arg(arg: &str) -> Self {
        match arg.split_once(':') {
            Some((path, ctx)) if !ctx.is_empty() => {
                DependencyFile::new(path, Some(PathBuf::from(ctx)))
            }
            _ => DependencyFile::new(arg, None),
        }
    }

    fn rebase(mut self, base: &Path) -> Self {
        self.path = base.join(&self.path);
        self.context = self.context.map(|c| base.join(c));
        self
    }
}

/// Variant selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantsConfig {
    /// Only consider variants satisfying this spec
    pub filter: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        Ok(config.rebased(base))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    fn rebased(mut self, base: &Path) -> Self {
        self.dependencies.files = self
            .dependencies
            .files
            .into_iter()
            .map(|f| f.rebase(base))
            .collect();
        self
    }

    /// Layer a higher-precedence config over this one.
    ///
    /// Its dependency files are searched first; its filter replaces ours.
    pub fn merge(&mut self, other: Config) {
        let mut files = other.dependencies.files;
        files.append(&mut self.dependencies.files);
        self.dependencies.files = files;

        if other.variants.filter.is_some() {
            self.variants.filter = other.variants.filter;
        }
    }

    /// Build the dependency table from the configured files.
    pub fn dependency_config(&self) -> Result<DependencyConfig> {
        let mut depcfg = DependencyConfig::new();
        for file in &self.dependencies.files {
            depcfg.load(&file.path, file.context.as_deref())?;
        }
        Ok(depcfg)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.buildfe/config.toml)
/// 2. Global config (~/.buildfe/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global buildfe config directory (~/.buildfe).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".buildfe"))
}

/// Get the global config path (~/.buildfe/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.buildfe/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".buildfe").join("config.toml")
}
