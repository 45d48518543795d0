//! Build configuration.
//!
//! This module turns a variant and a set of dependency lines into the
//! arguments and environment for HPCToolkit's `configure`.

pub mod configuration;
pub mod depconfig;
pub mod env;

pub use configuration::Configuration;
pub use depconfig::DependencyConfig;
pub use env::LayeredEnv;
