//! buildfe - A build front-end for HPCToolkit
//!
//! This crate enumerates HPCToolkit build variants, derives the `configure`
//! arguments and environment for each from user-supplied dependency lines,
//! and verifies that an install tree matches the expected manifest.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{Configuration, DependencyConfig};
pub use core::{ConfigureError, Manifest, Variant};
