//! Core data structures for buildfe.
//!
//! This module contains the foundational types:
//! - Variants and their enumeration
//! - Install manifests and the install verifier
//! - Configuration errors

pub mod errors;
pub mod manifest;
pub mod variant;

pub use errors::ConfigureError;
pub use manifest::{InstallReport, Manifest};
pub use variant::{all_variants, Feature, Variant};
