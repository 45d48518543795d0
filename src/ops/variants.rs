//! Variant listing.

use crate::core::variant::{all_variants, Variant};

/// Every complete variant satisfying `filter`, in enumeration order.
pub fn list_variants(filter: &Variant) -> Vec<Variant> {
    all_variants().filter(|v| v.satisfies(filter)).collect()
}

/// One variant per line.
pub fn format_variants(variants: &[Variant]) -> String {
    variants.iter().map(|v| format!("{}\n", v)).collect()
}

/// JSON array of variant strings.
pub fn format_variants_json(variants: &[Variant]) -> String {
    serde_json::to_string_pretty(variants)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize variants: {}"}}"#, e))
}
