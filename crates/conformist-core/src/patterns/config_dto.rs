//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of an exception pattern table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternTableDto {
    /// Governance version of the table (e.g., "2026.1").
    #[serde(default)]
    pub version: Option<String>,

    /// Pattern definitions, in evaluation order.
    #[serde(rename = "pattern", default)]
    pub patterns: Vec<PatternDto>,
}

/// TOML representation of a single exception pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PatternDto {
    /// Pattern name (e.g., "inner-class-cycles").
    pub name: String,
    /// Predicate name (e.g., "shared-stem").
    pub predicate: String,
    /// Separator marker for `shared-stem`.
    #[serde(default)]
    pub marker: Option<String>,
    /// Token for `contains-token`.
    #[serde(default)]
    pub token: Option<String>,
    /// Evidence tag for `evidence`.
    #[serde(default)]
    pub evidence: Option<String>,
    /// Package prefix for `under-prefix`.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Violation kinds this pattern applies to (default: all).
    #[serde(default)]
    pub applies_to: Vec<String>,
    /// Whether the pattern is in force (default: true).
    #[serde(default = "default_true")]
    pub active: bool,
    /// Link to the accepted petition or decision record.
    #[serde(default)]
    pub rationale: Option<String>,
}

fn default_true() -> bool {
    true
}
