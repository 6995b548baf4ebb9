//! Governed exception patterns driven by TOML configuration.
//!
//! Pattern tables are produced by an external governance process and are
//! read-only to the analyzer.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! PatternTable (pure domain model)
//!   ↓ ExceptionEngine::new()
//! finding filter
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

pub use model::{ExceptionPattern, PatternName, PatternTable, Predicate};

/// Errors from parsing and validating an exception pattern table.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Patterns are present but the table has no version.
    #[error("pattern table must declare a non-empty `version`")]
    MissingVersion,

    /// Pattern name is empty or contains invalid characters.
    #[error("invalid pattern name `{name}`: must be non-empty [a-z0-9-]")]
    InvalidName {
        /// The invalid name.
        name: String,
    },

    /// Two patterns share a name.
    #[error("duplicate pattern name `{name}`")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// The predicate is not one the engine recognizes.
    #[error(
        "{pattern}: unknown predicate `{predicate}`, expected: shared-stem, contains-token, evidence, under-prefix"
    )]
    UnknownPredicate {
        /// Pattern naming the predicate.
        pattern: String,
        /// The unrecognized predicate.
        predicate: String,
    },

    /// A predicate argument is missing.
    #[error("{pattern}: predicate `{predicate}` requires `{argument}`")]
    MissingArgument {
        /// Pattern with the missing argument.
        pattern: String,
        /// Predicate requiring the argument.
        predicate: String,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// A predicate argument is empty.
    #[error("{pattern}: `{argument}` must not be empty")]
    EmptyArgument {
        /// Pattern with the empty argument.
        pattern: String,
        /// Name of the empty argument.
        argument: &'static str,
    },

    /// Unknown violation kind in `applies-to`.
    #[error(
        "{pattern}: unknown kind `{value}`, expected: cycle, vertical-dependency, descendant-on-ancestor, ancestor-on-descendant, parent-has-code"
    )]
    UnknownKind {
        /// Pattern with the bad selector.
        pattern: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown evidence tag.
    #[error("{pattern}: unknown evidence `{value}`, expected: invocation, data-reference")]
    UnknownEvidence {
        /// Pattern with the bad tag.
        pattern: String,
        /// The invalid value.
        value: String,
    },
}

impl PatternTable {
    /// Parses and validates a pattern table from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing or pattern validation fails.
    pub fn from_toml(content: &str) -> Result<Self, PatternError> {
        let dto: config_dto::PatternTableDto = toml::from_str(content)?;
        loader::load(dto)
    }
}
