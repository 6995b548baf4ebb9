//! Errors that abort an analysis run.
//!
//! Only input validation can fail. Detection over a structurally valid
//! graph is infallible, so every variant here points at offending input.

use miette::Diagnostic;
use thiserror::Error;

use crate::patterns::PatternError;

/// Fatal error of one analysis run.
#[derive(Debug, Error, Diagnostic)]
pub enum AnalysisError {
    /// An edge or node declaration is structurally invalid.
    #[error("malformed input: {0}")]
    #[diagnostic(
        code(conformist::malformed_edge),
        help("fix the front-end output; no partial graph is analyzed")
    )]
    MalformedEdge(#[from] MalformedEdge),

    /// An edge references its own source node.
    #[error("self-referencing edge on `{node}`")]
    #[diagnostic(
        code(conformist::self_reference),
        help("self edges carry no dependency information; drop them in the front end")
    )]
    SelfReference {
        /// The node referencing itself.
        node: String,
    },

    /// The exception pattern table is invalid.
    #[error("invalid exception pattern: {0}")]
    #[diagnostic(
        code(conformist::invalid_pattern),
        help("exception patterns are maintained by governance; fix the pattern table")
    )]
    InvalidPattern(#[from] PatternError),

    /// The configured hierarchy separator is empty.
    #[error("identifier separator must not be empty")]
    #[diagnostic(
        code(conformist::empty_separator),
        help("set `[analyzer] separator` to a non-empty string such as `.`")
    )]
    EmptySeparator,
}

/// Reasons an input declaration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEdge {
    /// An edge endpoint was never declared as a node.
    #[error("edge `{from}` -> `{to}` references undeclared node `{missing}`")]
    UndeclaredNode {
        /// Edge source.
        from: String,
        /// Edge target.
        to: String,
        /// The endpoint without a declaration.
        missing: String,
    },

    /// A node was declared twice with different metadata.
    #[error("node `{id}` redeclared with conflicting {field}: `{first}` vs `{second}`")]
    ConflictingDeclaration {
        /// The redeclared node.
        id: String,
        /// Which metadata field differs.
        field: &'static str,
        /// Value from the first declaration.
        first: String,
        /// Value from the conflicting declaration.
        second: String,
    },

    /// A node identifier is empty or has an empty segment.
    #[error("invalid node identifier `{id}`")]
    InvalidIdentifier {
        /// The rejected identifier.
        id: String,
    },

    /// A package-level edge crosses a module boundary.
    #[error(
        "package-level edge `{from}` -> `{to}` crosses modules `{from_module}` and `{to_module}`"
    )]
    CrossModulePackageEdge {
        /// Edge source.
        from: String,
        /// Edge target.
        to: String,
        /// Module owning the source.
        from_module: String,
        /// Module owning the target.
        to_module: String,
    },
}
