//! # conformist-core
//!
//! Architectural conformance analysis over a hierarchical dependency graph.
//!
//! A language front end supplies declared nodes (packages grouped into
//! release units called modules) and raw dependency edges. This crate
//! detects structural violations and reports them as zero-optimal metrics:
//!
//! - [`cycles`]: dependency cycles at module and package scope
//! - [`hierarchy`]: vertical dependencies and parent packages with code
//! - [`ExceptionEngine`]: removes findings matched by a governed
//!   [`PatternTable`]
//! - [`Report`]: severity-ordered violations plus per-kind counts
//!
//! ## Example
//!
//! ```ignore
//! use conformist_core::{Analyzer, DependencyInput, EdgeDecl, NodeDecl};
//!
//! let input = DependencyInput::new()
//!     .node(NodeDecl::organizing("a", "m1"))
//!     .node(NodeDecl::code("a.b", "m1"))
//!     .edge(EdgeDecl::package("a.b", "a"));
//!
//! let report = Analyzer::builder().build()?.analyze(&input)?;
//! println!("{}", report.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod exceptions;
mod graph;
mod input;
mod report;
mod types;

pub mod cycles;
pub mod hierarchy;
pub mod patterns;
pub mod severity;

pub mod utils;

pub use analyzer::{Analysis, Analyzer, AnalyzerBuilder};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use error::{AnalysisError, MalformedEdge};
pub use exceptions::{ExceptionEngine, ExceptionOutcome};
pub use graph::{Edge, Graph, Node, NodeId};
pub use input::{DependencyInput, EdgeDecl, NodeDecl};
pub use patterns::{ExceptionPattern, PatternError, PatternName, PatternTable, Predicate};
pub use report::{Counts, Report};
pub use severity::classify;
pub use types::{
    EdgeScope, Evidence, Finding, NodeKind, Scope, Severity, VerticalDirection, Violation,
    ViolationKind,
};
