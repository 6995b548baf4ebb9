//! Dependency input supplied by a language front end.
//!
//! These types exist for serde deserialization of the front end's output.
//! They are validated and interned by [`Graph::build`](crate::Graph::build).

use serde::{Deserialize, Serialize};

use crate::types::{EdgeScope, Evidence, NodeKind};

/// Node declarations followed by raw dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInput {
    /// Declared nodes.
    #[serde(default)]
    pub nodes: Vec<NodeDecl>,
    /// Raw references between declared nodes.
    #[serde(default)]
    pub edges: Vec<EdgeDecl>,
}

impl DependencyInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node declaration.
    #[must_use]
    pub fn node(mut self, decl: NodeDecl) -> Self {
        self.nodes.push(decl);
        self
    }

    /// Adds an edge declaration.
    #[must_use]
    pub fn edge(mut self, decl: EdgeDecl) -> Self {
        self.edges.push(decl);
        self
    }
}

/// A node as observed by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeDecl {
    /// Fully-qualified identifier (e.g., `com.acme.billing`).
    pub id: String,
    /// Organizing or code package.
    pub kind: NodeKind,
    /// Identifier of the owning release unit.
    pub module: String,
    /// Whether declarations are attached directly to this node.
    #[serde(default)]
    pub has_declarations: bool,
}

impl NodeDecl {
    /// Declares a code node.
    #[must_use]
    pub fn code(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Code,
            module: module.into(),
            has_declarations: true,
        }
    }

    /// Declares an organizing node without declarations.
    #[must_use]
    pub fn organizing(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Organizing,
            module: module.into(),
            has_declarations: false,
        }
    }

    /// Overrides the declarations flag.
    #[must_use]
    pub fn with_declarations(mut self, has_declarations: bool) -> Self {
        self.has_declarations = has_declarations;
        self
    }
}

/// A raw reference from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDecl {
    /// Referencing node.
    pub from: String,
    /// Referenced node.
    pub to: String,
    /// Module or package level.
    pub scope: EdgeScope,
    /// Invocation or data reference (default: invocation).
    #[serde(default)]
    pub evidence: Evidence,
}

impl EdgeDecl {
    /// Creates a package-level invocation edge.
    #[must_use]
    pub fn package(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            scope: EdgeScope::PackageLevel,
            evidence: Evidence::Invocation,
        }
    }

    /// Creates a module-level invocation edge.
    #[must_use]
    pub fn module(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            scope: EdgeScope::ModuleLevel,
            evidence: Evidence::Invocation,
        }
    }

    /// Overrides the evidence tag.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }
}
