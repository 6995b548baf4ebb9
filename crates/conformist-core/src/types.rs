//! Core types for graph input, findings and violations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::graph::NodeId;

/// Severity tier of a violation.
///
/// Ordered so that `High` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Organizational issue, lowest priority.
    Low,
    /// Structural violation that must be fixed.
    Medium,
    /// Release-unit level violation, fix first.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown severity `{other}`, expected: high, medium, low"
            )),
        }
    }
}

/// Whether a package only organizes sub-packages or holds declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Holds sub-packages only.
    Organizing,
    /// Holds declarations only.
    Code,
}

/// Granularity at which a dependency edge was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeScope {
    /// Dependency between release units.
    #[serde(rename = "module")]
    ModuleLevel,
    /// Dependency between packages of one release unit.
    #[serde(rename = "package")]
    PackageLevel,
}

impl EdgeScope {
    /// Returns the violation scope this edge scope reports under.
    #[must_use]
    pub fn violation_scope(self) -> Scope {
        match self {
            Self::ModuleLevel => Scope::Module,
            Self::PackageLevel => Scope::Package,
        }
    }
}

/// What kind of reference an edge stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Evidence {
    /// A method or function call.
    #[default]
    Invocation,
    /// A reference to data (types, constants) without a call.
    DataReference,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invocation => write!(f, "invocation"),
            Self::DataReference => write!(f, "data-reference"),
        }
    }
}

/// Graph scope a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Across release units.
    Module,
    /// Within one release unit.
    Package,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Package => write!(f, "package"),
        }
    }
}

/// Direction of a vertical dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerticalDirection {
    /// A descendant references one of its ancestors.
    DescendantOnAncestor,
    /// An ancestor references one of its descendants.
    AncestorOnDescendant,
}

/// Closed set of violation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    /// Members form a strongly connected component.
    Cycle,
    /// An edge between an ancestor and one of its descendants.
    VerticalDependency(VerticalDirection),
    /// A package that both holds declarations and has sub-packages.
    ParentHasCode,
}

impl ViolationKind {
    /// Every kind, in report order.
    pub const ALL: [Self; 4] = [
        Self::Cycle,
        Self::VerticalDependency(VerticalDirection::DescendantOnAncestor),
        Self::VerticalDependency(VerticalDirection::AncestorOnDescendant),
        Self::ParentHasCode,
    ];

    /// Returns the kebab-case name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::VerticalDependency(VerticalDirection::DescendantOnAncestor) => {
                "descendant-on-ancestor"
            }
            Self::VerticalDependency(VerticalDirection::AncestorOnDescendant) => {
                "ancestor-on-descendant"
            }
            Self::ParentHasCode => "parent-has-code",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown violation kind `{s}`"))
    }
}

impl Serialize for ViolationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViolationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A detector result before exception filtering and severity tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Violation kind.
    pub kind: ViolationKind,
    /// Graph scope.
    pub scope: Scope,
    /// Participating nodes, in report order.
    pub members: Vec<NodeId>,
    /// Evidence of every edge that justifies the finding.
    pub evidence: Vec<Evidence>,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(kind: ViolationKind, scope: Scope, members: Vec<NodeId>) -> Self {
        Self {
            kind,
            scope,
            members,
            evidence: Vec::new(),
        }
    }

    /// Attaches edge evidence to this finding.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = evidence;
        self
    }
}

/// A classified violation as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// Violation kind.
    pub kind: ViolationKind,
    /// Graph scope.
    pub scope: Scope,
    /// Severity tier.
    pub severity: Severity,
    /// Identifiers of the participating nodes.
    pub members: Vec<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(kind: ViolationKind, scope: Scope, severity: Severity, members: Vec<String>) -> Self {
        Self {
            kind,
            scope,
            severity,
            members,
        }
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} {}\n", self.severity, self.scope, self.kind);
        let _ = writeln!(output, "  {}", self.render_members());
        output
    }

    /// Renders the members for terminal output.
    ///
    /// Cycle members are an SCC in discovery order, not a walk, so they are
    /// shown as a set. Vertical dependencies are a single `from -> to` edge.
    #[must_use]
    pub fn render_members(&self) -> String {
        match self.kind {
            ViolationKind::Cycle => format!("{{{}}}", self.members.join(", ")),
            _ => self.members.join(" -> "),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{} {}] {}",
            self.severity,
            self.scope,
            self.kind,
            self.render_members()
        )
    }
}
