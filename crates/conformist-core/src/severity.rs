//! Fixed severity table.
//!
//! Priority order: module cycles, then package cycles, then vertical
//! dependencies and parent packages with code.

use crate::graph::Graph;
use crate::types::{Finding, Scope, Severity, Violation, ViolationKind};

/// Maps a violation kind and scope to its severity tier.
#[must_use]
pub fn classify(kind: ViolationKind, scope: Scope) -> Severity {
    match (kind, scope) {
        (ViolationKind::Cycle, Scope::Module) => Severity::High,
        (ViolationKind::Cycle, Scope::Package)
        | (ViolationKind::VerticalDependency(_) | ViolationKind::ParentHasCode, _) => {
            Severity::Medium
        }
    }
}

/// Tags a finding with its severity and resolves member identifiers.
#[must_use]
pub fn finalize(finding: &Finding, graph: &Graph) -> Violation {
    Violation::new(
        finding.kind,
        finding.scope,
        classify(finding.kind, finding.scope),
        finding
            .members
            .iter()
            .map(|m| graph.node(*m).id().to_string())
            .collect(),
    )
}
