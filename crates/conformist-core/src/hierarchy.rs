//! Package hierarchy checks.
//!
//! Two independent checks:
//!
//! - **Vertical dependency**: an edge between a node and one of its strict
//!   ancestors, in either direction. Ancestry is decided by identifier prefix
//!   plus separator.
//! - **Parent has code**: an organizing node with declarations attached, or a
//!   code node that has declared descendants.
//!
//! Horizontal edges (siblings, sibling descendants, sibling ancestors) are
//! always legal and never reported.

use tracing::debug;

use crate::graph::Graph;
use crate::types::{Finding, NodeKind, Scope, VerticalDirection, ViolationKind};

/// Runs both hierarchy checks.
#[must_use]
pub fn detect(graph: &Graph) -> Vec<Finding> {
    let mut findings = vertical_dependencies(graph);
    findings.extend(parents_with_code(graph));
    debug!("Hierarchy validation found {} violation(s)", findings.len());
    findings
}

/// Reports every edge between an ancestor and one of its descendants.
///
/// Members are `[from, to]`; the scope follows the edge's scope.
#[must_use]
pub fn vertical_dependencies(graph: &Graph) -> Vec<Finding> {
    graph
        .edges()
        .filter_map(|edge| {
            let direction = if graph.is_strict_ancestor(edge.to, edge.from) {
                VerticalDirection::DescendantOnAncestor
            } else if graph.is_strict_ancestor(edge.from, edge.to) {
                VerticalDirection::AncestorOnDescendant
            } else {
                return None;
            };
            Some(
                Finding::new(
                    ViolationKind::VerticalDependency(direction),
                    edge.scope.violation_scope(),
                    vec![edge.from, edge.to],
                )
                .with_evidence(vec![edge.evidence]),
            )
        })
        .collect()
}

/// Reports nodes that mix organization and code.
///
/// Covers organizing nodes that carry declarations and code nodes that have
/// declared descendants. Both are package-scoped.
#[must_use]
pub fn parents_with_code(graph: &Graph) -> Vec<Finding> {
    graph
        .nodes()
        .filter(|(id, node)| match node.kind() {
            NodeKind::Organizing => node.has_declarations(),
            NodeKind::Code => graph.has_descendants(*id),
        })
        .map(|(id, _)| Finding::new(ViolationKind::ParentHasCode, Scope::Package, vec![id]))
        .collect()
}
