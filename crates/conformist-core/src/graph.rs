//! Immutable dependency graph for one analysis run.
//!
//! Nodes are interned in identifier order, so [`NodeId`] ordering equals
//! lexicographic identifier ordering. Every traversal that walks ids in
//! ascending order is therefore independent of the input order.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{AnalysisError, MalformedEdge};
use crate::input::{DependencyInput, EdgeDecl, NodeDecl};
use crate::types::{EdgeScope, Evidence, NodeKind};
use crate::utils::paths;

/// Dense index of a node within one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the position of this node in the graph's node table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An interned package or module node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    kind: NodeKind,
    module: String,
    has_declarations: bool,
}

impl Node {
    /// Returns the fully-qualified identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns whether this node organizes or holds code.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the owning release unit.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns whether declarations are attached directly to this node.
    #[must_use]
    pub fn has_declarations(&self) -> bool {
        self.has_declarations
    }
}

impl From<&NodeDecl> for Node {
    fn from(decl: &NodeDecl) -> Self {
        Self {
            id: decl.id.clone(),
            kind: decl.kind,
            module: decl.module.clone(),
            has_declarations: decl.has_declarations,
        }
    }
}

/// A collapsed dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Referencing node.
    pub from: NodeId,
    /// Referenced node.
    pub to: NodeId,
    /// Module or package level.
    pub scope: EdgeScope,
    /// `DataReference` only if every collapsed raw reference was one.
    pub evidence: Evidence,
}

/// Directed dependency graph with scoped forward adjacency.
#[derive(Debug, Clone)]
pub struct Graph {
    separator: String,
    nodes: Vec<Node>,
    index: BTreeMap<String, NodeId>,
    outgoing: Vec<BTreeMap<(NodeId, EdgeScope), Evidence>>,
}

impl Graph {
    /// Builds a graph from front-end input in a single pass.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedEdge`] for undeclared endpoints,
    /// conflicting redeclarations, malformed identifiers and package-level
    /// edges that cross modules, and [`AnalysisError::SelfReference`] for
    /// edges whose endpoints coincide.
    pub fn build(input: &DependencyInput, separator: &str) -> Result<Self, AnalysisError> {
        let mut decls: BTreeMap<&str, &NodeDecl> = BTreeMap::new();
        for decl in &input.nodes {
            if !paths::is_well_formed(&decl.id, separator) {
                return Err(MalformedEdge::InvalidIdentifier {
                    id: decl.id.clone(),
                }
                .into());
            }
            match decls.entry(decl.id.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(decl);
                }
                Entry::Occupied(existing) => check_redeclaration(existing.get(), decl)?,
            }
        }

        let nodes: Vec<Node> = decls.values().map(|decl| Node::from(*decl)).collect();
        let index: BTreeMap<String, NodeId> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), NodeId(i)))
            .collect();

        let mut graph = Self {
            separator: separator.to_string(),
            outgoing: vec![BTreeMap::new(); nodes.len()],
            nodes,
            index,
        };

        for edge in &input.edges {
            graph.insert_edge(edge)?;
        }

        debug!(
            "Built graph: {} nodes, {} edges from {} raw references",
            graph.len(),
            graph.edge_count(),
            input.edges.len()
        );

        Ok(graph)
    }

    fn insert_edge(&mut self, edge: &EdgeDecl) -> Result<(), AnalysisError> {
        if edge.from == edge.to {
            return Err(AnalysisError::SelfReference {
                node: edge.from.clone(),
            });
        }

        let resolve = |id: &str| {
            self.lookup(id).ok_or_else(|| MalformedEdge::UndeclaredNode {
                from: edge.from.clone(),
                to: edge.to.clone(),
                missing: id.to_string(),
            })
        };
        let from = resolve(&edge.from)?;
        let to = resolve(&edge.to)?;

        if edge.scope == EdgeScope::PackageLevel {
            let (from_module, to_module) = (self.node(from).module(), self.node(to).module());
            if from_module != to_module {
                return Err(MalformedEdge::CrossModulePackageEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    from_module: from_module.to_string(),
                    to_module: to_module.to_string(),
                }
                .into());
            }
        }

        self.outgoing[from.0]
            .entry((to, edge.scope))
            .and_modify(|evidence| {
                if edge.evidence == Evidence::Invocation {
                    *evidence = Evidence::Invocation;
                }
            })
            .or_insert(edge.evidence);
        Ok(())
    }

    /// Returns the identifier segment separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of collapsed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(BTreeMap::len).sum()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up a node by identifier.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Iterates over all nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Iterates over all edges, ordered by source then target identifier.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.outgoing.iter().enumerate().flat_map(|(i, targets)| {
            targets.iter().map(move |(&(to, scope), &evidence)| Edge {
                from: NodeId(i),
                to,
                scope,
                evidence,
            })
        })
    }

    /// Iterates over the targets of `id`'s edges at `scope`, in identifier order.
    pub fn successors(&self, id: NodeId, scope: EdgeScope) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[id.0]
            .keys()
            .filter(move |(_, s)| *s == scope)
            .map(|&(to, _)| to)
    }

    /// Returns the evidence of the edge `from -> to` at `scope`, if present.
    #[must_use]
    pub fn edge_evidence(&self, from: NodeId, to: NodeId, scope: EdgeScope) -> Option<Evidence> {
        self.outgoing[from.0].get(&(to, scope)).copied()
    }

    /// Checks if `ancestor` is a strict ancestor of `descendant` by identifier.
    #[must_use]
    pub fn is_strict_ancestor(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        paths::is_strict_ancestor(
            self.node(ancestor).id(),
            self.node(descendant).id(),
            &self.separator,
        )
    }

    /// Checks if any declared node lies under `id`.
    #[must_use]
    pub fn has_descendants(&self, id: NodeId) -> bool {
        let prefix = format!("{}{}", self.node(id).id(), self.separator);
        self.index
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

}

fn check_redeclaration(first: &NodeDecl, second: &NodeDecl) -> Result<(), MalformedEdge> {
    let conflict = |field: &'static str, a: String, b: String| MalformedEdge::ConflictingDeclaration {
        id: first.id.clone(),
        field,
        first: a,
        second: b,
    };

    if first.kind != second.kind {
        return Err(conflict(
            "kind",
            format!("{:?}", first.kind).to_lowercase(),
            format!("{:?}", second.kind).to_lowercase(),
        ));
    }
    if first.module != second.module {
        return Err(conflict(
            "module",
            first.module.clone(),
            second.module.clone(),
        ));
    }
    if first.has_declarations != second.has_declarations {
        return Err(conflict(
            "has-declarations",
            first.has_declarations.to_string(),
            second.has_declarations.to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> DependencyInput {
        DependencyInput::new()
            .node(NodeDecl::code("a.c", "m1"))
            .node(NodeDecl::organizing("a", "m1"))
            .node(NodeDecl::code("a.b", "m1"))
    }

    fn build(input: &DependencyInput) -> Result<Graph, AnalysisError> {
        Graph::build(input, ".")
    }

    #[test]
    fn ids_follow_identifier_order() {
        let graph = build(&abc()).unwrap();
        let ids: Vec<&str> = graph.nodes().map(|(_, n)| n.id()).collect();
        assert_eq!(ids, vec!["a", "a.b", "a.c"]);
        assert_eq!(graph.lookup("a.b").map(NodeId::index), Some(1));
    }

    #[test]
    fn identical_redeclaration_is_accepted() {
        let input = abc().node(NodeDecl::code("a.b", "m1"));
        let graph = build(&input).unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn conflicting_redeclaration_is_malformed() {
        let input = abc().node(NodeDecl::code("a.b", "m2"));
        let err = build(&input).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedEdge(MalformedEdge::ConflictingDeclaration { field: "module", .. })
        ));
    }

    #[test]
    fn undeclared_endpoint_is_malformed() {
        let input = abc().edge(EdgeDecl::package("a.b", "a.z"));
        let err = build(&input).unwrap_err();
        match err {
            AnalysisError::MalformedEdge(MalformedEdge::UndeclaredNode { missing, .. }) => {
                assert_eq!(missing, "a.z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_edge_is_rejected() {
        let input = abc().edge(EdgeDecl::package("a.b", "a.b"));
        assert!(matches!(
            build(&input),
            Err(AnalysisError::SelfReference { node }) if node == "a.b"
        ));
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let input = abc().node(NodeDecl::code("a..d", "m1"));
        assert!(matches!(
            build(&input),
            Err(AnalysisError::MalformedEdge(MalformedEdge::InvalidIdentifier { .. }))
        ));
    }

    #[test]
    fn cross_module_package_edge_is_rejected() {
        let input = DependencyInput::new()
            .node(NodeDecl::code("x", "m1"))
            .node(NodeDecl::code("y", "m2"))
            .edge(EdgeDecl::package("x", "y"));
        assert!(matches!(
            build(&input),
            Err(AnalysisError::MalformedEdge(MalformedEdge::CrossModulePackageEdge { .. }))
        ));
    }

    #[test]
    fn cross_module_module_edge_is_accepted() {
        let input = DependencyInput::new()
            .node(NodeDecl::code("x", "m1"))
            .node(NodeDecl::code("y", "m2"))
            .edge(EdgeDecl::module("x", "y"));
        assert_eq!(build(&input).unwrap().edge_count(), 1);
    }

    #[test]
    fn duplicate_references_collapse() {
        let input = abc()
            .edge(EdgeDecl::package("a.b", "a.c"))
            .edge(EdgeDecl::package("a.b", "a.c"))
            .edge(EdgeDecl::module("a.b", "a.c"));
        let graph = build(&input).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn mixed_evidence_collapses_to_invocation() {
        let input = abc()
            .edge(EdgeDecl::package("a.b", "a.c").with_evidence(Evidence::DataReference))
            .edge(EdgeDecl::package("a.b", "a.c"))
            .edge(EdgeDecl::package("a.c", "a").with_evidence(Evidence::DataReference))
            .edge(EdgeDecl::package("a.c", "a").with_evidence(Evidence::DataReference));
        let graph = build(&input).unwrap();
        let (a, b, c) = (
            graph.lookup("a").unwrap(),
            graph.lookup("a.b").unwrap(),
            graph.lookup("a.c").unwrap(),
        );
        assert_eq!(
            graph.edge_evidence(b, c, EdgeScope::PackageLevel),
            Some(Evidence::Invocation)
        );
        assert_eq!(
            graph.edge_evidence(c, a, EdgeScope::PackageLevel),
            Some(Evidence::DataReference)
        );
    }

    #[test]
    fn adjacency_is_scoped() {
        let input = abc()
            .edge(EdgeDecl::package("a.b", "a.c"))
            .edge(EdgeDecl::module("a.b", "a"));
        let graph = build(&input).unwrap();
        let (a, b, c) = (
            graph.lookup("a").unwrap(),
            graph.lookup("a.b").unwrap(),
            graph.lookup("a.c").unwrap(),
        );
        assert_eq!(
            graph.successors(b, EdgeScope::PackageLevel).collect::<Vec<_>>(),
            vec![c]
        );
        assert_eq!(
            graph.successors(b, EdgeScope::ModuleLevel).collect::<Vec<_>>(),
            vec![a]
        );
    }

    #[test]
    fn hierarchy_queries() {
        let input = abc().node(NodeDecl::code("ab", "m1"));
        let graph = build(&input).unwrap();
        let (a, b, ab) = (
            graph.lookup("a").unwrap(),
            graph.lookup("a.b").unwrap(),
            graph.lookup("ab").unwrap(),
        );
        assert!(graph.is_strict_ancestor(a, b));
        assert!(!graph.is_strict_ancestor(b, a));
        assert!(!graph.is_strict_ancestor(a, ab));
        assert!(graph.has_descendants(a));
        assert!(!graph.has_descendants(b));
        assert!(!graph.has_descendants(ab));
    }

    #[test]
    fn edges_iterate_in_identifier_order() {
        let input = abc()
            .edge(EdgeDecl::package("a.c", "a.b"))
            .edge(EdgeDecl::package("a.b", "a.c"))
            .edge(EdgeDecl::package("a.b", "a"));
        let graph = build(&input).unwrap();
        let pairs: Vec<(&str, &str)> = graph
            .edges()
            .map(|e| (graph.node(e.from).id(), graph.node(e.to).id()))
            .collect();
        assert_eq!(pairs, vec![("a.b", "a"), ("a.b", "a.c"), ("a.c", "a.b")]);
    }
}
