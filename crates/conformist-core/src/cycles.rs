//! Cycle detection at module and package scope.
//!
//! Uses Tarjan's strongly connected components algorithm, O(V + E) per
//! scope. Every SCC with more than one member is one cycle; a node that is
//! its own SCC is never reported.
//!
//! Roots and successors are visited in identifier order. Cycle members are
//! listed in DFS discovery order, rotated to start at the smallest
//! identifier, so reports are stable across input orderings.

use tracing::debug;

use crate::graph::{Graph, NodeId};
use crate::types::{EdgeScope, Finding, ViolationKind};

/// Finds all cycles in both scoped subgraphs.
///
/// Module-scope cycles come first, then package-scope cycles.
#[must_use]
pub fn detect(graph: &Graph) -> Vec<Finding> {
    let mut findings = detect_in_scope(graph, EdgeScope::ModuleLevel);
    findings.extend(detect_in_scope(graph, EdgeScope::PackageLevel));
    debug!("Cycle detection found {} cycle(s)", findings.len());
    findings
}

/// Finds all cycles among edges of a single scope.
#[must_use]
pub fn detect_in_scope(graph: &Graph, scope: EdgeScope) -> Vec<Finding> {
    let mut in_component = vec![false; graph.len()];
    let mut findings = Vec::new();

    for members in strongly_connected(graph, scope) {
        for m in &members {
            in_component[m.index()] = true;
        }

        let mut evidence = Vec::new();
        for &from in &members {
            for to in graph.successors(from, scope) {
                if !in_component[to.index()] {
                    continue;
                }
                if let Some(e) = graph.edge_evidence(from, to, scope) {
                    evidence.push(e);
                }
            }
        }

        for m in &members {
            in_component[m.index()] = false;
        }
        findings.push(
            Finding::new(ViolationKind::Cycle, scope.violation_scope(), members)
                .with_evidence(evidence),
        );
    }

    findings
}

/// Returns every non-trivial SCC of the `scope` subgraph.
///
/// Components are emitted in Tarjan completion order (reverse topological).
#[must_use]
pub fn strongly_connected(graph: &Graph, scope: EdgeScope) -> Vec<Vec<NodeId>> {
    Tarjan::new(graph, scope).run()
}

struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    cursor: usize,
}

struct Tarjan<'g> {
    graph: &'g Graph,
    scope: EdgeScope,
    discovery: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    next_index: usize,
    components: Vec<Vec<NodeId>>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g Graph, scope: EdgeScope) -> Self {
        Self {
            graph,
            scope,
            discovery: vec![None; graph.len()],
            lowlink: vec![0; graph.len()],
            on_stack: vec![false; graph.len()],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<NodeId>> {
        let graph = self.graph;
        for (root, _) in graph.nodes() {
            if self.discovery[root.index()].is_none() {
                self.visit(root);
            }
        }
        self.components
    }

    fn discover(&mut self, node: NodeId) -> Frame {
        let i = node.index();
        self.discovery[i] = Some(self.next_index);
        self.lowlink[i] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[i] = true;
        Frame {
            node,
            successors: self.graph.successors(node, self.scope).collect(),
            cursor: 0,
        }
    }

    /// Iterative DFS so deep dependency chains cannot overflow the call stack.
    fn visit(&mut self, root: NodeId) {
        let mut call_stack = vec![self.discover(root)];

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.node;
            if let Some(next) = frame.successors.get(frame.cursor).copied() {
                frame.cursor += 1;
                match self.discovery[next.index()] {
                    None => {
                        let child = self.discover(next);
                        call_stack.push(child);
                    }
                    Some(next_index) if self.on_stack[next.index()] => {
                        let low = &mut self.lowlink[node.index()];
                        *low = (*low).min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            if let Some(parent) = call_stack.last() {
                let child_low = self.lowlink[node.index()];
                let low = &mut self.lowlink[parent.node.index()];
                *low = (*low).min(child_low);
            }
            if Some(self.lowlink[node.index()]) == self.discovery[node.index()] {
                self.close_component(node);
            }
        }
    }

    fn close_component(&mut self, root: NodeId) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member.index()] = false;
            component.push(member);
            if member == root {
                break;
            }
        }
        if component.len() < 2 {
            return;
        }

        component.sort_by_key(|m| self.discovery[m.index()]);
        if let Some(start) = component
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| **m)
            .map(|(pos, _)| pos)
        {
            component.rotate_left(start);
        }
        self.components.push(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DependencyInput, EdgeDecl, NodeDecl};
    use crate::types::{Evidence, Scope};

    fn graph(ids: &[&str], edges: &[EdgeDecl]) -> Graph {
        let mut input = DependencyInput::new();
        for id in ids {
            input = input.node(NodeDecl::code(*id, "m1"));
        }
        input.edges.extend(edges.iter().cloned());
        Graph::build(&input, ".").unwrap()
    }

    fn names(graph: &Graph, members: &[NodeId]) -> Vec<String> {
        members
            .iter()
            .map(|m| graph.node(*m).id().to_string())
            .collect()
    }

    #[test]
    fn two_node_cycle() {
        let g = graph(
            &["p.b", "p.c"],
            &[EdgeDecl::package("p.b", "p.c"), EdgeDecl::package("p.c", "p.b")],
        );
        let findings = detect(&g);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, ViolationKind::Cycle);
        assert_eq!(findings[0].scope, Scope::Package);
        assert_eq!(names(&g, &findings[0].members), vec!["p.b", "p.c"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let g = graph(
            &["a", "b", "c"],
            &[EdgeDecl::package("a", "b"), EdgeDecl::package("b", "c"), EdgeDecl::package("a", "c")],
        );
        assert!(detect(&g).is_empty());
    }

    #[test]
    fn members_rotate_to_smallest_identifier() {
        // DFS from `a` discovers d, c, b; the cycle is b -> d -> c -> b.
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                EdgeDecl::package("a", "d"),
                EdgeDecl::package("d", "c"),
                EdgeDecl::package("c", "b"),
                EdgeDecl::package("b", "d"),
            ],
        );
        let findings = detect(&g);
        assert_eq!(findings.len(), 1);
        assert_eq!(names(&g, &findings[0].members), vec!["b", "d", "c"]);
    }

    #[test]
    fn disjoint_cycles_are_reported_separately() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[
                EdgeDecl::package("a", "b"),
                EdgeDecl::package("b", "a"),
                EdgeDecl::package("c", "d"),
                EdgeDecl::package("d", "e"),
                EdgeDecl::package("e", "c"),
                EdgeDecl::package("b", "c"),
            ],
        );
        let mut cycles: Vec<Vec<String>> = detect(&g)
            .iter()
            .map(|f| names(&g, &f.members))
            .collect();
        cycles.sort();
        assert_eq!(cycles, vec![vec!["a", "b"], vec!["c", "d", "e"]]);
    }

    #[test]
    fn scopes_do_not_mix() {
        // One direction at module level, the other at package level: no cycle.
        let g = graph(
            &["a", "b"],
            &[EdgeDecl::module("a", "b"), EdgeDecl::package("b", "a")],
        );
        assert!(detect(&g).is_empty());
    }

    #[test]
    fn module_scope_cycle() {
        let mut input = DependencyInput::new()
            .node(NodeDecl::code("x", "m1"))
            .node(NodeDecl::code("y", "m2"));
        input.edges = vec![EdgeDecl::module("x", "y"), EdgeDecl::module("y", "x")];
        let g = Graph::build(&input, ".").unwrap();
        let findings = detect(&g);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].scope, Scope::Module);
    }

    #[test]
    fn evidence_covers_only_in_component_edges() {
        let g = graph(
            &["a", "b", "c"],
            &[
                EdgeDecl::package("a", "b").with_evidence(Evidence::DataReference),
                EdgeDecl::package("b", "a").with_evidence(Evidence::DataReference),
                EdgeDecl::package("b", "c"),
            ],
        );
        let findings = detect(&g);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].evidence,
            vec![Evidence::DataReference, Evidence::DataReference]
        );
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("n{i:05}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut edges: Vec<EdgeDecl> = ids
            .windows(2)
            .map(|w| EdgeDecl::package(w[0].clone(), w[1].clone()))
            .collect();
        edges.push(EdgeDecl::package(ids[ids.len() - 1].clone(), ids[0].clone()));
        let g = graph(&id_refs, &edges);
        let findings = detect(&g);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].members.len(), 20_000);
        assert_eq!(g.node(findings[0].members[0]).id(), "n00000");
    }
}
