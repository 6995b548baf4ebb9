//! Exception engine: removes findings fully matched by a governed pattern.
//!
//! This is the only path by which a finding leaves the report. There is no
//! ad-hoc ignore list; the engine only evaluates the pattern table it was
//! given.
//!
//! Patterns are evaluated in table order and the first full match removes
//! the finding. Overlapping patterns therefore never conflict.

use std::collections::BTreeMap;

use tracing::debug;

use crate::graph::Graph;
use crate::patterns::{ExceptionPattern, PatternTable};
use crate::types::Finding;

/// Result of applying the pattern table to a list of findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionOutcome {
    /// Findings no pattern matched, in input order.
    pub kept: Vec<Finding>,
    /// Number of findings removed, per pattern name.
    pub hits: BTreeMap<String, usize>,
}

impl ExceptionOutcome {
    /// Total number of removed findings.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.hits.values().sum()
    }
}

/// Stateless evaluator over a fixed pattern table.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionEngine<'t> {
    table: &'t PatternTable,
}

impl<'t> ExceptionEngine<'t> {
    /// Creates an engine over the given table.
    #[must_use]
    pub fn new(table: &'t PatternTable) -> Self {
        Self { table }
    }

    /// Returns the first active pattern that fully matches `finding`.
    #[must_use]
    pub fn matching_pattern(&self, finding: &Finding, graph: &Graph) -> Option<&'t ExceptionPattern> {
        let members: Vec<&str> = finding
            .members
            .iter()
            .map(|m| graph.node(*m).id())
            .collect();
        self.table.active().find(|pattern| {
            pattern.matches(
                finding.kind,
                &members,
                &finding.evidence,
                graph.separator(),
            )
        })
    }

    /// Removes every finding matched by an active pattern.
    ///
    /// With no active patterns this is the identity transform.
    #[must_use]
    pub fn apply(&self, findings: Vec<Finding>, graph: &Graph) -> ExceptionOutcome {
        if self.table.is_empty() {
            return ExceptionOutcome {
                kept: findings,
                hits: BTreeMap::new(),
            };
        }

        let mut outcome = ExceptionOutcome::default();
        for finding in findings {
            match self.matching_pattern(&finding, graph) {
                Some(pattern) => {
                    debug!(
                        "Exempted {} {} by pattern `{}` ({})",
                        finding.scope,
                        finding.kind,
                        pattern.name(),
                        pattern.predicate().name()
                    );
                    *outcome.hits.entry(pattern.name().to_string()).or_default() += 1;
                }
                None => outcome.kept.push(finding),
            }
        }
        outcome
    }
}
