//! Zero-optimal metrics and the final violation list.

use serde::{Deserialize, Serialize};

use crate::types::{Scope, Severity, VerticalDirection, Violation, ViolationKind};

/// One counter per violation kind and scope; a conformant graph reads all zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Cycles across release units.
    pub module_cycles: usize,
    /// Cycles within one release unit.
    pub package_cycles: usize,
    /// Module-level edges from a descendant to its ancestor.
    pub module_descendant_on_ancestor: usize,
    /// Package-level edges from a descendant to its ancestor.
    pub package_descendant_on_ancestor: usize,
    /// Module-level edges from an ancestor to its descendant.
    pub module_ancestor_on_descendant: usize,
    /// Package-level edges from an ancestor to its descendant.
    pub package_ancestor_on_descendant: usize,
    /// Packages mixing sub-packages and declarations.
    pub parent_has_code: usize,
}

impl Counts {
    fn slot(&mut self, kind: ViolationKind, scope: Scope) -> &mut usize {
        use VerticalDirection::{AncestorOnDescendant, DescendantOnAncestor};
        match (kind, scope) {
            (ViolationKind::Cycle, Scope::Module) => &mut self.module_cycles,
            (ViolationKind::Cycle, Scope::Package) => &mut self.package_cycles,
            (ViolationKind::VerticalDependency(DescendantOnAncestor), Scope::Module) => {
                &mut self.module_descendant_on_ancestor
            }
            (ViolationKind::VerticalDependency(DescendantOnAncestor), Scope::Package) => {
                &mut self.package_descendant_on_ancestor
            }
            (ViolationKind::VerticalDependency(AncestorOnDescendant), Scope::Module) => {
                &mut self.module_ancestor_on_descendant
            }
            (ViolationKind::VerticalDependency(AncestorOnDescendant), Scope::Package) => {
                &mut self.package_ancestor_on_descendant
            }
            (ViolationKind::ParentHasCode, _) => &mut self.parent_has_code,
        }
    }

    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cycles() + self.vertical() + self.parent_has_code
    }

    /// Sum of both cycle counters.
    #[must_use]
    pub fn cycles(&self) -> usize {
        self.module_cycles + self.package_cycles
    }

    /// Sum of all vertical dependency counters.
    #[must_use]
    pub fn vertical(&self) -> usize {
        self.module_descendant_on_ancestor
            + self.package_descendant_on_ancestor
            + self.module_ancestor_on_descendant
            + self.package_ancestor_on_descendant
    }
}

/// Immutable output of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Per-kind, per-scope counters.
    #[serde(flatten)]
    pub counts: Counts,
    /// Surviving violations, highest severity first.
    pub violations: Vec<Violation>,
}

impl Report {
    /// Aggregates classified violations into a report.
    ///
    /// Identical violations are reported once. Ordering is by severity
    /// (highest first), then kind, scope and members.
    #[must_use]
    pub fn from_violations(mut violations: Vec<Violation>) -> Self {
        violations.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.scope.cmp(&b.scope))
                .then_with(|| a.members.cmp(&b.members))
        });
        violations.dedup();

        let mut counts = Counts::default();
        for v in &violations {
            *counts.slot(v.kind, v.scope) += 1;
        }

        Self { counts, violations }
    }

    /// Returns the number of violations of `kind` at `scope`.
    #[must_use]
    pub fn count(&self, kind: ViolationKind, scope: Scope) -> usize {
        self.violations
            .iter()
            .filter(|v| v.kind == kind && v.scope == scope)
            .count()
    }

    /// Total number of violations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.violations.len()
    }

    /// Returns true when every metric reads zero.
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Checks if any violation meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations with exactly the given severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity as `(high, medium, low)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        )
    }

    /// One-line summary of the metrics.
    #[must_use]
    pub fn summary(&self) -> String {
        let (high, medium, low) = self.count_by_severity();
        format!(
            "{} violation(s): {} high, {} medium, {} low ({} cycle(s), {} vertical, {} parent-has-code)",
            self.total(),
            high,
            medium,
            low,
            self.counts.cycles(),
            self.counts.vertical(),
            self.counts.parent_has_code,
        )
    }

    /// Formats the report as a multi-line text block.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for v in &self.violations {
            let _ = writeln!(report, "{}", v.format());
        }
        let _ = writeln!(report, "{}", self.summary());
        report
    }
}
