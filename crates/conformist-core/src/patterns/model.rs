//! Pure domain model for governed exception patterns.
//!
//! This module contains no serde and no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes.

use std::collections::HashSet;
use std::fmt;

use crate::types::{Evidence, ViolationKind};
use crate::utils::paths;

use super::PatternError;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated pattern name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternName(String);

impl PatternName {
    /// Creates a new pattern name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, PatternError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(PatternError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ────────────────────────────────────────────
// Predicates
// ────────────────────────────────────────────

/// Structural predicate over a violation's shape.
///
/// The set is closed; tables naming anything else are rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// All members share the same identifier before `marker`, and at least
    /// one member contains it (e.g., `Outer` and `Outer$Inner`).
    SharedStem {
        /// Inner-unit separator marker.
        marker: String,
    },
    /// Every member identifier contains `token`.
    ContainsToken {
        /// Required substring.
        token: String,
    },
    /// Every edge behind the violation carries this evidence.
    Evidence(Evidence),
    /// Every member is `prefix` or lies under it.
    UnderPrefix {
        /// Package prefix.
        prefix: String,
    },
}

impl Predicate {
    /// Returns the predicate name as written in pattern tables.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SharedStem { .. } => "shared-stem",
            Self::ContainsToken { .. } => "contains-token",
            Self::Evidence(_) => "evidence",
            Self::UnderPrefix { .. } => "under-prefix",
        }
    }

    /// Returns the name of a string argument that is empty, if any.
    ///
    /// An empty marker, token or prefix would match every identifier.
    #[must_use]
    pub fn empty_argument(&self) -> Option<&'static str> {
        match self {
            Self::SharedStem { marker } if marker.is_empty() => Some("marker"),
            Self::ContainsToken { token } if token.is_empty() => Some("token"),
            Self::UnderPrefix { prefix } if prefix.is_empty() => Some("prefix"),
            _ => None,
        }
    }

    /// Tests the predicate against member identifiers and edge evidence.
    ///
    /// An empty member or evidence list never satisfies a predicate over it,
    /// nor does a predicate with an empty argument.
    #[must_use]
    pub fn matches(&self, members: &[&str], evidence: &[Evidence], separator: &str) -> bool {
        if self.empty_argument().is_some() {
            return false;
        }
        match self {
            Self::SharedStem { marker } => {
                let Some(first) = members.first() else {
                    return false;
                };
                let stem = paths::stem(first, marker);
                members.iter().any(|m| m.contains(marker.as_str()))
                    && members.iter().all(|m| paths::stem(m, marker) == stem)
            }
            Self::ContainsToken { token } => {
                !members.is_empty() && members.iter().all(|m| m.contains(token.as_str()))
            }
            Self::Evidence(expected) => {
                !evidence.is_empty() && evidence.iter().all(|e| e == expected)
            }
            Self::UnderPrefix { prefix } => {
                !members.is_empty()
                    && members
                        .iter()
                        .all(|m| paths::is_under(m, prefix, separator))
            }
        }
    }
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// A named, governed exception pattern.
#[derive(Debug, Clone)]
pub struct ExceptionPattern {
    name: PatternName,
    predicate: Predicate,
    applies_to: Vec<ViolationKind>,
    active: bool,
    rationale: Option<String>,
}

impl ExceptionPattern {
    /// Creates a new active pattern applying to every violation kind.
    #[must_use]
    pub fn new(name: PatternName, predicate: Predicate) -> Self {
        Self {
            name,
            predicate,
            applies_to: Vec::new(),
            active: true,
            rationale: None,
        }
    }

    /// Restricts the pattern to the given kinds.
    #[must_use]
    pub fn with_applies_to(mut self, kinds: Vec<ViolationKind>) -> Self {
        self.applies_to = kinds;
        self
    }

    /// Sets whether the pattern is in force.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Records the decision behind this pattern.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Returns the pattern name.
    #[must_use]
    pub fn name(&self) -> &PatternName {
        &self.name
    }

    /// Returns the predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Returns the kinds this pattern is limited to (empty means all).
    #[must_use]
    pub fn applies_to(&self) -> &[ViolationKind] {
        &self.applies_to
    }

    /// Returns whether the pattern is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the recorded rationale.
    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// Tests whether this pattern fully matches a violation's shape.
    #[must_use]
    pub fn matches(
        &self,
        kind: ViolationKind,
        members: &[&str],
        evidence: &[Evidence],
        separator: &str,
    ) -> bool {
        self.active
            && (self.applies_to.is_empty() || self.applies_to.contains(&kind))
            && self.predicate.matches(members, evidence, separator)
    }
}

/// Versioned, ordered table of exception patterns (aggregate root).
#[derive(Debug, Clone)]
pub struct PatternTable {
    version: Option<String>,
    patterns: Vec<ExceptionPattern>,
}

impl PatternTable {
    /// Creates a validated pattern table.
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are present without a version, a
    /// predicate has an empty argument, or two patterns share a name.
    pub fn new(
        version: Option<String>,
        patterns: Vec<ExceptionPattern>,
    ) -> Result<Self, PatternError> {
        if !patterns.is_empty() && version.as_deref().map_or(true, str::is_empty) {
            return Err(PatternError::MissingVersion);
        }

        let mut seen = HashSet::new();
        for pattern in &patterns {
            if let Some(argument) = pattern.predicate.empty_argument() {
                return Err(PatternError::EmptyArgument {
                    pattern: pattern.name.to_string(),
                    argument,
                });
            }
            if !seen.insert(pattern.name.as_str()) {
                return Err(PatternError::DuplicateName {
                    name: pattern.name.to_string(),
                });
            }
        }

        Ok(Self { version, patterns })
    }

    /// Creates an empty table (identity exception engine).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: None,
            patterns: Vec::new(),
        }
    }

    /// Returns the governance version, if the table has one.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns all patterns in evaluation order.
    #[must_use]
    pub fn patterns(&self) -> &[ExceptionPattern] {
        &self.patterns
    }

    /// Returns the patterns currently in force.
    pub fn active(&self) -> impl Iterator<Item = &ExceptionPattern> {
        self.patterns.iter().filter(|p| p.active)
    }

    /// Returns true if no pattern is in force.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

impl fmt::Display for PatternTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "version {version}")?,
            None => write!(f, "unversioned")?,
        }
        write!(f, " ({} active)", self.active().count())
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::empty()
    }
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
