//! Core analyzer orchestrating one conformance run.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::exceptions::ExceptionEngine;
use crate::graph::Graph;
use crate::input::DependencyInput;
use crate::patterns::PatternTable;
use crate::report::Report;
use crate::types::{Finding, Violation};
use crate::utils::DEFAULT_SEPARATOR;
use crate::{cycles, hierarchy, severity};

/// Builder for configuring an [`Analyzer`].
///
/// Explicit settings take precedence over values from [`Config`].
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    separator: Option<String>,
    patterns: Option<PatternTable>,
    patterns_toml: Option<String>,
    parallel: Option<bool>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier segment separator (default: `.`).
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets a validated exception pattern table.
    #[must_use]
    pub fn patterns(mut self, table: PatternTable) -> Self {
        self.patterns = Some(table);
        self.patterns_toml = None;
        self
    }

    /// Sets the exception pattern table as TOML text, validated on build.
    #[must_use]
    pub fn patterns_toml(mut self, content: impl Into<String>) -> Self {
        self.patterns_toml = Some(content.into());
        self.patterns = None;
        self
    }

    /// Sets whether the detectors run concurrently (default: true).
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptySeparator`] for an empty separator and
    /// [`AnalysisError::InvalidPattern`] if pattern TOML fails validation.
    pub fn build(self) -> Result<Analyzer, AnalysisError> {
        let separator = self
            .separator
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.separator.clone()))
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());
        if separator.is_empty() {
            return Err(AnalysisError::EmptySeparator);
        }

        let parallel = self
            .parallel
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.parallel))
            .unwrap_or(true);

        let patterns = match (self.patterns, self.patterns_toml) {
            (_, Some(content)) => PatternTable::from_toml(&content)?,
            (Some(table), None) => table,
            (None, None) => PatternTable::empty(),
        };

        Ok(Analyzer {
            separator,
            patterns,
            parallel,
        })
    }
}

/// Report plus the exemptions granted while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// The conformance report.
    pub report: Report,
    /// Number of findings removed, per pattern name.
    pub exemptions: BTreeMap<String, usize>,
}

impl Analysis {
    /// Total number of exempted findings.
    #[must_use]
    pub fn exempted(&self) -> usize {
        self.exemptions.values().sum()
    }
}

/// The main analyzer that orchestrates a conformance run.
///
/// Use [`Analyzer::builder()`] to construct an instance. An analyzer holds
/// no per-run state and may be reused across inputs.
#[derive(Debug)]
pub struct Analyzer {
    separator: String,
    patterns: PatternTable,
    parallel: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the identifier segment separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the exception pattern table.
    #[must_use]
    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Returns whether the detectors run concurrently.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Analyzes a dependency input and returns the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the input fails graph validation. Detection
    /// itself cannot fail.
    pub fn analyze(&self, input: &DependencyInput) -> Result<Report, AnalysisError> {
        self.run(input).map(|analysis| analysis.report)
    }

    /// Analyzes a dependency input, keeping the per-pattern exemption counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the input fails graph validation.
    pub fn run(&self, input: &DependencyInput) -> Result<Analysis, AnalysisError> {
        info!(
            "Starting analysis of {} node(s), {} edge(s), patterns {}",
            input.nodes.len(),
            input.edges.len(),
            self.patterns
        );

        let graph = Graph::build(input, &self.separator)?;
        let findings = self.detect(&graph);
        debug!("Detectors produced {} finding(s)", findings.len());

        let outcome = ExceptionEngine::new(&self.patterns).apply(findings, &graph);
        if outcome.removed() > 0 {
            info!(
                "Exempted {} finding(s) via {} pattern(s)",
                outcome.removed(),
                outcome.hits.len()
            );
        }

        let violations: Vec<Violation> = outcome
            .kept
            .iter()
            .map(|finding| severity::finalize(finding, &graph))
            .collect();
        let report = Report::from_violations(violations);

        info!("Analysis complete: {}", report.summary());

        Ok(Analysis {
            report,
            exemptions: outcome.hits,
        })
    }

    /// Runs both detectors; cycles first, then hierarchy findings.
    fn detect(&self, graph: &Graph) -> Vec<Finding> {
        let (mut findings, hierarchy) = if self.parallel {
            rayon::join(|| cycles::detect(graph), || hierarchy::detect(graph))
        } else {
            (cycles::detect(graph), hierarchy::detect(graph))
        };
        findings.extend(hierarchy);
        findings
    }
}
