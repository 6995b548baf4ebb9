//! Configuration types for conformist.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::Severity;
use crate::utils::DEFAULT_SEPARATOR;

/// Top-level configuration, usually read from `conformist.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Severity threshold for failure (default: any violation fails).
    /// Violations at or above this severity make the run non-conformant.
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Path to the governed exception pattern table.
    #[serde(default)]
    pub patterns: Option<PathBuf>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Effective failure threshold.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Low)
    }

    /// Resolves the pattern table path relative to `base`.
    #[must_use]
    pub fn patterns_path(&self, base: &Path) -> Option<PathBuf> {
        self.patterns.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        })
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Hierarchy separator in identifiers (default: `.`).
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Whether the two detectors run concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            parallel: true,
        }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analyzer.separator, ".");
        assert!(config.analyzer.parallel);
        assert_eq!(config.fail_threshold(), Severity::Low);
        assert!(config.patterns.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
fail-on = "high"
patterns = "governance/patterns.toml"

[analyzer]
separator = "::"
parallel = false
"#,
        )
        .unwrap();

        assert_eq!(config.fail_on, Some(Severity::High));
        assert_eq!(config.analyzer.separator, "::");
        assert!(!config.analyzer.parallel);
        assert_eq!(
            config.patterns_path(Path::new("/repo")),
            Some(PathBuf::from("/repo/governance/patterns.toml"))
        );
    }

    #[test]
    fn absolute_patterns_path_is_kept() {
        let config = Config {
            patterns: Some(PathBuf::from("/etc/patterns.toml")),
            ..Config::default()
        };
        assert_eq!(
            config.patterns_path(Path::new("/repo")),
            Some(PathBuf::from("/etc/patterns.toml"))
        );
    }

    #[test]
    fn parse_rejects_unknown_severity() {
        let result = Config::parse(r#"fail-on = "critical""#);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn from_file_reports_missing_path() {
        let result = Config::from_file(Path::new("/nonexistent/conformist.toml"));
        match result {
            Err(ConfigError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/conformist.toml"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
