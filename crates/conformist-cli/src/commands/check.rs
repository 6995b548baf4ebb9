//! Check command implementation.

use anyhow::{Context, Result};
use conformist_core::{Analyzer, Config, DependencyInput};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `false` when a violation meets the configured `fail-on` threshold.
pub fn run(
    input: &Path,
    format: OutputFormat,
    patterns: Option<&Path>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;

    let patterns = patterns.map(Path::to_path_buf).or_else(|| {
        source
            .path()
            .and_then(|p| config.patterns_path(p.parent().unwrap_or_else(|| Path::new("."))))
    });

    let analyzer = build_analyzer(&config, patterns.as_deref())?;
    let dependencies = read_input(input)?;

    tracing::info!(
        "Analyzing {} ({} nodes, {} edges)",
        input.display(),
        dependencies.nodes.len(),
        dependencies.edges.len()
    );

    let analysis = analyzer.run(&dependencies).context("Analysis failed")?;

    super::output::print(&analysis, format)?;

    Ok(!analysis.report.has_violations_at(config.fail_threshold()))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

fn build_analyzer(config: &Config, patterns: Option<&Path>) -> Result<Analyzer> {
    let mut builder = Analyzer::builder().config(config);

    if let Some(path) = patterns {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read exception patterns: {}", path.display()))?;
        tracing::info!("Using exception patterns: {}", path.display());
        builder = builder.patterns_toml(content);
    }

    builder.build().context("Failed to build analyzer")
}

fn read_input(path: &Path) -> Result<DependencyInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dependency input: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid dependency input: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CYCLE: &str = r#"{
        "nodes": [
            { "id": "a", "kind": "organizing", "module": "m1" },
            { "id": "a.b", "kind": "code", "module": "m1", "has-declarations": true },
            { "id": "a.c", "kind": "code", "module": "m1", "has-declarations": true }
        ],
        "edges": [
            { "from": "a.b", "to": "a.c", "scope": "package" },
            { "from": "a.c", "to": "a.b", "scope": "package" }
        ]
    }"#;

    const FAMILY_PATTERNS: &str = r#"
version = "1"

[[pattern]]
name = "family"
predicate = "under-prefix"
prefix = "a"
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn read_input_parses_json() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "deps.json", CYCLE);
        let input = read_input(&path).unwrap();
        assert_eq!(input.nodes.len(), 3);
        assert_eq!(input.edges.len(), 2);
    }

    #[test]
    fn read_input_reports_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "deps.json", "{ not json");
        let err = read_input(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid dependency input"));
    }

    #[test]
    fn default_config_fails_on_any_violation() {
        let tmp = TempDir::new().unwrap();
        let input = write(tmp.path(), "deps.json", CYCLE);
        let conformant = run(&input, OutputFormat::Compact, None, &ConfigSource::Default).unwrap();
        assert!(!conformant);
    }

    #[test]
    fn fail_on_threshold_is_respected() {
        let tmp = TempDir::new().unwrap();
        let input = write(tmp.path(), "deps.json", CYCLE);
        let config = write(tmp.path(), "conformist.toml", "fail-on = \"high\"\n");

        // the package cycle is medium, below the threshold
        let conformant = run(
            &input,
            OutputFormat::Compact,
            None,
            &ConfigSource::Project(config),
        )
        .unwrap();
        assert!(conformant);
    }

    #[test]
    fn patterns_from_config_are_relative_to_config_dir() {
        let tmp = TempDir::new().unwrap();
        let input = write(tmp.path(), "deps.json", CYCLE);
        write(tmp.path(), "patterns.toml", FAMILY_PATTERNS);
        let config = write(tmp.path(), "conformist.toml", "patterns = \"patterns.toml\"\n");

        let conformant = run(
            &input,
            OutputFormat::Compact,
            None,
            &ConfigSource::Project(config),
        )
        .unwrap();
        assert!(conformant);
    }

    #[test]
    fn patterns_flag_is_used() {
        let tmp = TempDir::new().unwrap();
        let input = write(tmp.path(), "deps.json", CYCLE);
        let patterns = write(tmp.path(), "exceptions.toml", FAMILY_PATTERNS);

        let conformant = run(
            &input,
            OutputFormat::Json,
            Some(&patterns),
            &ConfigSource::Default,
        )
        .unwrap();
        assert!(conformant);
    }

    #[test]
    fn invalid_patterns_abort() {
        let tmp = TempDir::new().unwrap();
        let patterns = write(
            tmp.path(),
            "exceptions.toml",
            "[[pattern]]\nname = \"x\"\npredicate = \"whatever\"\n",
        );
        let result = build_analyzer(&Config::default(), Some(&patterns));
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let input = write(tmp.path(), "deps.json", CYCLE);
        let result = run(
            &input,
            OutputFormat::Text,
            None,
            &ConfigSource::Explicit(tmp.path().join("missing.toml")),
        );
        assert!(result.is_err());
    }
}
