//! Locates `conformist.toml` for a project.
//!
//! Search order, first hit wins:
//!
//! 1. `--config` flag (trusted as-is, even if missing)
//! 2. `{project}/conformist.toml`, then `{project}/.conformist.toml`
//! 3. `$CONFORMIST_CONFIG_DIR/config.toml`, else `~/.conformist/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Inside the project directory.
    Project(PathBuf),
    /// Inside the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for a config from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_FILES: [&str; 2] = ["conformist.toml", ".conformist.toml"];
const GLOBAL_FILE: &str = "config.toml";
const GLOBAL_DIR_ENV: &str = "CONFORMIST_CONFIG_DIR";

/// Resolves the configuration for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }
    search(&candidates(project_dir, global_config_dir().as_deref()))
}

/// Implicit locations in priority order.
fn candidates(project_dir: &Path, global_dir: Option<&Path>) -> Vec<ConfigSource> {
    PROJECT_FILES
        .iter()
        .map(|name| ConfigSource::Project(project_dir.join(name)))
        .chain(global_dir.map(|dir| ConfigSource::Global(dir.join(GLOBAL_FILE))))
        .collect()
}

fn search(candidates: &[ConfigSource]) -> ConfigSource {
    for candidate in candidates {
        if candidate.path().is_some_and(Path::exists) {
            tracing::debug!("Using config: {:?}", candidate);
            return candidate.clone();
        }
    }
    tracing::debug!(
        "No config among {} candidate(s), using defaults",
        candidates.len()
    );
    ConfigSource::Default
}

/// Global config directory: `$CONFORMIST_CONFIG_DIR`, else `~/.conformist/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(GLOBAL_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".conformist")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: PathBuf) -> PathBuf {
        fs::write(&path, "").unwrap();
        path
    }

    fn resolve_in(project: &Path, global: Option<&Path>) -> ConfigSource {
        search(&candidates(project, global))
    }

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path().join("conformist.toml"));

        let result = resolve(tmp.path(), Some(Path::new("/nonexistent.toml")));
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn project_file_found() {
        let tmp = TempDir::new().unwrap();
        let path = touch(tmp.path().join("conformist.toml"));
        assert_eq!(resolve_in(tmp.path(), None), ConfigSource::Project(path));
    }

    #[test]
    fn hidden_project_file_found() {
        let tmp = TempDir::new().unwrap();
        let path = touch(tmp.path().join(".conformist.toml"));
        assert_eq!(resolve_in(tmp.path(), None), ConfigSource::Project(path));
    }

    #[test]
    fn visible_file_preferred_over_hidden() {
        let tmp = TempDir::new().unwrap();
        let visible = touch(tmp.path().join("conformist.toml"));
        touch(tmp.path().join(".conformist.toml"));
        assert_eq!(resolve_in(tmp.path(), None), ConfigSource::Project(visible));
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_file = touch(global.path().join("config.toml"));

        assert_eq!(
            resolve_in(project.path(), Some(global.path())),
            ConfigSource::Global(global_file)
        );

        touch(project.path().join("conformist.toml"));
        assert!(matches!(
            resolve_in(project.path(), Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn empty_directories_yield_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_in(project.path(), Some(global.path())),
            ConfigSource::Default
        );
        assert_eq!(resolve_in(project.path(), None), ConfigSource::Default);
    }

    #[test]
    fn candidate_order() {
        let order: Vec<ConfigSource> = candidates(Path::new("/p"), Some(Path::new("/g")));
        assert_eq!(
            order,
            vec![
                ConfigSource::Project(PathBuf::from("/p/conformist.toml")),
                ConfigSource::Project(PathBuf::from("/p/.conformist.toml")),
                ConfigSource::Global(PathBuf::from("/g/config.toml")),
            ]
        );
    }

    #[test]
    fn source_accessors() {
        let p = PathBuf::from("/tmp/conformist.toml");
        assert_eq!(ConfigSource::Explicit(p.clone()).path(), Some(p.as_path()));
        assert!(ConfigSource::Default.path().is_none());
        assert!(ConfigSource::Global(p.clone()).is_global());
        assert!(!ConfigSource::Project(p).is_global());
    }
}
