//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# conformist configuration

# Fail when any violation is at or above this severity: "high", "medium", "low"
fail-on = "medium"

# Governed exception pattern table, relative to this file
# patterns = "conformist-patterns.toml"

[analyzer]
# Segment separator in node identifiers
separator = "."

# Run cycle and hierarchy detection concurrently
parallel = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("conformist.toml");
    write_config(config_path, force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Export your dependency graph as JSON from the language front end");
    println!("  2. Run: conformist check deps.json");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
