use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional project configuration file
pub const CONFIG_FILE: &str = "rowscan.toml";

/// Project context for rowscan operations
pub struct ProjectContext {
    /// Directory that relative config paths are resolved against
    pub base_dir: PathBuf,
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    /// Loaded configuration (defaults when no file was found)
    pub config: RowscanConfig,
}

/// Configuration stored in rowscan.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowscanConfig {
    #[serde(default)]
    pub generate: GenerateSettings,
}

/// Defaults for `rowscan generate`; command-line flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateSettings {
    /// Files or directories to scan
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Output file
    pub output: Option<PathBuf>,
    /// Generated module name
    pub unit: Option<String>,
    #[serde(default)]
    pub unexport: bool,
    /// Emit select/insert/update helpers
    #[serde(default)]
    pub funcs: bool,
    /// Comma-separated record names
    pub whitelist: Option<String>,
    /// Path imported in place of `super::*`
    pub import: Option<String>,
}

impl ProjectContext {
    /// Load the explicit config file, or find rowscan.toml from the current
    /// directory upwards.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find rowscan.toml starting from the given directory
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }

            // Stop at the project root
            if current.join("Cargo.toml").exists() || !current.pop() {
                return Ok(Self {
                    base_dir: start.to_path_buf(),
                    config_path: None,
                    config: RowscanConfig::default(),
                });
            }
        }
    }

    /// Load a specific config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: RowscanConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            base_dir,
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Resolve a path from the config file against its directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RowscanConfig::default();
        assert!(config.generate.paths.is_empty());
        assert!(!config.generate.unexport);
        assert!(!config.generate.funcs);
        assert!(config.generate.output.is_none());
    }

    #[test]
    fn test_config_parse() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[generate]
paths = ["src/models"]
output = "src/models/scans.rs"
unexport = true
funcs = true
whitelist = "Post,Comment"
"#,
        )
        .unwrap();

        let ctx = ProjectContext::from_file(&path).unwrap();
        assert_eq!(ctx.config.generate.paths, [PathBuf::from("src/models")]);
        assert!(ctx.config.generate.unexport);
        assert!(ctx.config.generate.funcs);
        assert_eq!(ctx.config.generate.whitelist.as_deref(), Some("Post,Comment"));
        assert_eq!(ctx.resolve(Path::new("src/models")), temp_dir.path().join("src/models"));
    }

    #[test]
    fn test_find_from_stops_at_project_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Cargo.toml"), "[package]").unwrap();
        let nested = temp_dir.path().join("src/models");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert!(ctx.config_path.is_none());

        std::fs::write(temp_dir.path().join(CONFIG_FILE), "[generate]\nfuncs = true\n").unwrap();
        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert_eq!(ctx.config_path, Some(temp_dir.path().join(CONFIG_FILE)));
        assert!(ctx.config.generate.funcs);
    }

    #[test]
    fn test_config_serialization() {
        let config = RowscanConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generate]"));
    }
}
