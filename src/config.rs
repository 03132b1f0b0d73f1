//! Configuration for dx-styles
//!
//! Loaded from an optional `dx-styles.toml` next to the project root. Every
//! field has a default, so an empty (or absent) file yields a working setup
//! that watches `./src/**/*.tsx` and writes `styles.css`.

use crate::error::{Result, StyleError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "dx-styles.toml";

/// Which backend produces attribute spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    /// tree-sitter TSX grammar
    #[default]
    Syntax,
    /// Comment-stripping regular expression scan
    Regex,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the component tree
    pub source_dir: PathBuf,
    /// Extension (without the dot) of files that are scanned and watched
    pub extension: String,
    /// Compiled binary rule table
    pub rules: PathBuf,
    /// Generated stylesheet
    pub output: PathBuf,
    /// Quiescence window before a change triggers a cycle
    pub debounce_ms: u64,
    /// Rewrite sources to give class-bearing elements an `id`
    pub inject_ids: bool,
    /// Register ids already present in the tree before synthesizing new ones
    pub seed_existing_ids: bool,
    /// Append an empty `#id {}` block per generated id
    pub emit_id_selectors: bool,
    pub scanner: ScannerKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./src"),
            extension: "tsx".to_string(),
            rules: PathBuf::from("styles.bin"),
            output: PathBuf::from("styles.css"),
            debounce_ms: 50,
            inject_ids: true,
            seed_existing_ids: true,
            emit_id_selectors: false,
            scanner: ScannerKind::Syntax,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist. `DX_DEBOUNCE_MS` overrides the debounce window.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| StyleError::io(path, e))?;
            Self::from_toml(&content).map_err(|source| StyleError::Config {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            debug!("No config at {:?}, using defaults", path);
            Self::default()
        };

        if let Some(ms) = std::env::var("DX_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.debounce_ms = ms;
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.max(1))
    }

    /// True when `path` carries the watched extension.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.extension, "tsx");
        assert_eq!(config.output, PathBuf::from("styles.css"));
        assert!(config.inject_ids);
        assert_eq!(config.scanner, ScannerKind::Syntax);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            source_dir = "components"
            scanner = "regex"
            emit_id_selectors = true
            "#,
        )
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("components"));
        assert_eq!(config.scanner, ScannerKind::Regex);
        assert!(config.emit_id_selectors);
        assert_eq!(config.rules, PathBuf::from("styles.bin"));
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dx-styles.toml");
        fs::write(&path, "debounce_ms = \"soon\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, StyleError::Config { .. }));
    }

    #[test]
    fn test_is_source_file() {
        let config = Config::default();
        assert!(config.is_source_file(Path::new("src/App.tsx")));
        assert!(!config.is_source_file(Path::new("src/App.ts")));
        assert!(!config.is_source_file(Path::new("src/tsx")));
    }
}
