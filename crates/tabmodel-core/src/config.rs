//! Configuration schema (tabmodel.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::binding::Bindings;
use crate::culture::KnownCulture;
use crate::diagnostic::{DiagnosticCode, Severity};
use crate::identifier::DEFAULT_SPECIAL_CHARS;
use crate::style::DEFAULT_STYLE_NAME;

/// Severity overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Diagnostic code -> severity
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides.get(code.as_str()).copied().unwrap_or(default)
    }

    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

fn default_special_chars() -> Vec<char> {
    DEFAULT_SPECIAL_CHARS.to_vec()
}

fn default_style() -> String {
    DEFAULT_STYLE_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Culture used by conditions declared with `Current`
    #[serde(default)]
    pub culture: KnownCulture,

    /// Leading characters that force field-name encoding
    #[serde(default = "default_special_chars")]
    pub special_chars: Vec<char>,

    /// Style applied when a field's style cannot be resolved
    #[serde(default = "default_style")]
    pub default_style: String,

    /// Values for `{Key}` placeholders
    #[serde(default)]
    pub bindings: Bindings,

    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Model names (globs) skipped by `validate`
    #[serde(default)]
    pub skip_models: Vec<String>,

    /// Directory relative data paths are resolved against
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            culture: KnownCulture::default(),
            special_chars: default_special_chars(),
            default_style: default_style(),
            bindings: Bindings::default(),
            severity: SeverityThreshold::default(),
            skip_models: Vec::new(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        if config.project_root.as_os_str().is_empty() {
            config.project_root = std::env::current_dir().unwrap_or_default();
        }
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn is_model_skipped(&self, model: &str) -> bool {
        self.skip_models.iter().any(|pattern| glob_match(pattern, model))
    }
}

/// Single `*` wildcard matching
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            text.len() >= prefix.len() + suffix.len() && text.starts_with(prefix) && text.ends_with(suffix)
        }
        None => pattern == text,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.culture, KnownCulture::Current);
        assert_eq!(config.special_chars, vec!['#', '*', '@']);
        assert_eq!(config.default_style, "Default");
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml(
            r##"
            culture = "es-ES"
            special_chars = ["#", "$"]
            skip_models = ["draft_*"]

            [bindings]
            Region = "Spain"

            [severity.overrides]
            FIELD_INVALID_WIDTH = "warn"
            "##,
        )
        .unwrap();

        assert_eq!(config.culture, KnownCulture::EsEs);
        assert_eq!(config.special_chars, vec!['#', '$']);
        assert_eq!(config.bindings.get("Region"), Some("Spain"));
        assert_eq!(
            config.severity.get_severity(DiagnosticCode::FieldInvalidWidth, Severity::Error),
            Severity::Warn
        );
        assert!(config.is_model_skipped("draft_sales"));
        assert!(!config.is_model_skipped("sales"));
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(DiagnosticCode::ConditionUnknownField, Severity::Info);

        assert_eq!(
            threshold.get_severity(DiagnosticCode::ConditionUnknownField, Severity::Warn),
            Severity::Info
        );
        assert_eq!(
            threshold.get_severity(DiagnosticCode::StyleNotFound, Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabmodel.toml");

        let mut config = Config::default();
        config.culture = KnownCulture::FrFr;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.culture, KnownCulture::FrFr);
        assert_eq!(loaded.project_root, dir.path());
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("staging_*", "staging_users"));
        assert!(glob_match("*_v2", "sales_v2"));
        assert!(!glob_match("ab*ba", "aba"));
    }
}
