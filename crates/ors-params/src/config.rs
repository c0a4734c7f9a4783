//! # Validator Configuration
//!
//! Knobs the validator reads at construction time. Loaded from YAML by the
//! CLI's `--config` flag; every field has a default so an empty document is
//! a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::ParamValidationError;

/// What to do with parameter names (or dict keys) the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParamPolicy {
    /// Report an `unknown` violation.
    #[default]
    Reject,
    /// Skip the entry without validating it.
    Ignore,
}

/// Validator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Policy for undeclared top-level names and undeclared keys inside
    /// dicts that carry a sub-schema.
    pub unknown_params: UnknownParamPolicy,
}

impl ValidatorConfig {
    /// Parse a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::ConfigLoadError` when the text is not
    /// valid YAML or names an unknown setting.
    pub fn from_yaml_str(text: &str, origin: &str) -> Result<Self, ParamValidationError> {
        serde_yaml::from_str(text).map_err(|e| ParamValidationError::ConfigLoadError {
            path: origin.to_string(),
            reason: format!("invalid YAML: {e}"),
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::ConfigLoadError` when the file cannot be
    /// read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ParamValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParamValidationError::ConfigLoadError {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            }
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_unknown() {
        assert_eq!(
            ValidatorConfig::default().unknown_params,
            UnknownParamPolicy::Reject
        );
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = ValidatorConfig::from_yaml_str("{}", "inline").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn parses_ignore_policy() {
        let config = ValidatorConfig::from_yaml_str("unknown_params: ignore\n", "inline").unwrap();
        assert_eq!(config.unknown_params, UnknownParamPolicy::Ignore);
    }

    #[test]
    fn rejects_unknown_settings() {
        let err = ValidatorConfig::from_yaml_str("allow_everything: true\n", "inline").unwrap_err();
        assert!(
            matches!(err, ParamValidationError::ConfigLoadError { .. }),
            "Expected ConfigLoadError, got: {err}"
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validator.yaml");
        std::fs::write(&path, "unknown_params: reject\n").unwrap();
        let config = ValidatorConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.unknown_params, UnknownParamPolicy::Reject);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ValidatorConfig::from_yaml_file(Path::new("/nonexistent/ors.yaml")).unwrap_err();
        assert!(matches!(err, ParamValidationError::ConfigLoadError { .. }));
    }
}
