//! # Validate Subcommand
//!
//! Validates parameter documents (JSON or YAML mappings of parameter name
//! to value) against the openrouteservice parameter schema.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ors_params::{ors_parameters, ParamValidationError, ParamValidator, ValidatorConfig};

/// Arguments for the `ors validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Parameter documents to validate (`.yaml`/`.yml` or JSON).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every document conforms, 1 when any fails.
/// Unreadable or unparseable documents are operational errors.
pub fn run_validate(args: &ValidateArgs, config: &ValidatorConfig) -> Result<u8> {
    let schema = ors_parameters();
    let validator = ParamValidator::with_config(schema, config.clone());

    tracing::info!(param_count = schema.len(), "loaded parameter schema");

    let mut had_failures = false;
    for path in &args.paths {
        had_failures |= validate_single_path(&validator, path)?;
    }

    Ok(u8::from(had_failures))
}

/// Validate one document. Returns `true` if it failed validation.
fn validate_single_path(validator: &ParamValidator<'_>, path: &Path) -> Result<bool> {
    match validator.validate_file(path) {
        Ok(()) => {
            println!("OK: {}", path.display());
            Ok(false)
        }
        Err(e @ ParamValidationError::ValidationFailed { .. }) => {
            println!("FAIL: {e}");
            Ok(true)
        }
        Err(e) => Err(e).with_context(|| format!("cannot validate {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ors_params::UnknownParamPolicy;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn valid_yaml_document_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "directions.yaml",
            "profile: driving-car\ncoordinates: [[8.34, 48.23], [8.34, 48.26]]\nunits: km\n",
        );
        let args = ValidateArgs { paths: vec![path] };
        assert_eq!(run_validate(&args, &ValidatorConfig::default()).unwrap(), 0);
    }

    #[test]
    fn invalid_json_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"profile": "teleport"}"#);
        let args = ValidateArgs { paths: vec![path] };
        assert_eq!(run_validate(&args, &ValidatorConfig::default()).unwrap(), 1);
    }

    #[test]
    fn one_failure_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.json", r#"{"units": "mi"}"#);
        let bad = write(dir.path(), "bad.json", r#"{"units": "parsecs"}"#);
        let args = ValidateArgs {
            paths: vec![good, bad],
        };
        assert_eq!(run_validate(&args, &ValidatorConfig::default()).unwrap(), 1);
    }

    #[test]
    fn ignore_policy_accepts_unknown_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "extra.json", r#"{"units": "m", "api_key": "x"}"#);
        let args = ValidateArgs { paths: vec![path] };
        let strict = ValidatorConfig::default();
        let lenient = ValidatorConfig {
            unknown_params: UnknownParamPolicy::Ignore,
        };
        assert_eq!(run_validate(&args, &strict).unwrap(), 1);
        assert_eq!(run_validate(&args, &lenient).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = ValidateArgs {
            paths: vec![PathBuf::from("/tmp/ors-no-such-params.json")],
        };
        let err = run_validate(&args, &ValidatorConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("ors-no-such-params.json"));
    }
}
