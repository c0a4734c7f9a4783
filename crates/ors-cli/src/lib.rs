//! # ors-cli: Command-Line Front End
//!
//! Provides the `ors` binary over the parameter schema and the test
//! helpers, for checking fixtures and request URLs outside a test run.
//!
//! ## Subcommands
//!
//! - `ors validate`: validate JSON/YAML parameter documents.
//! - `ors url-eq`: compare two URLs ignoring query order.
//! - `ors unescape`: decode backslash escapes.
//! - `ors schema`: print the parameter schema as JSON.
//!
//! Exit codes: 0 success, 1 check failed, 2 operational error.
//!
//! ```bash
//! ors validate fixtures/directions.yaml
//! ors url-eq "https://x/y?a=1&b=2" "https://x/y?b=2&a=1"
//! ors schema --param options
//! ```

pub mod inspect;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use ors_params::ValidatorConfig;

/// Load the validator configuration, falling back to defaults when no file
/// is given.
pub fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => {
            let config = ValidatorConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::debug!(config = %path.display(), ?config, "loaded validator config");
            Ok(config)
        }
        None => Ok(ValidatorConfig::default()),
    }
}
