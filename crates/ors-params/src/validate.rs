//! # Parameter Validation
//!
//! Checks candidate parameter sets against a [`ParameterSchema`].
//!
//! ## Invariant
//!
//! Validation is a correctness check for the client's test suite. Values
//! that fail are reported, never coerced, and every violation carries the
//! field path (`options.profile_params.weightings.green.factor`,
//! `radiuses[1]`) and the constraint that rejected it.
//!
//! ## Evaluation
//!
//! One recursive function interprets a rule's constraints in order. A type
//! mismatch stops evaluation of that value, since the remaining constraints
//! presuppose the shape. All other violations are collected.
//!
//! `AnyOf` needs at least one branch without violations. `OneOf` needs
//! exactly one; a value that fits two branches is rejected.

use std::fmt;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::{UnknownParamPolicy, ValidatorConfig};
use crate::rule::{Constraint, Kind, Rule};
use crate::schema::ParameterSchema;
use crate::value::{ParamValue, Params};

/// Error during parameter validation.
#[derive(Error, Debug)]
pub enum ParamValidationError {
    /// One or more parameters did not conform to the schema.
    #[error("validation failed for {subject}:\n{violations}")]
    ValidationFailed {
        /// What was validated (`parameters`, or a document path).
        subject: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The parameter document could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The validator configuration could not be loaded or parsed.
    #[error("config load error for '{path}': {reason}")]
    ConfigLoadError {
        /// Path (or origin label) of the configuration.
        path: String,
        /// Reason the configuration was rejected.
        reason: String,
    },
}

impl ParamValidationError {
    /// The violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

/// Which constraint a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Type,
    Allowed,
    Min,
    Max,
    Unknown,
    AnyOf,
    OneOf,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "type",
            Self::Allowed => "allowed",
            Self::Min => "min",
            Self::Max => "max",
            Self::Unknown => "unknown",
            Self::AnyOf => "anyof",
            Self::OneOf => "oneof",
        })
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted/indexed path to the offending value. Empty for the root.
    pub path: String,
    /// The constraint that rejected the value.
    pub constraint: ConstraintKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    fn new(path: &str, constraint: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            constraint,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "  (root) [{}]: {}", self.constraint, self.message)
        } else {
            write!(f, "  {} [{}]: {}", self.path, self.constraint, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the violation recorded at `path`, if any.
    pub fn at(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path == path)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Validates parameter sets against a schema.
///
/// Holds only a shared reference to the schema, so any number of validators
/// can read the same table concurrently.
#[derive(Debug, Clone)]
pub struct ParamValidator<'s> {
    schema: &'s ParameterSchema,
    config: ValidatorConfig,
}

impl<'s> ParamValidator<'s> {
    /// Validator with the default configuration (unknown names rejected).
    pub fn new(schema: &'s ParameterSchema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    /// Validator with an explicit configuration.
    pub fn with_config(schema: &'s ParameterSchema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    /// The schema this validator checks against.
    pub fn schema(&self) -> &'s ParameterSchema {
        self.schema
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a full parameter set.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::ValidationFailed` listing every
    /// violation across all parameters.
    pub fn validate(&self, params: &Params) -> Result<(), ParamValidationError> {
        let violations: Vec<Violation> = params
            .iter()
            .flat_map(|(name, value)| self.check_param(name, value))
            .collect();
        finish("parameters", violations)
    }

    /// Validate a single named parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::ValidationFailed` if the value breaks
    /// its rule, or if the name is unknown and the policy rejects unknowns.
    pub fn validate_param(
        &self,
        name: &str,
        value: &ParamValue,
    ) -> Result<(), ParamValidationError> {
        finish(name, self.check_param(name, value))
    }

    /// Validate a parsed JSON document whose root must be an object of
    /// parameter names.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::ValidationFailed`. A non-object root is
    /// reported as a `type` violation at the root path.
    pub fn validate_document(&self, document: &Value) -> Result<(), ParamValidationError> {
        match ParamValue::from(document.clone()) {
            ParamValue::Dict(params) => self.validate(&params),
            other => finish(
                "parameters",
                vec![Violation::new(
                    "",
                    ConstraintKind::Type,
                    format!("parameter document must be of dict type, got {}", other.kind_name()),
                )],
            ),
        }
    }

    /// Validate a YAML or JSON parameter document loaded from a file path.
    ///
    /// `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParamValidationError::DocumentLoadError` if the file cannot be
    /// read or parsed, `ParamValidationError::ValidationFailed` if it does
    /// not conform.
    pub fn validate_file(&self, document_path: &Path) -> Result<(), ParamValidationError> {
        let display = document_path.display().to_string();
        let content = std::fs::read_to_string(document_path).map_err(|e| {
            ParamValidationError::DocumentLoadError {
                path: display.clone(),
                reason: format!("cannot read file: {e}"),
            }
        })?;

        let ext = document_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let document: Value = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| {
                ParamValidationError::DocumentLoadError {
                    path: display.clone(),
                    reason: format!("invalid YAML: {e}"),
                }
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                ParamValidationError::DocumentLoadError {
                    path: display.clone(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?,
        };

        self.validate_document(&document).map_err(|e| match e {
            ParamValidationError::ValidationFailed { violations, .. } => {
                ParamValidationError::ValidationFailed {
                    subject: display,
                    violations,
                }
            }
            other => other,
        })
    }

    /// Violations for one named parameter. Empty when it conforms.
    pub fn check_param(&self, name: &str, value: &ParamValue) -> Vec<Violation> {
        let mut out = Vec::new();
        match self.schema.get(name) {
            Some(rule) => self.check_into(rule, value, name, &mut out),
            None => self.unknown(name, &mut out),
        }
        if out.is_empty() {
            tracing::trace!(param = name, "parameter conforms");
        } else {
            tracing::debug!(param = name, violations = out.len(), "parameter failed validation");
        }
        out
    }

    /// Violations for `value` against an arbitrary rule, reported under `path`.
    pub fn check(&self, rule: &Rule, value: &ParamValue, path: &str) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check_into(rule, value, path, &mut out);
        out
    }

    fn check_into(&self, rule: &Rule, value: &ParamValue, path: &str, out: &mut Vec<Violation>) {
        for constraint in rule.constraints() {
            match constraint {
                Constraint::Type(kinds) => {
                    if !kinds.iter().any(|k| k.matches(value)) {
                        out.push(Violation::new(
                            path,
                            ConstraintKind::Type,
                            format!(
                                "must be of {} type, got {}",
                                describe_kinds(kinds),
                                value.kind_name()
                            ),
                        ));
                        return;
                    }
                }
                Constraint::Allowed(allowed) => check_allowed(allowed, value, path, out),
                Constraint::Items(item_rule) => {
                    if let Some(items) = value.elements() {
                        for (i, item) in items.iter().enumerate() {
                            self.check_into(item_rule, item, &format!("{path}[{i}]"), out);
                        }
                    }
                }
                Constraint::Fields(fields) => {
                    if let ParamValue::Dict(map) = value {
                        for (key, field_value) in map {
                            let child = join_path(path, key);
                            match fields.get(key) {
                                Some(field_rule) => {
                                    self.check_into(field_rule, field_value, &child, out)
                                }
                                None => self.unknown(&child, out),
                            }
                        }
                    }
                }
                Constraint::Range { min, max } => {
                    if let Some(n) = value.as_f64() {
                        if let Some(lo) = min.filter(|lo| n < *lo) {
                            out.push(Violation::new(
                                path,
                                ConstraintKind::Min,
                                format!("min value is {lo}, got {value}"),
                            ));
                        }
                        if let Some(hi) = max.filter(|hi| n > *hi) {
                            out.push(Violation::new(
                                path,
                                ConstraintKind::Max,
                                format!("max value is {hi}, got {value}"),
                            ));
                        }
                    }
                }
                Constraint::AnyOf(branches) => {
                    let outcomes = self.branch_outcomes(branches, value, path);
                    if !outcomes.iter().any(Vec::is_empty) {
                        out.push(Violation::new(
                            path,
                            ConstraintKind::AnyOf,
                            format!(
                                "none of {} branches matched ({})",
                                branches.len(),
                                summarize_branches(&outcomes)
                            ),
                        ));
                    }
                }
                Constraint::OneOf(branches) => {
                    let outcomes = self.branch_outcomes(branches, value, path);
                    let matched: Vec<usize> = outcomes
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_empty())
                        .map(|(i, _)| i)
                        .collect();
                    match matched.len() {
                        1 => {}
                        0 => out.push(Violation::new(
                            path,
                            ConstraintKind::OneOf,
                            format!(
                                "none of {} branches matched, expected exactly one ({})",
                                branches.len(),
                                summarize_branches(&outcomes)
                            ),
                        )),
                        n => out.push(Violation::new(
                            path,
                            ConstraintKind::OneOf,
                            format!(
                                "{n} branches matched {matched:?}, expected exactly one"
                            ),
                        )),
                    }
                }
            }
        }
    }

    fn branch_outcomes(
        &self,
        branches: &[Rule],
        value: &ParamValue,
        path: &str,
    ) -> Vec<Vec<Violation>> {
        branches
            .iter()
            .map(|branch| self.check(branch, value, path))
            .collect()
    }

    fn unknown(&self, path: &str, out: &mut Vec<Violation>) {
        match self.config.unknown_params {
            UnknownParamPolicy::Reject => out.push(Violation::new(
                path,
                ConstraintKind::Unknown,
                "unknown field",
            )),
            UnknownParamPolicy::Ignore => {
                tracing::trace!(path, "ignoring undeclared field");
            }
        }
    }
}

fn check_allowed(allowed: &[ParamValue], value: &ParamValue, path: &str, out: &mut Vec<Violation>) {
    let is_allowed = |v: &ParamValue| allowed.iter().any(|a| a.loosely_equals(v));
    let rejected: Vec<&ParamValue> = match value.elements() {
        Some(items) => items.iter().filter(|v| !is_allowed(v)).collect(),
        None if is_allowed(value) => Vec::new(),
        None => vec![value],
    };
    if rejected.is_empty() {
        return;
    }
    out.push(Violation::new(
        path,
        ConstraintKind::Allowed,
        format!(
            "unallowed value {}; allowed: {}",
            join_values(rejected),
            join_values(allowed),
        ),
    ));
}

fn join_values<'a>(values: impl IntoIterator<Item = &'a ParamValue>) -> String {
    values
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn summarize_branches(outcomes: &[Vec<Violation>]) -> String {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, violations)| match violations.first() {
            Some(v) if v.path.is_empty() => format!("branch {i}: {}", v.message),
            Some(v) => format!("branch {i}: {} {}", v.path, v.message),
            None => format!("branch {i}: ok"),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn finish(subject: &str, violations: Vec<Violation>) -> Result<(), ParamValidationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ParamValidationError::ValidationFailed {
            subject: subject.to_string(),
            violations: ValidationViolations { violations },
        })
    }
}
