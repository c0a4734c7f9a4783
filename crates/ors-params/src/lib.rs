//! # ors-params: Request Parameter Schema
//!
//! Declarative description of every request parameter the openrouteservice
//! client accepts, plus the validator that checks candidate parameter sets
//! against it.
//!
//! ## Layers
//!
//! - [`value`]: `ParamValue`, the dynamically-shaped candidate value. Lists
//!   and tuples are distinct shapes.
//! - [`rule`]: `Kind`, `Constraint` and `Rule`, the tagged-variant rule
//!   representation.
//! - [`schema`]: the parameter rule table, built once and read-only after.
//! - [`validate`]: the recursive validator and its structured violations.
//! - [`config`]: validator configuration (unknown-parameter policy).
//!
//! ## Crate Policy
//!
//! - Validation is pure: no I/O except the explicit file-loading entry points.
//! - Failures are never corrected or downgraded. Every violation carries the
//!   offending field path and the violated constraint.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod rule;
pub mod schema;
pub mod validate;
pub mod value;

pub use config::{UnknownParamPolicy, ValidatorConfig};
pub use rule::{Constraint, Kind, Rule};
pub use schema::{ors_parameters, ParameterSchema};
pub use validate::{
    ConstraintKind, ParamValidationError, ParamValidator, ValidationViolations, Violation,
};
pub use value::{ParamValue, Params};
