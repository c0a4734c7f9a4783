//! # Parameter Rules
//!
//! A `Rule` is a conjunction of `Constraint`s. Each constraint is one tagged
//! variant (type, allowed-set, element rule, dict sub-schema, numeric range,
//! or an alternation over nested rules), and the validator interprets them
//! with a single recursive function.
//!
//! ## Kinds
//!
//! The type constraint carries a set of `Kind`s. A value conforms when it
//! matches any one of them, which is how `['list', 'tuple']` style unions
//! and kind aliases are expressed. `Float` matches only floating-point
//! values; `Number` is the integer-or-float union.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ParamValue;

/// Runtime shape label a type constraint can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Integer,
    Float,
    Number,
    Boolean,
    List,
    Tuple,
    Dict,
}

impl Kind {
    /// Whether `value` has this kind's shape.
    pub fn matches(self, value: &ParamValue) -> bool {
        use ParamValue as V;
        matches!(
            (self, value),
            (Kind::String, V::String(_))
                | (Kind::Integer, V::Integer(_))
                | (Kind::Float, V::Float(_))
                | (Kind::Number, V::Integer(_) | V::Float(_))
                | (Kind::Boolean, V::Bool(_))
                | (Kind::List, V::List(_))
                | (Kind::Tuple, V::Tuple(_))
                | (Kind::Dict, V::Dict(_))
        )
    }

    /// Lowercase label, as used in schema dumps and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Dict => "dict",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declarative check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Value shape must match one of the kinds.
    Type(Vec<Kind>),
    /// Value (or each element of a list/tuple) must be one of these.
    Allowed(Vec<ParamValue>),
    /// Every element of a list/tuple must satisfy the rule.
    Items(Box<Rule>),
    /// Declared keys of a dict and the rule each value must satisfy.
    Fields(BTreeMap<String, Rule>),
    /// Inclusive numeric bounds.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// At least one branch must be satisfied.
    AnyOf(Vec<Rule>),
    /// Exactly one branch must be satisfied.
    OneOf(Vec<Rule>),
}

/// Conjunction of constraints attached to a parameter name.
///
/// An empty rule accepts any value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule {
    constraints: Vec<Constraint>,
}

impl Rule {
    /// A rule with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule requiring a single kind.
    pub fn of(kind: Kind) -> Self {
        Self::of_kinds([kind])
    }

    /// A rule requiring any one of several kinds.
    pub fn of_kinds(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self::new().with(Constraint::Type(kinds.into_iter().collect()))
    }

    /// A rule satisfied when at least one branch is.
    pub fn any_of(branches: impl IntoIterator<Item = Rule>) -> Self {
        Self::new().with(Constraint::AnyOf(branches.into_iter().collect()))
    }

    /// A rule satisfied when exactly one branch is.
    pub fn one_of(branches: impl IntoIterator<Item = Rule>) -> Self {
        Self::new().with(Constraint::OneOf(branches.into_iter().collect()))
    }

    /// Append an arbitrary constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Restrict values to a fixed set.
    pub fn allowed<I>(self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParamValue>,
    {
        self.with(Constraint::Allowed(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Rule every list/tuple element must satisfy.
    pub fn items(self, rule: Rule) -> Self {
        self.with(Constraint::Items(Box::new(rule)))
    }

    /// Sub-schema for a dict value.
    pub fn fields<'a>(self, fields: impl IntoIterator<Item = (&'a str, Rule)>) -> Self {
        self.with(Constraint::Fields(
            fields
                .into_iter()
                .map(|(name, rule)| (name.to_string(), rule))
                .collect(),
        ))
    }

    /// Inclusive lower bound. Merges into an existing range constraint.
    pub fn min(mut self, bound: f64) -> Self {
        match self.range_mut() {
            Some((min, _)) => *min = Some(bound),
            None => self.constraints.push(Constraint::Range {
                min: Some(bound),
                max: None,
            }),
        }
        self
    }

    /// Inclusive upper bound. Merges into an existing range constraint.
    pub fn max(mut self, bound: f64) -> Self {
        match self.range_mut() {
            Some((_, max)) => *max = Some(bound),
            None => self.constraints.push(Constraint::Range {
                min: None,
                max: Some(bound),
            }),
        }
        self
    }

    /// The constraints in evaluation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Kinds named by the rule's type constraint, if it has one.
    pub fn kinds(&self) -> Option<&[Kind]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Type(kinds) => Some(kinds.as_slice()),
            _ => None,
        })
    }

    fn range_mut(&mut self) -> Option<(&mut Option<f64>, &mut Option<f64>)> {
        self.constraints.iter_mut().find_map(|c| match c {
            Constraint::Range { min, max } => Some((min, max)),
            _ => None,
        })
    }
}
