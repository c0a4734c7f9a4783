//! # Parameter Values
//!
//! `ParamValue` is the dynamically-shaped value a test case hands to the
//! client for a single request parameter. The shape matters to the schema:
//! a coordinate pair may be passed as a list or as a tuple, and some rules
//! accept only one of the two, so `List` and `Tuple` are distinct variants.
//!
//! JSON and YAML documents have no tuple notation. Values decoded from them
//! (via `serde` or `From<serde_json::Value>`) only ever produce `List`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A candidate parameter set: parameter name to value.
pub type Params = BTreeMap<String, ParamValue>;

/// A single candidate parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit absence of a value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integral number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    String(String),
    /// Ordered, growable sequence.
    List(Vec<ParamValue>),
    /// Fixed sequence (coordinate pairs and the like).
    Tuple(Vec<ParamValue>),
    /// Nested mapping with string keys.
    Dict(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Build a `List` from anything convertible element-wise.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParamValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Tuple` from anything convertible element-wise.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParamValue>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Name of the value's runtime shape, used in violation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
        }
    }

    /// Numeric view of `Integer` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Elements of a `List` or `Tuple`.
    pub fn elements(&self) -> Option<&[ParamValue]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Equality that compares numbers by value, so `Integer(-1)` equals
    /// `Float(-1.0)`. Everything else falls back to structural equality.
    pub fn loosely_equals(&self, other: &ParamValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[ParamValue]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Self::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                write!(f, ")")
            }
            Self::Dict(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Dict(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<ParamValue>, const N: usize> From<[T; N]> for ParamValue {
    fn from(items: [T; N]) -> Self {
        Self::list(items)
    }
}

impl<A: Into<ParamValue>, B: Into<ParamValue>> From<(A, B)> for ParamValue {
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(map: BTreeMap<String, ParamValue>) -> Self {
        Self::Dict(map)
    }
}

/// Build a [`Params`] map from `name => value` pairs.
///
/// Values go through `ParamValue::from`, so nested `params!` invocations
/// become `Dict` values:
///
/// ```
/// use ors_params::params;
///
/// let p = params! {
///     "profile" => "driving-car",
///     "options" => params! { "maximum_speed" => 80 },
/// };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert(
                ::std::string::String::from($name),
                $crate::ParamValue::from($value),
            );
        )+
        params
    }};
}
