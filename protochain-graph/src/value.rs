//! Property values stored on entities.
//!
//! A [`Value`] is either data (null, bool, number, string, or an owned
//! sub-mapping) or a [`Method`]. Methods are shared behind an `Arc`, so cloning
//! a value that holds one never copies the closure.

use crate::{GraphError, GraphResult, Receiver};
use serde_json::{Map, Number};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An entity's own property mapping, ordered by name.
pub type Properties = BTreeMap<String, Value>;

type MethodBody = dyn Fn(&mut Receiver<'_>, &[Value]) -> GraphResult<Value> + Send + Sync;

/// A callable property.
///
/// The body always runs against a [`Receiver`] bound to the entity that
/// requested the call, wherever in the chain the method was found.
#[derive(Clone)]
pub struct Method {
    name: Arc<str>,
    body: Arc<MethodBody>,
}

impl Method {
    /// Wraps a closure as a method. `name` is used in logs, errors, and
    /// snapshots; it does not have to match the property name.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Receiver<'_>, &[Value]) -> GraphResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the body with an explicit receiver.
    pub fn call(&self, receiver: &mut Receiver<'_>, args: &[Value]) -> GraphResult<Value> {
        (self.body)(receiver, args)
    }

    /// True when both handles share the same body.
    #[must_use]
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Method").field(&self.name).finish()
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// A property value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// An owned sub-mapping. Nested objects do not delegate; only entities do.
    Object(Properties),
    Method(Method),
}

impl Value {
    /// Short name of the variant, used in type-mismatch errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Method(_) => "method",
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Converts to JSON for snapshots.
    ///
    /// Methods become `"[method <name>]"` strings. Non-finite numbers have no
    /// JSON form and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect::<Map<_, _>>(),
            ),
            Value::Method(m) => serde_json::Value::String(format!("[method {}]", m.name())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Method(m) => write!(f, "[method {}]", m.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Properties> for Value {
    fn from(map: Properties) -> Self {
        Value::Object(map)
    }
}

impl From<Method> for Value {
    fn from(m: Method) -> Self {
        Value::Method(m)
    }
}

/// JSON arrays become objects keyed by index (`"0"`, `"1"`, ...).
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Value::from(v)))
                    .collect(),
            ),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Builds a [`Properties`] map from `name => value` pairs.
///
/// ```
/// use protochain_graph::{props, Value};
///
/// let p = props! { "x" => 3, "label" => "origin" };
/// assert_eq!(p["x"], Value::Number(3.0));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::Properties::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Properties::new();
        $(
            map.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        map
    }};
}

/// Converts a JSON object into [`Properties`].
///
/// Anything but a JSON object is a [`GraphError::TypeMismatch`].
pub fn properties_from_json(json: serde_json::Value) -> GraphResult<Properties> {
    match json {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()),
        other => Err(GraphError::TypeMismatch {
            name: "properties".to_string(),
            expected: "object",
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
