//! Dynamic values
//!
//! Definition data, constants, statics and instance fields are all made of
//! [`Value`]s. Containers (`Array`, `Map`) are owned, so cloning a value
//! copies them; functions and objects are shared handles.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::function::Function;
use crate::instance::Instance;

/// Ordered attribute map used for definitions, constants and fields
pub type ValueMap = BTreeMap<String, Value>;

/// A dynamic value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Number (all numbers are f64)
    Number(f64),
    /// String
    String(String),
    /// Ordered list
    Array(Vec<Value>),
    /// String-keyed map
    Map(ValueMap),
    /// Callable
    Function(Function),
    /// Instance of a synthesized class
    Object(Instance),
}

impl Value {
    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Object(_) => "object",
        }
    }

    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if callable
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Get as map
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as function
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get as instance
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Build a map value from key/value pairs
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array of strings
    pub fn strings<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Value {
        Value::Array(
            items
                .into_iter()
                .map(|s| Value::String(s.as_ref().to_string()))
                .collect(),
        )
    }

    /// Convert plain JSON into a value. JSON cannot express functions or
    /// objects; those come from the host program.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert into JSON (functions become `{"$fn": arity}`)
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map).finish(),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Object(instance) => write!(f, "[object {}]", instance.class_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Function(func) => {
                let mut map = serializer.serialize_map(Some(1))?;
                let tag = if func.is_abstract() { "$abstract" } else { "$fn" };
                map.serialize_entry(tag, &func.arity())?;
                map.end()
            }
            Value::Object(instance) => {
                let fields = instance.fields();
                let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
                map.serialize_entry("$class", instance.class_name())?;
                for (key, value) in &fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
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
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Build a [`ValueMap`] from `key => value` pairs.
///
/// ```ignore
/// let data = definition! {
///     "$_extends" => "Animal",
///     "legs" => 4,
/// };
/// ```
#[macro_export]
macro_rules! definition {
    () => { $crate::ValueMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ValueMap::new();
        $( map.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_copies_containers() {
        let original = Value::map([("tags", Value::strings(["a", "b"]))]);
        let mut copy = original.clone();
        if let Value::Map(map) = &mut copy {
            map.insert("tags".to_string(), Value::Null);
        }
        assert_eq!(
            original.as_map().unwrap()["tags"],
            Value::strings(["a", "b"])
        );
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!({"name": "x", "size": 3, "list": [true, null]});
        let value = Value::from_json(&json);
        let map = value.as_map().unwrap();
        assert_eq!(map["name"], Value::from("x"));
        assert_eq!(map["size"], Value::from(3));
        assert_eq!(map["list"], Value::Array(vec![Value::Bool(true), Value::Null]));
        assert_eq!(value.to_json(), serde_json::json!({"list": [true, null], "name": "x", "size": 3.0}));
    }

    #[test]
    fn test_function_serializes_as_marker() {
        let func = Function::returning(2, Value::Null);
        let json = Value::Function(func).to_json();
        assert_eq!(json, serde_json::json!({"$fn": 2}));
        let placeholder = Value::Function(Function::abstract_method(1)).to_json();
        assert_eq!(placeholder, serde_json::json!({"$abstract": 1}));
    }

    #[test]
    fn test_definition_macro() {
        let data = definition! { "a" => 1, "b" => "two" };
        assert_eq!(data.len(), 2);
        assert_eq!(data["b"], Value::from("two"));
        assert!(definition! {}.is_empty());
    }

    #[test]
    fn test_function_equality_is_identity() {
        let f = Function::returning(0, Value::Null);
        let g = Function::returning(0, Value::Null);
        assert_eq!(Value::from(f.clone()), Value::from(f));
        assert_ne!(Value::from(g), Value::from(Function::returning(0, Value::Null)));
    }
}
