//! Class manifest parsing (JSON)
//!
//! A manifest declares classes as plain data:
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Greets", "kind": "Interface", "definition": { "hello": { "$abstract": 0 } } },
//!     { "name": "Person", "definition": {
//!         "$_implements": ["Greets"],
//!         "name": null,
//!         "$_constructor": { "$fn": { "arity": 1, "set": "name" } },
//!         "hello": { "$fn": { "arity": 0, "returns": "hi" } }
//!     } }
//!   ]
//! }
//! ```
//!
//! JSON has no functions, so method bodies are stubs:
//! - `{"$fn": N}` returns null
//! - `{"$fn": {"arity": N, "returns": V}}` returns `V`
//! - `{"$fn": {"arity": N, "get": "field"}}` reads a field or static
//! - `{"$fn": {"arity": N, "set": "field"}}` stores the first argument
//! - `{"$abstract": N}` is an abstract placeholder

use std::collections::HashSet;
use std::path::Path;

use clazz_engine::{ClassManager, ClassRef, ClazzError, Function, Value, ValueMap, CLASS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker key of a stub method
pub const FN_TAG: &str = "$fn";

/// Marker key of an abstract placeholder
pub const ABSTRACT_TAG: &str = "$abstract";

/// Errors that can occur while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// The engine rejected a declaration
    #[error("Class \"{name}\": {source}")]
    Engine {
        /// Declared class name
        name: String,
        /// Engine error
        #[source]
        source: ClazzError,
    },
}

/// Class manifest (`classes.json`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassManifest {
    /// Declarations in registration order
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

/// One declared class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassEntry {
    /// Class name
    pub name: String,

    /// Kind name (default: `Class`)
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Definition data, with stub markers for methods
    #[serde(default)]
    pub definition: serde_json::Map<String, serde_json::Value>,
}

fn default_kind() -> String {
    CLASS.to_string()
}

impl ClassManifest {
    /// Parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a manifest from a string
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest: ClassManifest = serde_json::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate names and stub markers
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for entry in &self.classes {
            if entry.name.is_empty() {
                return Err(ManifestError::ValidationError(
                    "class name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ManifestError::ValidationError(format!(
                    "class \"{}\" is declared twice",
                    entry.name
                )));
            }
            entry.data()?;
        }
        Ok(())
    }

    /// Look up a declaration by name
    pub fn entry(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|entry| entry.name == name)
    }

    /// Register every declaration, stopping at the first rejection
    pub fn register(&self, manager: &ClassManager) -> Result<Vec<ClassRef>, ManifestError> {
        self.classes
            .iter()
            .map(|entry| entry.register(manager))
            .collect()
    }
}

impl ClassEntry {
    /// Definition data with stubs decoded into functions
    pub fn data(&self) -> Result<ValueMap, ManifestError> {
        self.definition
            .iter()
            .map(|(key, value)| {
                decode_value(value)
                    .map(|value| (key.clone(), value))
                    .map_err(|reason| {
                        ManifestError::ValidationError(format!(
                            "class \"{}\", member `{}`: {}",
                            self.name, key, reason
                        ))
                    })
            })
            .collect()
    }

    /// Register this declaration
    pub fn register(&self, manager: &ClassManager) -> Result<ClassRef, ManifestError> {
        let data = self.data()?;
        manager
            .add(&self.kind, &self.name, data)
            .map_err(|source| ManifestError::Engine {
                name: self.name.clone(),
                source,
            })
    }
}

/// Decode a JSON value, turning stub markers into functions
pub fn decode_value(json: &serde_json::Value) -> Result<Value, String> {
    match json {
        serde_json::Value::Array(items) => Ok(Value::Array(
            items.iter().map(decode_value).collect::<Result<_, _>>()?,
        )),
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some(spec) = map.get(FN_TAG) {
                    return decode_stub(spec).map(Value::Function);
                }
                if let Some(arity) = map.get(ABSTRACT_TAG) {
                    return arity_of(arity).map(|n| Value::Function(Function::abstract_method(n)));
                }
            }
            Ok(Value::Map(
                map.iter()
                    .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
                    .collect::<Result<_, String>>()?,
            ))
        }
        scalar => Ok(Value::from_json(scalar)),
    }
}

fn decode_stub(spec: &serde_json::Value) -> Result<Function, String> {
    let spec = match spec {
        serde_json::Value::Object(spec) => spec,
        arity => return arity_of(arity).map(|n| Function::returning(n, Value::Null)),
    };

    let arity = match spec.get("arity") {
        Some(arity) => arity_of(arity)?,
        None => 0,
    };

    if let Some(field) = spec.get("get") {
        let field = field_name(field, "get")?;
        return Ok(Function::new(arity, move |ctx, _args| ctx.get(&field)));
    }
    if let Some(field) = spec.get("set") {
        let field = field_name(field, "set")?;
        return Ok(Function::new(arity.max(1), move |ctx, args| {
            let value = ctx.argument(args, 0)?.clone();
            ctx.set(&field, value)?;
            Ok(Value::Null)
        }));
    }

    let returns = match spec.get("returns") {
        Some(value) => decode_value(value)?,
        None => Value::Null,
    };
    Ok(Function::returning(arity, returns))
}

fn arity_of(value: &serde_json::Value) -> Result<usize, String> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| format!("arity must be a non-negative integer, got {}", value))
}

fn field_name(value: &serde_json::Value, key: &str) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("`{}` must name a field", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clazz_engine::INTERFACE;

    #[test]
    fn test_parse_simple_manifest() {
        let json = r#"{
            "classes": [
                { "name": "Greets", "kind": "Interface", "definition": { "hello": { "$abstract": 0 } } },
                { "name": "Person", "definition": { "$_implements": ["Greets"], "hello": { "$fn": 0 } } }
            ]
        }"#;
        let manifest = ClassManifest::parse(json).unwrap();
        assert_eq!(manifest.classes.len(), 2);
        assert_eq!(manifest.classes[0].kind, INTERFACE);
        assert_eq!(manifest.classes[1].kind, CLASS);
        assert!(manifest.entry("Person").is_some());
        assert!(manifest.entry("Nobody").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"{ "classes": [ { "name": "A" }, { "name": "A" } ] }"#;
        let result = ClassManifest::parse(json);
        assert!(matches!(result, Err(ManifestError::ValidationError(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let json = r#"{ "classes": [ { "name": "" } ] }"#;
        assert!(matches!(
            ClassManifest::parse(json),
            Err(ManifestError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_arity_rejected() {
        let json = r#"{ "classes": [ { "name": "A", "definition": { "m": { "$fn": -1 } } } ] }"#;
        match ClassManifest::parse(json) {
            Err(ManifestError::ValidationError(message)) => {
                assert!(message.contains("member `m`"), "{}", message)
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_stub_markers() {
        let value = decode_value(&serde_json::json!({ "$fn": 2 })).unwrap();
        let function = value.as_function().unwrap();
        assert_eq!(function.arity(), 2);
        assert!(!function.is_abstract());

        let value = decode_value(&serde_json::json!({ "$abstract": 1 })).unwrap();
        assert!(value.as_function().unwrap().is_abstract());

        let setter = decode_value(&serde_json::json!({ "$fn": { "set": "name" } })).unwrap();
        assert_eq!(setter.as_function().unwrap().arity(), 1);
    }

    #[test]
    fn test_plain_maps_stay_maps() {
        let value = decode_value(&serde_json::json!({ "$fn": 0, "extra": true })).unwrap();
        assert!(value.as_map().is_some());

        let nested = decode_value(&serde_json::json!({ "list": [1, { "$fn": 0 }] })).unwrap();
        let list = nested.as_map().unwrap()["list"].as_array().unwrap().to_vec();
        assert_eq!(list[0], Value::from(1));
        assert!(list[1].is_function());
    }

    #[test]
    fn test_stubs_run_against_instances() {
        let json = r#"{
            "classes": [
                { "name": "Person", "definition": {
                    "name": null,
                    "$_constructor": { "$fn": { "arity": 1, "set": "name" } },
                    "getName": { "$fn": { "get": "name" } },
                    "greet": { "$fn": { "returns": "hi" } }
                } }
            ]
        }"#;
        let manager = ClassManager::new();
        let records = ClassManifest::parse(json).unwrap().register(&manager).unwrap();
        let alice = records[0].create_instance(&[Value::from("Alice")]).unwrap();
        assert_eq!(alice.call("getName", &[]).unwrap(), Value::from("Alice"));
        assert_eq!(alice.call("greet", &[]).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_unknown_kind_reported_with_class_name() {
        let json = r#"{ "classes": [ { "name": "Odd", "kind": "Enum" } ] }"#;
        let manager = ClassManager::new();
        let err = ClassManifest::parse(json)
            .unwrap()
            .register(&manager)
            .unwrap_err();
        match err {
            ManifestError::Engine { name, source } => {
                assert_eq!(name, "Odd");
                assert!(matches!(source, ClazzError::UnknownKind { .. }));
            }
            other => panic!("Expected Engine error, got {:?}", other),
        }
    }
}
