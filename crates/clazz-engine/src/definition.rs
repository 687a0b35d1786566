//! Class definitions
//!
//! A [`ClassDefinition`] owns the raw definition data of one record: a map
//! whose `$_`-prefixed keys are meta attributes and whose other keys are
//! ordinary members (methods or data). Processing a definition validates
//! every meta attribute against the kind's option table first and only then
//! applies them, into a [`ResolvedDefinition`] that the record commits after
//! synthesis succeeds.

use std::collections::BTreeMap;

use tracing::debug;

use crate::class_type::ClassRef;
use crate::constructor::CONSTRUCTOR_KEY;
use crate::error::{ClazzError, ClazzResult};
use crate::function::Function;
use crate::kind::{BodyRule, ClassKind, OptionContext};
use crate::manager::ClassManager;
use crate::value::{Value, ValueMap};

/// Prefix of meta attribute names
pub const META_PREFIX: &str = "$_";

/// Parent class name
pub const EXTENDS_KEY: &str = "$_extends";
/// Classes to load before this one
pub const REQUIRES_KEY: &str = "$_requires";
/// Class constants
pub const CONSTANTS_KEY: &str = "$_constants";
/// Final flag
pub const FINAL_KEY: &str = "$_final";
/// Static members
pub const STATIC_KEY: &str = "$_static";
/// Abstract method declarations
pub const ABSTRACT_KEY: &str = "$_abstract";
/// Implemented interfaces
pub const IMPLEMENTS_KEY: &str = "$_implements";
/// Composed traits
pub const TRAITS_KEY: &str = "$_traits";

/// Check if an attribute name is a meta attribute
pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

/// Meta attributes applied to a record, staged until synthesis succeeds
#[derive(Debug, Clone, Default)]
pub struct ResolvedDefinition {
    /// Resolved parent record
    pub parent: Option<ClassRef>,
    /// `(alias, class name)` pairs
    pub requires: Vec<(String, String)>,
    /// Own constants
    pub constants: ValueMap,
    /// Final flag
    pub is_final: bool,
    /// Own static members (trait statics included)
    pub statics: ValueMap,
    /// Own abstract method placeholders
    pub abstract_methods: BTreeMap<String, Function>,
    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<ClassRef>,
    /// Composed traits, in application order
    pub traits: Vec<ClassRef>,
    /// Trait-provided members
    pub mixed: ValueMap,
    /// Own constructor body
    pub constructor: Option<Function>,
}

/// Raw definition data of one record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDefinition {
    data: ValueMap,
}

impl From<ValueMap> for ClassDefinition {
    fn from(data: ValueMap) -> Self {
        Self::new(data)
    }
}

impl ClassDefinition {
    /// Wrap raw data
    pub fn new(data: ValueMap) -> Self {
        Self { data }
    }

    /// Base definition every record of `kind` starts from
    pub fn scaffold(kind: &ClassKind) -> Self {
        Self::new(kind.base_definition())
    }

    /// This definition merged over the kind's scaffold
    pub fn merged_over_scaffold(&self, kind: &ClassKind) -> Self {
        let mut merged = kind.base_definition();
        for (key, value) in &self.data {
            merged.insert(key.clone(), value.clone());
        }
        Self::new(merged)
    }

    /// Raw data
    pub fn data(&self) -> &ValueMap {
        &self.data
    }

    /// Consume into raw data
    pub fn into_data(self) -> ValueMap {
        self.data
    }

    /// Read one attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Ordinary methods
    pub fn methods(&self) -> ValueMap {
        self.filtered(|key, value| !is_meta_key(key) && value.is_function())
    }

    /// Ordinary data members
    pub fn non_methods(&self) -> ValueMap {
        self.filtered(|key, value| !is_meta_key(key) && !value.is_function())
    }

    /// Meta attributes
    pub fn meta_data(&self) -> ValueMap {
        self.filtered(|key, _| is_meta_key(key))
    }

    /// Ordinary members, methods and data together
    pub fn members(&self) -> ValueMap {
        self.filtered(|key, _| !is_meta_key(key))
    }

    fn filtered(&self, keep: impl Fn(&str, &Value) -> bool) -> ValueMap {
        self.data
            .iter()
            .filter(|(key, value)| keep(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    // Typed accessors. They read leniently: a malformed value reads as absent
    // and is reported when the definition is processed.

    /// `$_extends`
    pub fn extends(&self) -> Option<&str> {
        self.get(EXTENDS_KEY)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// `$_constants`
    pub fn constants(&self) -> ValueMap {
        self.map_attribute(CONSTANTS_KEY)
    }

    /// `$_requires` as `(alias, class name)` pairs
    pub fn requires(&self) -> Vec<(String, String)> {
        match self.get(REQUIRES_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|name| (name.to_string(), name.to_string()))
                .collect(),
            Some(Value::Map(aliases)) => aliases
                .iter()
                .filter_map(|(alias, name)| name.as_str().map(|n| (alias.clone(), n.to_string())))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `$_final`
    pub fn is_final(&self) -> bool {
        self.get(FINAL_KEY).and_then(Value::as_bool).unwrap_or(false)
    }

    /// `$_static`
    pub fn statics(&self) -> ValueMap {
        self.map_attribute(STATIC_KEY)
    }

    /// `$_abstract` as placeholders
    pub fn abstract_methods(&self) -> BTreeMap<String, Function> {
        self.map_attribute(ABSTRACT_KEY)
            .into_iter()
            .filter_map(|(name, value)| value.as_function().map(|f| (name, f.signature())))
            .collect()
    }

    /// `$_implements`
    pub fn interfaces(&self) -> Vec<String> {
        self.name_list(IMPLEMENTS_KEY)
    }

    /// `$_traits`
    pub fn traits(&self) -> Vec<String> {
        self.name_list(TRAITS_KEY)
    }

    /// `$_constructor`
    pub fn constructor(&self) -> Option<&Function> {
        self.get(CONSTRUCTOR_KEY).and_then(Value::as_function)
    }

    fn map_attribute(&self, key: &str) -> ValueMap {
        self.get(key).and_then(Value::as_map).cloned().unwrap_or_default()
    }

    fn name_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    // Validating setters

    /// Set or clear `$_extends`
    pub fn set_extends(&mut self, parent: Option<&str>) -> ClazzResult<()> {
        match parent {
            Some(name) => {
                check_name("parent", name)?;
                self.data.insert(EXTENDS_KEY.to_string(), Value::from(name));
            }
            None => {
                self.data.insert(EXTENDS_KEY.to_string(), Value::Null);
            }
        }
        Ok(())
    }

    /// Replace `$_constants`
    pub fn set_constants(&mut self, constants: ValueMap) -> ClazzResult<()> {
        for (name, value) in &constants {
            check_constant(name, value)?;
        }
        self.data
            .insert(CONSTANTS_KEY.to_string(), Value::Map(constants));
        Ok(())
    }

    /// Set one constant
    pub fn set_constant(&mut self, name: &str, value: Value) -> ClazzResult<()> {
        check_constant(name, &value)?;
        self.update_map(CONSTANTS_KEY, |constants| constants.insert(name.to_string(), value));
        Ok(())
    }

    /// Remove one constant
    pub fn remove_constant(&mut self, name: &str) -> Option<Value> {
        self.update_map(CONSTANTS_KEY, |constants| constants.remove(name))
    }

    /// Replace `$_requires` with plain class names
    pub fn set_requires(&mut self, names: &[String]) -> ClazzResult<()> {
        for name in names {
            check_name("requires", name)?;
        }
        self.data
            .insert(REQUIRES_KEY.to_string(), Value::strings(names));
        Ok(())
    }

    /// Set `$_final`
    pub fn set_final(&mut self, is_final: bool) {
        self.data.insert(FINAL_KEY.to_string(), Value::Bool(is_final));
    }

    /// Replace `$_static`
    pub fn set_statics(&mut self, statics: ValueMap) -> ClazzResult<()> {
        for name in statics.keys() {
            check_name("static property", name)?;
        }
        self.data.insert(STATIC_KEY.to_string(), Value::Map(statics));
        Ok(())
    }

    /// Set one static member
    pub fn set_static(&mut self, name: &str, value: Value) -> ClazzResult<()> {
        check_name("static property", name)?;
        self.update_map(STATIC_KEY, |statics| statics.insert(name.to_string(), value));
        Ok(())
    }

    /// Remove one static member
    pub fn remove_static(&mut self, name: &str) -> Option<Value> {
        self.update_map(STATIC_KEY, |statics| statics.remove(name))
    }

    /// Replace `$_abstract` with `name → arity` declarations
    pub fn set_abstract_methods(&mut self, methods: &BTreeMap<String, usize>) -> ClazzResult<()> {
        let mut placeholders = ValueMap::new();
        for (name, arity) in methods {
            check_name("abstract method", name)?;
            placeholders.insert(
                name.clone(),
                Value::Function(Function::abstract_method(*arity)),
            );
        }
        self.data
            .insert(ABSTRACT_KEY.to_string(), Value::Map(placeholders));
        Ok(())
    }

    /// Declare one abstract method
    pub fn add_abstract_method(&mut self, name: &str, arity: usize) -> ClazzResult<()> {
        check_name("abstract method", name)?;
        self.update_map(ABSTRACT_KEY, |methods| {
            methods.insert(
                name.to_string(),
                Value::Function(Function::abstract_method(arity)),
            )
        });
        Ok(())
    }

    /// Remove one abstract method declaration
    pub fn remove_abstract_method(&mut self, name: &str) -> Option<Value> {
        self.update_map(ABSTRACT_KEY, |methods| methods.remove(name))
    }

    /// Replace `$_implements`
    pub fn set_interfaces(&mut self, names: &[String]) -> ClazzResult<()> {
        self.set_name_list(IMPLEMENTS_KEY, "interface", names)
    }

    /// Append to `$_implements` (duplicates ignored)
    pub fn add_interface(&mut self, name: &str) -> ClazzResult<()> {
        self.push_name(IMPLEMENTS_KEY, "interface", name)
    }

    /// Replace `$_traits`
    pub fn set_traits(&mut self, names: &[String]) -> ClazzResult<()> {
        self.set_name_list(TRAITS_KEY, "trait", names)
    }

    /// Append to `$_traits` (duplicates ignored)
    pub fn add_trait(&mut self, name: &str) -> ClazzResult<()> {
        self.push_name(TRAITS_KEY, "trait", name)
    }

    /// Set or remove `$_constructor`
    pub fn set_constructor(&mut self, body: Option<Function>) {
        match body {
            Some(body) => {
                self.data
                    .insert(CONSTRUCTOR_KEY.to_string(), Value::Function(body));
            }
            None => {
                self.data.remove(CONSTRUCTOR_KEY);
            }
        }
    }

    /// Replace every ordinary member. Meta keys in `body` are ignored.
    pub fn set_body(&mut self, body: ValueMap) {
        self.data.retain(|key, _| is_meta_key(key));
        self.add_body(body);
    }

    /// Merge ordinary members. Meta keys in `body` are ignored.
    pub fn add_body(&mut self, body: ValueMap) {
        for (key, value) in body {
            if is_meta_key(&key) {
                debug!(key = %key, "meta attribute stripped from body");
                continue;
            }
            self.data.insert(key, value);
        }
    }

    fn update_map<R>(&mut self, key: &str, update: impl FnOnce(&mut ValueMap) -> R) -> R {
        let mut map = match self.data.remove(key) {
            Some(Value::Map(map)) => map,
            _ => ValueMap::new(),
        };
        let result = update(&mut map);
        self.data.insert(key.to_string(), Value::Map(map));
        result
    }

    fn set_name_list(&mut self, key: &str, what: &str, names: &[String]) -> ClazzResult<()> {
        let mut unique: Vec<&String> = Vec::with_capacity(names.len());
        for name in names {
            check_name(what, name)?;
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        self.data.insert(key.to_string(), Value::strings(unique));
        Ok(())
    }

    fn push_name(&mut self, key: &str, what: &str, name: &str) -> ClazzResult<()> {
        check_name(what, name)?;
        let mut names = self.name_list(key);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        self.data.insert(key.to_string(), Value::strings(names));
        Ok(())
    }

    // Processing

    /// Validate and apply every meta attribute of this definition.
    ///
    /// The definition is merged over the record kind's scaffold first. All
    /// options are validated before any is applied; nothing is written to the
    /// record itself.
    pub fn process_data(
        &self,
        record: &ClassRef,
        manager: &ClassManager,
    ) -> ClazzResult<ResolvedDefinition> {
        let kind = record.kind();
        let full = self.merged_over_scaffold(kind);

        for key in full.data.keys().filter(|key| is_meta_key(key)) {
            if kind.option(key).is_none() {
                if manager.config().strict_meta {
                    return Err(ClazzError::InvalidClassOption {
                        option: key.clone(),
                        class: record.name().to_string(),
                        reason: format!("not recognized by {}", kind.name()),
                    });
                }
                debug!(class = %record.name(), option = %key, "skipping unrecognized meta attribute");
            }
        }

        if kind.body_rule() == BodyRule::SignaturesOnly {
            if let Some(name) = full.non_methods().keys().next() {
                return Err(ClazzError::InvalidDefinition {
                    class: record.name().to_string(),
                    reason: format!(
                        "{} declares method signatures only, found data member \"{}\"",
                        kind.name(),
                        name
                    ),
                });
            }
        }

        for option in kind.options() {
            if let Some(value) = full.get(option.key()) {
                let ctx = OptionContext {
                    record,
                    manager,
                    definition: &full,
                    option: option.key(),
                };
                option.validate(&ctx, value)?;
            }
        }

        let mut resolved = ResolvedDefinition::default();
        for option in kind.options() {
            if let Some(value) = full.get(option.key()) {
                let ctx = OptionContext {
                    record,
                    manager,
                    definition: &full,
                    option: option.key(),
                };
                option.apply(&ctx, value, &mut resolved)?;
            }
        }
        Ok(resolved)
    }

    /// Ask the manager to load every class this definition refers to
    pub fn process_related_classes(
        &self,
        kind: &ClassKind,
        manager: &ClassManager,
    ) -> ClazzResult<()> {
        for option in kind.options() {
            let Some(value) = self.get(option.key()) else {
                continue;
            };
            for name in option.related(value) {
                if !manager.contains(&name) {
                    manager.load(&name)?;
                }
            }
        }
        Ok(())
    }
}

fn check_name(what: &str, name: &str) -> ClazzResult<()> {
    if name.is_empty() {
        Err(ClazzError::invalid_argument(
            what,
            "a non-empty name",
            "an empty string",
        ))
    } else {
        Ok(())
    }
}

fn check_constant(name: &str, value: &Value) -> ClazzResult<()> {
    check_name("constant", name)?;
    if value.is_function() {
        return Err(ClazzError::invalid_argument(
            name,
            "a non-function value",
            value.type_name(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassDefinition {
        ClassDefinition::new(crate::definition! {
            "$_extends" => "Base",
            "$_constants" => Value::map([("MAX", Value::from(3))]),
            "name" => "x",
            "greet" => Function::returning(0, Value::from("hi")),
        })
    }

    #[test]
    fn test_partitions_are_disjoint() {
        let d = sample();
        assert_eq!(d.methods().keys().collect::<Vec<_>>(), vec!["greet"]);
        assert_eq!(d.non_methods().keys().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(
            d.meta_data().keys().collect::<Vec<_>>(),
            vec!["$_constants", "$_extends"]
        );
        assert_eq!(d.members().len(), 2);
    }

    #[test]
    fn test_typed_accessors() {
        let d = sample();
        assert_eq!(d.extends(), Some("Base"));
        assert_eq!(d.constants().get("MAX"), Some(&Value::from(3)));
        assert!(!d.is_final());
        assert!(d.constructor().is_none());
        assert!(d.interfaces().is_empty());
    }

    #[test]
    fn test_requires_forms() {
        let list = ClassDefinition::new(crate::definition! { "$_requires" => Value::strings(["A", "B"]) });
        assert_eq!(
            list.requires(),
            vec![
                ("A".to_string(), "A".to_string()),
                ("B".to_string(), "B".to_string())
            ]
        );

        let aliased = ClassDefinition::new(crate::definition! {
            "$_requires" => Value::map([("logger", Value::from("FileLogger"))]),
        });
        assert_eq!(
            aliased.requires(),
            vec![("logger".to_string(), "FileLogger".to_string())]
        );
    }

    #[test]
    fn test_set_body_strips_meta_and_replaces() {
        let mut d = sample();
        d.set_body(crate::definition! { "age" => 3, "$_final" => true });
        assert!(d.get("name").is_none());
        assert!(d.get("greet").is_none());
        assert!(d.get("$_final").is_none());
        assert_eq!(d.get("age"), Some(&Value::from(3)));
        assert_eq!(d.extends(), Some("Base"));
    }

    #[test]
    fn test_add_body_merges() {
        let mut d = sample();
        d.add_body(crate::definition! { "name" => "y", "$_extends" => "Other" });
        assert_eq!(d.get("name"), Some(&Value::from("y")));
        assert!(d.get("greet").is_some());
        assert_eq!(d.extends(), Some("Base"));
    }

    #[test]
    fn test_constants_reject_functions() {
        let mut d = ClassDefinition::default();
        let err = d
            .set_constant("F", Value::Function(Function::abstract_method(0)))
            .unwrap_err();
        assert!(matches!(err, ClazzError::InvalidArgument { .. }));
        assert!(d.set_constant("", Value::from(1)).is_err());
        d.set_constant("A", Value::from(1)).unwrap();
        assert_eq!(d.remove_constant("A"), Some(Value::from(1)));
    }

    #[test]
    fn test_name_lists_deduplicate() {
        let mut d = ClassDefinition::default();
        d.add_interface("Greets").unwrap();
        d.add_interface("Greets").unwrap();
        d.add_interface("Walks").unwrap();
        assert_eq!(d.interfaces(), vec!["Greets", "Walks"]);

        d.set_traits(&["T".to_string(), "T".to_string()]).unwrap();
        assert_eq!(d.traits(), vec!["T"]);
        assert!(d.add_trait("").is_err());
    }

    #[test]
    fn test_abstract_declarations_are_placeholders() {
        let mut d = ClassDefinition::default();
        d.add_abstract_method("area", 0).unwrap();
        d.add_abstract_method("scale", 1).unwrap();
        let methods = d.abstract_methods();
        assert!(methods["area"].is_abstract());
        assert_eq!(methods["scale"].arity(), 1);
        assert!(d.remove_abstract_method("area").is_some());
        assert_eq!(d.abstract_methods().len(), 1);
    }

    #[test]
    fn test_constructor_set_and_remove() {
        let mut d = ClassDefinition::default();
        d.set_constructor(Some(Function::returning(1, Value::Null)));
        assert_eq!(d.constructor().map(Function::arity), Some(1));
        d.set_constructor(None);
        assert!(d.constructor().is_none());
    }
}
