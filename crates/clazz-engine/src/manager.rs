//! Class manager: the registry of class records
//!
//! A [`ClassManager`] is a cheap handle; clones share the same registry.
//! Records are kept by name in registration order. The kind table it uses is
//! separate and usually the shared standard one.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::builder::ClassBuilder;
use crate::class_type::{ClassRef, ClassType};
use crate::config::ManagerConfig;
use crate::error::{ClazzError, ClazzResult};
use crate::kind::KindRegistry;
use crate::kinds::{ABSTRACT_CLASS, CLASS, INTERFACE, TRAIT};
use crate::loader::{ClassLoader, NoopLoader};
use crate::value::ValueMap;

/// Construction options for a [`ClassManager`]
#[derive(Clone)]
pub struct ManagerOptions {
    /// Kind table
    pub kinds: Arc<KindRegistry>,
    /// Engine settings
    pub config: ManagerConfig,
    /// Provider of classes referenced before they are registered
    pub loader: Arc<dyn ClassLoader>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            kinds: KindRegistry::standard(),
            config: ManagerConfig::default(),
            loader: Arc::new(NoopLoader),
        }
    }
}

pub(crate) struct ManagerShared {
    kinds: Arc<KindRegistry>,
    config: ManagerConfig,
    loader: Arc<dyn ClassLoader>,
    records: RwLock<FxHashMap<String, ClassRef>>,
    order: RwLock<Vec<String>>,
    anonymous: AtomicUsize,
}

/// Registry of class records
#[derive(Clone)]
pub struct ClassManager {
    shared: Arc<ManagerShared>,
}

impl ClassManager {
    /// Create a manager over the standard kinds
    pub fn new() -> Self {
        Self::with_options(ManagerOptions::default())
    }

    /// Create a manager over the standard kinds with custom settings
    pub fn with_config(config: ManagerConfig) -> Self {
        Self::with_options(ManagerOptions {
            config,
            ..ManagerOptions::default()
        })
    }

    /// Create a manager from explicit options
    pub fn with_options(options: ManagerOptions) -> Self {
        Self {
            shared: Arc::new(ManagerShared {
                kinds: options.kinds,
                config: options.config,
                loader: options.loader,
                records: RwLock::new(FxHashMap::default()),
                order: RwLock::new(Vec::new()),
                anonymous: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<ManagerShared>) -> Self {
        Self { shared }
    }

    pub(crate) fn downgrade(&self) -> Weak<ManagerShared> {
        Arc::downgrade(&self.shared)
    }

    /// Register a record of `kind` under `name`.
    ///
    /// The definition is stored and its related classes are loaded; the
    /// constructor is not synthesized yet.
    pub fn add(&self, kind: &str, name: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        let kind = self.shared.kinds.get(kind)?;
        if name.is_empty() {
            return Err(ClazzError::invalid_argument(
                "name",
                "a non-empty class name",
                "an empty string",
            ));
        }

        let record = ClassType::new(name, kind, self);
        {
            let mut records = self.shared.records.write();
            if records.contains_key(name) {
                return Err(ClazzError::DuplicateClass {
                    name: name.to_string(),
                });
            }
            records.insert(name.to_string(), record.clone());
            self.shared.order.write().push(name.to_string());
        }

        if let Err(err) = record.create_definition(data) {
            self.discard(name);
            return Err(err);
        }
        debug!(class = %name, kind = %record.kind().name(), "class registered");
        Ok(record)
    }

    /// Register a Class
    pub fn add_class(&self, name: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        self.add(CLASS, name, data)
    }

    /// Register an AbstractClass
    pub fn add_abstract_class(&self, name: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        self.add(ABSTRACT_CLASS, name, data)
    }

    /// Register an Interface
    pub fn add_interface(&self, name: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        self.add(INTERFACE, name, data)
    }

    /// Register a Trait
    pub fn add_trait(&self, name: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        self.add(TRAIT, name, data)
    }

    /// Register a record and synthesize it; nothing stays registered on failure
    pub(crate) fn add_synthesized(
        &self,
        kind: &str,
        name: &str,
        data: ValueMap,
    ) -> ClazzResult<ClassRef> {
        let record = self.add(kind, name, data)?;
        if let Err(err) = record.constructor() {
            self.discard(name);
            return Err(err);
        }
        Ok(record)
    }

    /// Synthesize an unregistered record under a generated name
    pub(crate) fn create_anonymous(&self, kind: &str, data: ValueMap) -> ClazzResult<ClassRef> {
        let kind = self.shared.kinds.get(kind)?;
        let id = self.shared.anonymous.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}@anonymous#{}", kind.name(), id);
        let record = ClassType::new(name, kind, self);
        record.create_definition(data)?;
        record.constructor()?;
        Ok(record)
    }

    /// Look up a record
    pub fn get(&self, name: &str) -> ClazzResult<ClassRef> {
        self.shared
            .records
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ClazzError::NotExistentClass {
                name: name.to_string(),
            })
    }

    /// Check if a record is registered
    pub fn contains(&self, name: &str) -> bool {
        self.shared.records.read().contains_key(name)
    }

    /// Start a builder session. An existing `name` binds the builder to that
    /// record.
    pub fn build(&self, kind: &str, name: Option<&str>) -> ClazzResult<ClassBuilder> {
        ClassBuilder::new(self.clone(), kind, name)
    }

    /// Start a builder session bound to an existing record
    pub fn alter(&self, name: &str) -> ClazzResult<ClassBuilder> {
        let record = self.get(name)?;
        ClassBuilder::bound(self.clone(), record)
    }

    /// Register `new_name` with the authored definition of `source`
    pub fn copy(&self, source: &str, new_name: &str) -> ClazzResult<ClassRef> {
        let source = self.get(source)?;
        let data = source.definition().into_data();
        let record = self.add_synthesized(source.kind().name(), new_name, data)?;
        debug!(class = %new_name, from = %source.name(), "class copied");
        Ok(record)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.shared.order.read().clone()
    }

    /// Number of registered records
    pub fn len(&self) -> usize {
        self.shared.records.read().len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The kind table
    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.shared.kinds
    }

    /// Engine settings
    pub fn config(&self) -> &ManagerConfig {
        &self.shared.config
    }

    pub(crate) fn load(&self, name: &str) -> ClazzResult<()> {
        debug!(class = %name, "loading related class");
        self.shared.loader.load(name, self)
    }

    pub(crate) fn discard(&self, name: &str) {
        if self.shared.records.write().remove(name).is_some() {
            self.shared.order.write().retain(|n| n != name);
            warn!(class = %name, "registration discarded");
        }
    }
}

impl Default for ClassManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClassManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassManager")
            .field("classes", &self.names())
            .field("config", &self.shared.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;
    use crate::value::Value;

    #[test]
    fn test_add_and_get() {
        let manager = ClassManager::new();
        let record = manager
            .add_class("Point", crate::definition! { "x" => 0, "y" => 0 })
            .unwrap();
        assert_eq!(record.name(), "Point");
        assert_eq!(record.kind().name(), CLASS);

        let retrieved = manager.get("Point").unwrap();
        assert!(Arc::ptr_eq(&record, &retrieved));
        assert!(!retrieved.is_synthesized());
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let manager = ClassManager::new();
        assert!(matches!(
            manager.add("Struct", "Point", ValueMap::new()),
            Err(ClazzError::UnknownKind { .. })
        ));
        assert!(matches!(
            manager.add_class("", ValueMap::new()),
            Err(ClazzError::InvalidArgument { .. })
        ));

        manager.add_class("Point", ValueMap::new()).unwrap();
        assert_eq!(
            manager.add_trait("Point", ValueMap::new()).unwrap_err(),
            ClazzError::DuplicateClass {
                name: "Point".to_string()
            }
        );
    }

    #[test]
    fn test_get_missing() {
        let manager = ClassManager::new();
        assert_eq!(
            manager.get("Nope").unwrap_err(),
            ClazzError::NotExistentClass {
                name: "Nope".to_string()
            }
        );
        assert!(!manager.contains("Nope"));
        assert!(matches!(
            manager.alter("Nope"),
            Err(ClazzError::NotExistentClass { .. })
        ));
    }

    #[test]
    fn test_registration_order() {
        let manager = ClassManager::new();
        assert!(manager.is_empty());
        manager.add_class("Point", ValueMap::new()).unwrap();
        manager.add_interface("Shape", ValueMap::new()).unwrap();
        manager.add_trait("Named", ValueMap::new()).unwrap();

        assert_eq!(manager.len(), 3);
        assert_eq!(manager.names(), vec!["Point", "Shape", "Named"]);
    }

    #[test]
    fn test_copy_is_independent() {
        let manager = ClassManager::new();
        manager
            .add_class(
                "A",
                crate::definition! {
                    "label" => "a",
                    "name" => Function::returning(0, Value::from("A")),
                },
            )
            .unwrap();

        let b = manager.copy("A", "B").unwrap();
        assert!(b.is_synthesized());
        let a = manager.get("A").unwrap();
        assert_eq!(b.methods(false).unwrap().len(), 1);
        assert_eq!(
            b.non_methods(false).unwrap(),
            a.non_methods(false).unwrap()
        );

        b.set_definition(crate::definition! { "label" => "b" }).unwrap();
        assert_eq!(
            a.non_methods(false).unwrap().get("label"),
            Some(&Value::from("a"))
        );
        assert!(b.methods(false).unwrap().is_empty());
    }

    #[test]
    fn test_failed_copy_is_discarded() {
        let manager = ClassManager::new();
        manager
            .add_interface(
                "Greets",
                crate::definition! { "hello" => Function::abstract_method(0) },
            )
            .unwrap();
        manager
            .add_abstract_class(
                "Base",
                crate::definition! { "$_implements" => Value::strings(["Greets"]) },
            )
            .unwrap();

        // A Class built from an abstract definition still has to be complete.
        let data = manager.get("Base").unwrap().definition().into_data();
        let result = manager.add_synthesized(CLASS, "Concrete", data);
        assert!(matches!(
            result,
            Err(ClazzError::MissingAbstractMethods { .. })
        ));
        assert!(!manager.contains("Concrete"));
    }

    #[test]
    fn test_loader_registers_on_demand() {
        let loader = |name: &str, manager: &ClassManager| -> ClazzResult<()> {
            if name == "Base" {
                manager.add_class("Base", crate::definition! { "id" => 1 })?;
            }
            Ok(())
        };
        let manager = ClassManager::with_options(ManagerOptions {
            loader: Arc::new(loader),
            ..ManagerOptions::default()
        });

        manager
            .add_class("Child", crate::definition! { "$_extends" => "Base" })
            .unwrap();
        assert!(manager.contains("Base"));
        assert_eq!(manager.names(), vec!["Child", "Base"]);
    }

    #[test]
    fn test_anonymous_records_are_unregistered() {
        let manager = ClassManager::new();
        let record = manager
            .create_anonymous(CLASS, crate::definition! { "x" => 1 })
            .unwrap();
        assert!(record.name().starts_with("Class@anonymous#"));
        assert!(!manager.contains(record.name()));
        assert!(record.is_synthesized());
    }
}
