//! Fluent class building
//!
//! A [`ClassBuilder`] stages a definition and only touches the registry on
//! [`save`](ClassBuilder::save), [`save_as`](ClassBuilder::save_as) or
//! [`create`](ClassBuilder::create). When started for an existing record it
//! is *bound*: it starts from that record's authored definition and saving
//! replaces the definition in place.
//!
//! ```ignore
//! let point = manager
//!     .build(CLASS, Some("Point"))?
//!     .set_constant("ORIGIN", 0)?
//!     .add_body(definition! { "x" => 0, "y" => 0 })?
//!     .save()?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::class_type::ClassRef;
use crate::definition::ClassDefinition;
use crate::error::{ClazzError, ClazzResult};
use crate::function::Function;
use crate::kind::{Capability, ClassKind};
use crate::manager::ClassManager;
use crate::value::{Value, ValueMap};

/// Staged definition editing session
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    manager: ClassManager,
    kind: Option<Arc<ClassKind>>,
    name: Option<String>,
    bound: Option<ClassRef>,
    definition: ClassDefinition,
}

impl ClassBuilder {
    /// Builder with neither kind nor name
    pub fn empty(manager: ClassManager) -> Self {
        Self {
            manager,
            kind: None,
            name: None,
            bound: None,
            definition: ClassDefinition::default(),
        }
    }

    /// Builder for `kind`. An existing `name` binds the builder to that record,
    /// which must be of the same kind.
    pub fn new(manager: ClassManager, kind: &str, name: Option<&str>) -> ClazzResult<Self> {
        let kind = manager.kinds().get(kind)?;
        if let Some(name) = name {
            if let Ok(record) = manager.get(name) {
                if record.kind().name() != kind.name() {
                    return Err(ClazzError::invalid_argument(
                        "kind",
                        record.kind().name(),
                        kind.name(),
                    ));
                }
                return Self::bound(manager, record);
            }
        }
        let mut builder = Self::empty(manager);
        builder.kind = Some(kind);
        builder.name = name.map(str::to_string);
        Ok(builder)
    }

    /// Builder bound to `record`; fails when the record is frozen
    pub fn bound(manager: ClassManager, record: ClassRef) -> ClazzResult<Self> {
        if record.is_frozen() {
            return Err(ClazzError::InstanceCreated {
                class: record.name().to_string(),
            });
        }
        Ok(Self {
            manager,
            kind: Some(record.kind().clone()),
            name: Some(record.name().to_string()),
            definition: record.definition(),
            bound: Some(record),
        })
    }

    fn editable(&self, capability: Option<(Capability, &str)>) -> ClazzResult<()> {
        if let Some(record) = &self.bound {
            if record.is_frozen() {
                return Err(ClazzError::InstanceCreated {
                    class: record.name().to_string(),
                });
            }
        }
        if let Some((capability, operation)) = capability {
            self.kind()?.require(capability, operation)?;
        }
        Ok(())
    }

    fn kind(&self) -> ClazzResult<&Arc<ClassKind>> {
        self.kind.as_ref().ok_or_else(|| ClazzError::MissedArgument {
            argument: "kind".to_string(),
        })
    }

    /// Staged name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Staged kind name
    pub fn kind_name(&self) -> Option<&str> {
        self.kind.as_ref().map(|kind| kind.name())
    }

    /// Record this builder saves into, if bound
    pub fn bound_record(&self) -> Option<&ClassRef> {
        self.bound.as_ref()
    }

    /// Staged definition
    pub fn definition(&self) -> &ClassDefinition {
        &self.definition
    }

    /// Rename; a bound builder given a different name is unbound
    pub fn set_name(&mut self, name: &str) -> ClazzResult<&mut Self> {
        if name.is_empty() {
            return Err(ClazzError::invalid_argument(
                "name",
                "a non-empty class name",
                "an empty string",
            ));
        }
        if self.bound.as_ref().is_some_and(|r| r.name() != name) {
            self.bound = None;
        }
        self.name = Some(name.to_string());
        Ok(self)
    }

    /// Change the kind; a bound builder given a different kind is unbound
    pub fn set_kind(&mut self, kind: &str) -> ClazzResult<&mut Self> {
        let kind = self.manager.kinds().get(kind)?;
        if self
            .bound
            .as_ref()
            .is_some_and(|r| r.kind().name() != kind.name())
        {
            self.bound = None;
        }
        self.kind = Some(kind);
        Ok(self)
    }

    /// Staged parent name
    pub fn get_parent(&self) -> Option<&str> {
        self.definition.extends()
    }

    /// Set the parent
    pub fn set_parent(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.set_extends(Some(name))?;
        Ok(self)
    }

    /// Clear the parent
    pub fn remove_parent(&mut self) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.set_extends(None)?;
        Ok(self)
    }

    /// Staged constants
    pub fn get_constants(&self) -> ValueMap {
        self.definition.constants()
    }

    /// Replace all constants
    pub fn set_constants(&mut self, constants: ValueMap) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.set_constants(constants)?;
        Ok(self)
    }

    /// Set one constant
    pub fn set_constant(&mut self, name: &str, value: impl Into<Value>) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.set_constant(name, value.into())?;
        Ok(self)
    }

    /// Remove one constant
    pub fn remove_constant(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.remove_constant(name);
        Ok(self)
    }

    /// Staged ordinary members
    pub fn get_body(&self) -> ValueMap {
        self.definition.members()
    }

    /// Replace all ordinary members (meta keys are stripped)
    pub fn set_body(&mut self, body: ValueMap) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.set_body(body);
        Ok(self)
    }

    /// Merge ordinary members (meta keys are stripped)
    pub fn add_body(&mut self, body: ValueMap) -> ClazzResult<&mut Self> {
        self.editable(None)?;
        self.definition.add_body(body);
        Ok(self)
    }

    /// Staged constructor body
    pub fn get_constructor(&self) -> Option<&Function> {
        self.definition.constructor()
    }

    /// Set the constructor body
    pub fn set_constructor(&mut self, body: Function) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Constructor, "set_constructor")))?;
        self.definition.set_constructor(Some(body));
        Ok(self)
    }

    /// Remove the constructor body
    pub fn remove_constructor(&mut self) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Constructor, "remove_constructor")))?;
        self.definition.set_constructor(None);
        Ok(self)
    }

    /// Staged final flag
    pub fn get_final(&self) -> bool {
        self.definition.is_final()
    }

    /// Set the final flag
    pub fn set_final(&mut self, is_final: bool) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Final, "set_final")))?;
        self.definition.set_final(is_final);
        Ok(self)
    }

    /// Staged static members
    pub fn get_static_properties(&self) -> ValueMap {
        self.definition.statics()
    }

    /// Replace all static members
    pub fn set_static_properties(&mut self, statics: ValueMap) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Static, "set_static_properties")))?;
        self.definition.set_statics(statics)?;
        Ok(self)
    }

    /// Set one static member
    pub fn set_static_property(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Static, "set_static_property")))?;
        self.definition.set_static(name, value.into())?;
        Ok(self)
    }

    /// Remove one static member
    pub fn remove_static_property(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Static, "remove_static_property")))?;
        self.definition.remove_static(name);
        Ok(self)
    }

    /// Staged abstract method placeholders
    pub fn get_abstract_methods(&self) -> BTreeMap<String, Function> {
        self.definition.abstract_methods()
    }

    /// Replace all abstract method declarations (`name → arity`)
    pub fn set_abstract_methods<S: Into<String>>(
        &mut self,
        methods: impl IntoIterator<Item = (S, usize)>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Abstract, "set_abstract_methods")))?;
        let methods: BTreeMap<String, usize> = methods
            .into_iter()
            .map(|(name, arity)| (name.into(), arity))
            .collect();
        self.definition.set_abstract_methods(&methods)?;
        Ok(self)
    }

    /// Declare one abstract method
    pub fn add_abstract_method(&mut self, name: &str, arity: usize) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Abstract, "add_abstract_method")))?;
        self.definition.add_abstract_method(name, arity)?;
        Ok(self)
    }

    /// Declare several abstract methods
    pub fn add_abstract_methods<S: AsRef<str>>(
        &mut self,
        methods: impl IntoIterator<Item = (S, usize)>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Abstract, "add_abstract_methods")))?;
        for (name, arity) in methods {
            self.definition.add_abstract_method(name.as_ref(), arity)?;
        }
        Ok(self)
    }

    /// Remove one abstract method declaration
    pub fn remove_abstract_method(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Abstract, "remove_abstract_method")))?;
        self.definition.remove_abstract_method(name);
        Ok(self)
    }

    /// Staged interface names
    pub fn get_interfaces(&self) -> Vec<String> {
        self.definition.interfaces()
    }

    /// Replace the implemented interfaces
    pub fn set_interfaces<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Interfaces, "set_interfaces")))?;
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.definition.set_interfaces(&names)?;
        Ok(self)
    }

    /// Implement one more interface
    pub fn add_interface(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Interfaces, "add_interface")))?;
        self.definition.add_interface(name)?;
        Ok(self)
    }

    /// Implement several more interfaces
    pub fn add_interfaces<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Interfaces, "add_interfaces")))?;
        for name in names {
            self.definition.add_interface(name.as_ref())?;
        }
        Ok(self)
    }

    /// Staged trait names
    pub fn get_traits(&self) -> Vec<String> {
        self.definition.traits()
    }

    /// Replace the composed traits
    pub fn set_traits<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Traits, "set_traits")))?;
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.definition.set_traits(&names)?;
        Ok(self)
    }

    /// Compose one more trait
    pub fn add_trait(&mut self, name: &str) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Traits, "add_trait")))?;
        self.definition.add_trait(name)?;
        Ok(self)
    }

    /// Compose several more traits
    pub fn add_traits<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> ClazzResult<&mut Self> {
        self.editable(Some((Capability::Traits, "add_traits")))?;
        for name in names {
            self.definition.add_trait(name.as_ref())?;
        }
        Ok(self)
    }

    /// Check that a name and a kind are set
    pub fn validate(&self) -> ClazzResult<()> {
        if self.name.is_none() {
            return Err(ClazzError::MissedArgument {
                argument: "name".to_string(),
            });
        }
        self.kind().map(|_| ())
    }

    /// Commit the staged definition.
    ///
    /// A bound builder replaces its record's definition. Otherwise a new
    /// record is registered and synthesized, and the builder binds to it.
    pub fn save(&mut self) -> ClazzResult<ClassRef> {
        self.validate()?;
        if let Some(record) = &self.bound {
            record.set_definition(self.definition.data().clone())?;
            return Ok(record.clone());
        }
        let name = self.name.clone().unwrap_or_default();
        let kind = self.kind()?.name().to_string();
        let record = self
            .manager
            .add_synthesized(&kind, &name, self.definition.data().clone())?;
        self.bound = Some(record.clone());
        Ok(record)
    }

    /// Register the staged definition as a new record named `name`
    pub fn save_as(&self, name: &str) -> ClazzResult<ClassRef> {
        let kind = self.kind()?.name().to_string();
        self.manager
            .add_synthesized(&kind, name, self.definition.data().clone())
    }

    /// Synthesize the staged definition as an anonymous, unregistered record
    pub fn create(&self) -> ClazzResult<ClassRef> {
        let kind = self.kind()?.name().to_string();
        self.manager
            .create_anonymous(&kind, self.definition.data().clone())
    }
}
