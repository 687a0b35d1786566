//! Class records
//!
//! A [`ClassType`] is one declared class, abstract class, interface or trait.
//! It stores the authored definition and, once synthesized, the state derived
//! from it: parent link, constants, abstract-method table, contracts, mixins
//! and static members. Synthesis is lazy and memoized; [`ClassType::constructor`]
//! runs the whole pipeline the first time it is called.
//!
//! Records refer to each other by name through the owning manager. A record
//! holds only a weak handle to that manager.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constructor::{Constructor, CONSTRUCTOR_KEY};
use crate::definition::{ClassDefinition, ResolvedDefinition};
use crate::error::{ClazzError, ClazzResult};
use crate::function::{CallContext, Function, Receiver};
use crate::instance::Instance;
use crate::kind::{BodyRule, Capability, ClassKind};
use crate::manager::{ClassManager, ManagerShared};
use crate::reflect::ClassSummary;
use crate::statics::StaticContext;
use crate::value::{Value, ValueMap};

/// Shared handle to a class record
pub type ClassRef = Arc<ClassType>;

/// Ancestors of a record, grouped by relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassParents {
    /// Parent chain, nearest first
    pub parents: Vec<String>,
    /// Contracts held directly or transitively
    pub interfaces: Vec<String>,
    /// Mixins composed directly or transitively
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct RecordState {
    definition: ClassDefinition,
    parent: Option<String>,
    requires: Vec<(String, String)>,
    constants: ValueMap,
    is_final: bool,
    abstract_methods: BTreeMap<String, Function>,
    interfaces: Vec<String>,
    traits: Vec<String>,
}

impl RecordState {
    fn related(&self) -> Vec<String> {
        self.parent
            .iter()
            .chain(&self.interfaces)
            .chain(&self.traits)
            .cloned()
            .collect()
    }
}

// Everything a redefinition may overwrite on one record.
struct RecordSnapshot {
    record: ClassRef,
    state: RecordState,
    statics: ValueMap,
    shape: Option<Arc<Constructor>>,
}

impl RecordSnapshot {
    fn take(record: &ClassRef) -> Self {
        Self {
            record: record.clone(),
            state: record.state.read().clone(),
            statics: record.statics.snapshot(),
            shape: record.constructor.read().clone(),
        }
    }

    fn restore(self, manager: &ClassManager) {
        let record = self.record;
        let current = record.state.read().related();
        let previous = self.state.related();
        *record.state.write() = self.state;
        record.statics.replace(self.statics);
        *record.constructor.write() = self.shape;
        if manager.contains(&record.name) {
            record.relink(manager, &current, &previous);
        }
    }
}

/// A class record
pub struct ClassType {
    name: String,
    kind: Arc<ClassKind>,
    manager: Weak<ManagerShared>,
    state: RwLock<RecordState>,
    children: RwLock<Vec<String>>,
    statics: StaticContext,
    constructor: RwLock<Option<Arc<Constructor>>>,
    synthesis: ReentrantMutex<()>,
    synthesizing: AtomicBool,
    instance_created: AtomicBool,
}

impl ClassType {
    pub(crate) fn new(name: impl Into<String>, kind: Arc<ClassKind>, manager: &ClassManager) -> ClassRef {
        Arc::new(Self {
            name: name.into(),
            kind,
            manager: manager.downgrade(),
            state: RwLock::new(RecordState::default()),
            children: RwLock::new(Vec::new()),
            statics: StaticContext::new(),
            constructor: RwLock::new(None),
            synthesis: ReentrantMutex::new(()),
            synthesizing: AtomicBool::new(false),
            instance_created: AtomicBool::new(false),
        })
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class kind
    pub fn kind(&self) -> &Arc<ClassKind> {
        &self.kind
    }

    /// The owning manager
    pub fn manager(&self) -> ClazzResult<ClassManager> {
        self.manager
            .upgrade()
            .map(ClassManager::from_shared)
            .ok_or_else(|| ClazzError::Detached {
                class: self.name.clone(),
            })
    }

    /// Copy of the authored definition
    pub fn definition(&self) -> ClassDefinition {
        self.state.read().definition.clone()
    }

    /// Store a definition and load the classes it refers to
    pub fn create_definition(&self, data: ValueMap) -> ClazzResult<ClassDefinition> {
        let manager = self.manager()?;
        let definition = ClassDefinition::new(data);
        definition.process_related_classes(&self.kind, &manager)?;
        self.state.write().definition = definition.clone();
        Ok(definition)
    }

    /// Replace the definition and re-run the pipeline.
    ///
    /// Every record that depends on this one and was already synthesized is
    /// synthesized again against the new definition. If this record or any of
    /// those dependents fails, all of them are put back as they were and the
    /// first error is returned.
    pub fn set_definition(self: &Arc<Self>, data: ValueMap) -> ClazzResult<()> {
        if self.is_frozen() {
            return Err(ClazzError::InstanceCreated {
                class: self.name.clone(),
            });
        }
        let manager = self.manager()?;
        let definition = ClassDefinition::new(data);
        definition.process_related_classes(&self.kind, &manager)?;

        let mut snapshots = vec![RecordSnapshot::take(self)];
        self.state.write().definition = definition;
        self.constructor.write().take();
        self.invalidate_dependents(&manager, &mut snapshots);

        let result = snapshots
            .iter()
            .try_for_each(|snapshot| snapshot.record.constructor().map(drop));
        match result {
            Ok(()) => {
                info!(
                    class = %self.name,
                    dependents = snapshots.len() - 1,
                    "class definition replaced"
                );
                Ok(())
            }
            Err(err) => {
                warn!(class = %self.name, error = %err, "definition rejected, previous one restored");
                for snapshot in snapshots.into_iter().rev() {
                    snapshot.restore(&manager);
                }
                Err(err)
            }
        }
    }

    /// Set or clear the parent and re-run the pipeline
    pub fn set_parent(self: &Arc<Self>, parent: Option<&str>) -> ClazzResult<()> {
        if self.is_frozen() {
            return Err(ClazzError::InstanceCreated {
                class: self.name.clone(),
            });
        }
        if let Some(name) = parent {
            self.check_parent(&self.manager()?, name)?;
        }
        let mut definition = self.definition();
        definition.set_extends(parent)?;
        self.set_definition(definition.into_data())
    }

    /// Validate `name` as a parent of this record
    pub(crate) fn check_parent(&self, manager: &ClassManager, name: &str) -> ClazzResult<ClassRef> {
        if name == self.name {
            return Err(ClazzError::SelfParent {
                name: self.name.clone(),
            });
        }
        let parent = manager.get(name)?;
        if !self.kind.can_extend(parent.kind.name()) {
            return Err(ClazzError::IncompatibleParent {
                class: self.name.clone(),
                kind: self.kind.name().to_string(),
                parent: parent.name.clone(),
                parent_kind: parent.kind.name().to_string(),
            });
        }
        if parent.definition().is_final() {
            return Err(ClazzError::FinalParent {
                class: self.name.clone(),
                parent: parent.name.clone(),
            });
        }

        let max_depth = manager.config().max_inheritance_depth;
        let mut ancestor = parent.definition().extends().map(str::to_string);
        let mut depth = 1;
        while let Some(current) = ancestor {
            depth += 1;
            if current == self.name || depth > max_depth {
                return Err(ClazzError::InheritanceCycle {
                    class: self.name.clone(),
                });
            }
            ancestor = manager
                .get(&current)
                .ok()
                .and_then(|record| record.definition().extends().map(str::to_string));
        }
        Ok(parent)
    }

    /// Check if the constructor has been synthesized
    pub fn is_synthesized(&self) -> bool {
        self.constructor.read().is_some()
    }

    /// The synthesized constructor, built on first use.
    ///
    /// Concurrent callers wait for the thread already synthesizing this record
    /// and then share its result.
    pub fn constructor(self: &Arc<Self>) -> ClazzResult<Arc<Constructor>> {
        if let Some(shape) = self.constructor.read().clone() {
            return Ok(shape);
        }
        let _guard = self.synthesis.lock();
        if let Some(shape) = self.constructor.read().clone() {
            return Ok(shape);
        }
        // Only the thread holding the lock can see the flag set: re-entrancy.
        if self.synthesizing.swap(true, Ordering::AcqRel) {
            return Err(ClazzError::InheritanceCycle {
                class: self.name.clone(),
            });
        }
        let result = self.synthesize();
        self.synthesizing.store(false, Ordering::Release);
        result
    }

    fn synthesize(self: &Arc<Self>) -> ClazzResult<Arc<Constructor>> {
        let manager = self.manager()?;
        let definition = self.definition();
        let resolved = definition.process_data(self, &manager)?;
        let signatures_only = self.kind.body_rule() == BodyRule::SignaturesOnly;

        let mut shape = Constructor::shell();
        if let Some(parent) = &resolved.parent {
            let parent_shape = parent.constructor()?;
            shape.inherit(&parent_shape);
        }
        shape.attach(&resolved.mixed, self, signatures_only);
        shape.attach(&definition.members(), self, signatures_only);
        if let Some(body) = &resolved.constructor {
            shape.set_body(body.clone(), self);
        }

        let abstract_methods = self.collect_abstract_methods(&resolved, &shape)?;

        // Declared but unimplemented methods stay callable as placeholders.
        let placeholders: ValueMap = resolved
            .abstract_methods
            .iter()
            .filter(|(name, _)| shape.method(name).is_none())
            .map(|(name, function)| (name.clone(), Value::Function(function.clone())))
            .collect();
        shape.attach(&placeholders, self, true);

        if !self.kind.carries_abstract() {
            let missing: Vec<String> = abstract_methods
                .keys()
                .filter(|name| !shape.has_concrete_method(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(ClazzError::MissingAbstractMethods {
                    class: self.name.clone(),
                    methods: missing,
                });
            }
        }

        shape.stamp(self);
        let shape = Arc::new(shape);
        self.commit(&manager, resolved, abstract_methods, shape.clone());
        debug!(
            class = %self.name,
            kind = %self.kind.name(),
            methods = shape.methods().count(),
            "constructor synthesized"
        );
        Ok(shape)
    }

    // Parent table, then every contract's obligations, then own declarations.
    // Signature-only kinds also count their own methods as obligations.
    fn collect_abstract_methods(
        &self,
        resolved: &ResolvedDefinition,
        shape: &Constructor,
    ) -> ClazzResult<BTreeMap<String, Function>> {
        let mut table = BTreeMap::new();
        if let Some(parent) = &resolved.parent {
            table.extend(parent.abstract_methods()?);
        }
        for interface in &resolved.interfaces {
            for (name, function) in interface.abstract_methods()? {
                table.entry(name).or_insert(function);
            }
        }
        for (name, function) in &resolved.abstract_methods {
            table.insert(name.clone(), function.clone());
        }
        if self.kind.body_rule() == BodyRule::SignaturesOnly {
            for (name, member) in shape.methods() {
                table
                    .entry(name.clone())
                    .or_insert_with(|| member.function().signature());
            }
        }
        Ok(table)
    }

    fn commit(
        self: &Arc<Self>,
        manager: &ClassManager,
        resolved: ResolvedDefinition,
        abstract_methods: BTreeMap<String, Function>,
        shape: Arc<Constructor>,
    ) {
        let previous_related = {
            let mut state = self.state.write();
            let previous = state.related();
            state.parent = resolved.parent.as_ref().map(|p| p.name.clone());
            state.requires = resolved.requires;
            state.constants = resolved.constants;
            state.is_final = resolved.is_final;
            state.abstract_methods = abstract_methods;
            state.interfaces = resolved.interfaces.iter().map(|i| i.name.clone()).collect();
            state.traits = resolved.traits.iter().map(|t| t.name.clone()).collect();
            previous
        };
        self.statics.replace(resolved.statics);
        *self.constructor.write() = Some(shape);

        // Anonymous records are not linked as children.
        if !manager.contains(&self.name) {
            return;
        }
        let related = self.state.read().related();
        self.relink(manager, &previous_related, &related);
    }

    fn relink(&self, manager: &ClassManager, previous: &[String], related: &[String]) {
        for name in previous.iter().filter(|n| !related.contains(n)) {
            if let Ok(record) = manager.get(name) {
                record.children.write().retain(|child| child != &self.name);
            }
        }
        for name in related {
            if let Ok(record) = manager.get(name) {
                let mut children = record.children.write();
                if !children.contains(&self.name) {
                    children.push(self.name.clone());
                }
            }
        }
    }

    // Drops the memoized constructor of every synthesized dependent, recording
    // what it was so a failed redefinition can restore it.
    fn invalidate_dependents(&self, manager: &ClassManager, snapshots: &mut Vec<RecordSnapshot>) {
        for child in self.children() {
            let record = match manager.get(&child) {
                Ok(record) => record,
                Err(_) => continue,
            };
            if snapshots.iter().any(|s| s.record.name == record.name) {
                continue;
            }
            if record.is_synthesized() {
                snapshots.push(RecordSnapshot::take(&record));
                record.constructor.write().take();
                debug!(class = %child, because = %self.name, "constructor invalidated");
            }
            record.invalidate_dependents(manager, snapshots);
        }
    }

    /// Create an instance and run the constructor body with `args`
    pub fn create_instance(self: &Arc<Self>, args: &[Value]) -> ClazzResult<Instance> {
        if !self.kind.is_instantiable() {
            return Err(ClazzError::NotInstantiable {
                class: self.name.clone(),
                kind: self.kind.name().to_string(),
            });
        }
        let shape = self.constructor()?;
        let instance = Instance::allocate(self.clone(), shape.clone());
        instance.seal();

        if let Some(body) = shape.body() {
            let owner = body.owner()?;
            let receiver = Receiver::Instance(instance.clone());
            let ctx = CallContext::new(&receiver, &owner, CONSTRUCTOR_KEY);
            body.function().invoke(&ctx, args)?;
        }

        self.mark_instance_created()?;
        Ok(instance)
    }

    /// Freeze this record and every record it derives from
    pub fn mark_instance_created(self: &Arc<Self>) -> ClazzResult<()> {
        self.instance_created.store(true, Ordering::Release);
        let manager = self.manager()?;
        for name in self.class_parents()? {
            if let Ok(record) = manager.get(&name) {
                record.instance_created.store(true, Ordering::Release);
            }
        }
        Ok(())
    }

    /// Check if this record (or a record deriving from it) produced an instance
    pub fn was_instance_created(&self) -> bool {
        self.instance_created.load(Ordering::Acquire)
    }

    /// Check if edits are locked out: this record or one of its ancestors
    /// has produced an instance
    pub fn is_frozen(&self) -> bool {
        if self.was_instance_created() {
            return true;
        }
        let Ok(manager) = self.manager() else {
            return false;
        };
        let max_depth = manager.config().max_inheritance_depth;
        let mut ancestor = self.definition().extends().map(str::to_string);
        let mut depth = 0;
        while let Some(name) = ancestor {
            depth += 1;
            if depth > max_depth {
                break;
            }
            let Ok(record) = manager.get(&name) else {
                break;
            };
            if record.was_instance_created() {
                return true;
            }
            ancestor = record.definition().extends().map(str::to_string);
        }
        false
    }

    // Reflection

    /// Parent record
    pub fn parent(self: &Arc<Self>) -> ClazzResult<Option<ClassRef>> {
        self.constructor()?;
        let parent = self.state.read().parent.clone();
        match parent {
            Some(name) => Ok(Some(self.manager()?.get(&name)?)),
            None => Ok(None),
        }
    }

    /// Names of records that extend, implement or compose this one
    pub fn children(&self) -> Vec<String> {
        self.children.read().clone()
    }

    /// Ordered unique ancestors: parent chain, then contracts, then mixins
    pub fn class_parents(self: &Arc<Self>) -> ClazzResult<Vec<String>> {
        let grouped = self.class_parents_grouped()?;
        let mut all: Vec<String> = Vec::new();
        for name in grouped
            .parents
            .into_iter()
            .chain(grouped.interfaces)
            .chain(grouped.traits)
        {
            if !all.contains(&name) {
                all.push(name);
            }
        }
        Ok(all)
    }

    /// Ancestors grouped by relation
    pub fn class_parents_grouped(self: &Arc<Self>) -> ClazzResult<ClassParents> {
        self.constructor()?;
        let manager = self.manager()?;
        let (interfaces, traits) = {
            let state = self.state.read();
            (state.interfaces.clone(), state.traits.clone())
        };

        let mut grouped = ClassParents::default();
        for name in interfaces {
            let interface = manager.get(&name)?;
            push_unique(&mut grouped.interfaces, name);
            let inherited = interface.class_parents_grouped()?;
            extend_unique(&mut grouped.interfaces, inherited.parents);
            extend_unique(&mut grouped.interfaces, inherited.interfaces);
        }
        for name in traits {
            let mixin = manager.get(&name)?;
            push_unique(&mut grouped.traits, name);
            extend_unique(&mut grouped.traits, mixin.class_parents_grouped()?.parents);
        }
        if let Some(parent) = self.parent()? {
            push_unique(&mut grouped.parents, parent.name.clone());
            let inherited = parent.class_parents_grouped()?;
            extend_unique(&mut grouped.parents, inherited.parents);
            extend_unique(&mut grouped.interfaces, inherited.interfaces);
            extend_unique(&mut grouped.traits, inherited.traits);
        }
        Ok(grouped)
    }

    /// Check if `name` is this record or one of its ancestors
    pub fn is_instance_of(self: &Arc<Self>, name: &str) -> ClazzResult<bool> {
        Ok(name == self.name || self.class_parents()?.iter().any(|n| n == name))
    }

    /// Check if this record holds the contract `name`, directly or inherited
    pub fn is_implements(self: &Arc<Self>, name: &str) -> ClazzResult<bool> {
        Ok(self
            .class_parents_grouped()?
            .interfaces
            .iter()
            .any(|n| n == name))
    }

    /// Check if this record composes the trait `name`, directly or inherited
    pub fn has_trait(self: &Arc<Self>, name: &str) -> ClazzResult<bool> {
        Ok(self
            .class_parents_grouped()?
            .traits
            .iter()
            .any(|n| n == name))
    }

    /// Look up a constant: own, then the parent chain, then contracts
    pub fn constant(self: &Arc<Self>, name: &str) -> ClazzResult<Option<Value>> {
        self.constructor()?;
        let (own, interfaces) = {
            let state = self.state.read();
            (state.constants.get(name).cloned(), state.interfaces.clone())
        };
        if own.is_some() {
            return Ok(own);
        }
        if let Some(parent) = self.parent()? {
            if let Some(value) = parent.constant(name)? {
                return Ok(Some(value));
            }
        }
        let manager = self.manager()?;
        for interface in interfaces {
            if let Some(value) = manager.get(&interface)?.constant(name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Every visible constant; nearer declarations override farther ones
    pub fn constants(self: &Arc<Self>) -> ClazzResult<ValueMap> {
        self.constructor()?;
        let manager = self.manager()?;
        let (own, interfaces) = {
            let state = self.state.read();
            (state.constants.clone(), state.interfaces.clone())
        };
        let mut constants = ValueMap::new();
        for interface in interfaces.iter().rev() {
            constants.extend(manager.get(interface)?.constants()?);
        }
        if let Some(parent) = self.parent()? {
            constants.extend(parent.constants()?);
        }
        constants.extend(own);
        Ok(constants)
    }

    /// Abstract-method table: own, inherited and contracted obligations
    pub fn abstract_methods(self: &Arc<Self>) -> ClazzResult<BTreeMap<String, Function>> {
        self.constructor()?;
        Ok(self.state.read().abstract_methods.clone())
    }

    /// Final flag as authored
    pub fn is_final(&self) -> bool {
        self.definition().is_final()
    }

    /// Directly implemented contracts
    pub fn interfaces(self: &Arc<Self>) -> ClazzResult<Vec<String>> {
        self.constructor()?;
        Ok(self.state.read().interfaces.clone())
    }

    /// Directly composed traits
    pub fn traits(self: &Arc<Self>) -> ClazzResult<Vec<String>> {
        self.constructor()?;
        Ok(self.state.read().traits.clone())
    }

    /// Record required under `alias`
    pub fn requirement(self: &Arc<Self>, alias: &str) -> ClazzResult<ClassRef> {
        self.constructor()?;
        let name = self
            .state
            .read()
            .requires
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, name)| name.clone())
            .ok_or_else(|| ClazzError::NotExistentClass {
                name: alias.to_string(),
            })?;
        self.manager()?.get(&name)
    }

    /// Ordinary methods, optionally including inherited ones
    pub fn methods(self: &Arc<Self>, inherited: bool) -> ClazzResult<ValueMap> {
        self.view(inherited, ClassDefinition::methods)
    }

    /// Ordinary data members, optionally including inherited ones
    pub fn non_methods(self: &Arc<Self>, inherited: bool) -> ClazzResult<ValueMap> {
        self.view(inherited, ClassDefinition::non_methods)
    }

    /// Meta attributes, optionally including inherited ones
    pub fn meta_data(self: &Arc<Self>, inherited: bool) -> ClazzResult<ValueMap> {
        self.view(inherited, ClassDefinition::meta_data)
    }

    // Root-first so every level overrides its ancestors.
    fn view(
        self: &Arc<Self>,
        inherited: bool,
        select: fn(&ClassDefinition) -> ValueMap,
    ) -> ClazzResult<ValueMap> {
        let mut values = ValueMap::new();
        if inherited {
            if let Some(parent) = self.parent()? {
                values = parent.view(true, select)?;
            }
        }
        values.extend(select(&self.definition()));
        Ok(values)
    }

    /// Serializable description of this record
    pub fn summary(self: &Arc<Self>) -> ClazzResult<ClassSummary> {
        ClassSummary::of(self)
    }

    // Static members

    /// Read a static member from the nearest declaring record
    pub fn static_property(self: &Arc<Self>, name: &str) -> ClazzResult<Value> {
        self.kind.require(Capability::Static, "static_property")?;
        let owner = self.static_owner(name)?;
        owner
            .statics
            .get(name)
            .ok_or_else(|| self.missing_static(name))
    }

    /// Write a static member on the nearest declaring record
    pub fn set_static_property(
        self: &Arc<Self>,
        name: &str,
        value: impl Into<Value>,
    ) -> ClazzResult<()> {
        self.kind.require(Capability::Static, "set_static_property")?;
        let owner = self.static_owner(name)?;
        if owner.statics.set(name, value.into()) {
            Ok(())
        } else {
            Err(self.missing_static(name))
        }
    }

    /// Invoke a callable static member against this class
    pub fn call_static(self: &Arc<Self>, name: &str, args: &[Value]) -> ClazzResult<Value> {
        self.kind.require(Capability::Static, "call_static")?;
        let (owner, function) = self.find_static_function(name)?;
        let receiver = Receiver::Static(self.clone());
        let ctx = CallContext::new(&receiver, &owner, name);
        function.invoke(&ctx, args)
    }

    /// Locate a callable static member and the record declaring it
    pub fn find_static_function(self: &Arc<Self>, name: &str) -> ClazzResult<(ClassRef, Function)> {
        let not_found = || ClazzError::NotExistentMethod {
            class: self.name.clone(),
            method: name.to_string(),
        };
        let owner = self.static_owner(name).map_err(|_| not_found())?;
        match owner.statics.get(name) {
            Some(Value::Function(function)) => Ok((owner, function)),
            _ => Err(not_found()),
        }
    }

    /// Names of every visible static member
    pub fn static_names(self: &Arc<Self>) -> ClazzResult<Vec<String>> {
        Ok(self.static_members()?.into_keys().collect())
    }

    /// Own and inherited static members, nearer declarations winning
    pub fn static_members(self: &Arc<Self>) -> ClazzResult<ValueMap> {
        self.constructor()?;
        let mut members = match self.parent()? {
            Some(parent) => parent.static_members()?,
            None => ValueMap::new(),
        };
        members.extend(self.statics.snapshot());
        Ok(members)
    }

    fn static_owner(self: &Arc<Self>, name: &str) -> ClazzResult<ClassRef> {
        self.constructor()?;
        let mut current = Some(self.clone());
        while let Some(record) = current {
            if record.statics.contains(name) {
                return Ok(record);
            }
            current = record.parent()?;
        }
        Err(self.missing_static(name))
    }

    fn missing_static(&self, name: &str) -> ClazzError {
        ClazzError::NotExistentProperty {
            class: self.name.clone(),
            property: name.to_string(),
        }
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}

fn extend_unique(names: &mut Vec<String>, more: Vec<String>) {
    for name in more {
        push_unique(names, name);
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassType")
            .field("name", &self.name)
            .field("kind", &self.kind.name())
            .field("synthesized", &self.is_synthesized())
            .field("instance_created", &self.was_instance_created())
            .finish()
    }
}
