//! Synthesized constructor shapes
//!
//! A [`Constructor`] is the instantiable shape of a class record: its method
//! table (each method remembers the record that declared it), the default
//! data copied into every instance, the constructor body, and three identity
//! fields (class name, kind tag, back-reference to the record).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::class_type::{ClassRef, ClassType};
use crate::error::{ClazzError, ClazzResult};
use crate::function::Function;
use crate::value::{Value, ValueMap};

/// Meta key of the constructor body; also the method name reported while the
/// body runs.
pub const CONSTRUCTOR_KEY: &str = "$_constructor";

/// A method in a shape, tagged with its declaring record
#[derive(Clone)]
pub struct Member {
    function: Function,
    owner: Weak<ClassType>,
    owner_name: String,
}

impl Member {
    fn new(function: Function, owner: &ClassRef) -> Self {
        Self {
            function,
            owner: Arc::downgrade(owner),
            owner_name: owner.name().to_string(),
        }
    }

    /// The callable
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Name of the declaring record
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// The declaring record
    pub fn owner(&self) -> ClazzResult<ClassRef> {
        self.owner.upgrade().ok_or_else(|| ClazzError::Detached {
            class: self.owner_name.clone(),
        })
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} from {}", self.function, self.owner_name)
    }
}

/// Instantiable shape of a class record
#[derive(Default)]
pub struct Constructor {
    class_name: String,
    kind: String,
    record: Weak<ClassType>,
    methods: BTreeMap<String, Member>,
    defaults: ValueMap,
    body: Option<Member>,
}

impl Constructor {
    /// Empty shell, not yet stamped with an identity
    pub(crate) fn shell() -> Self {
        Self::default()
    }

    /// Splice in the parent's members and constructor body
    pub(crate) fn inherit(&mut self, parent: &Constructor) {
        for (name, member) in &parent.methods {
            self.methods.insert(name.clone(), member.clone());
        }
        for (name, value) in &parent.defaults {
            self.defaults.insert(name.clone(), value.clone());
        }
        if parent.body.is_some() {
            self.body = parent.body.clone();
        }
    }

    /// Attach ordinary members, overriding same-named ones.
    ///
    /// With `signatures_only`, functions are stored as abstract placeholders.
    pub(crate) fn attach(&mut self, members: &ValueMap, owner: &ClassRef, signatures_only: bool) {
        for (name, value) in members {
            match value {
                Value::Function(function) => {
                    let function = if signatures_only {
                        function.signature()
                    } else {
                        function.clone()
                    };
                    self.defaults.remove(name);
                    self.methods.insert(name.clone(), Member::new(function, owner));
                }
                other => {
                    self.methods.remove(name);
                    self.defaults.insert(name.clone(), other.clone());
                }
            }
        }
    }

    /// Install the constructor body
    pub(crate) fn set_body(&mut self, body: Function, owner: &ClassRef) {
        self.body = Some(Member::new(body, owner));
    }

    /// Stamp the identity fields
    pub(crate) fn stamp(&mut self, record: &ClassRef) {
        self.class_name = record.name().to_string();
        self.kind = record.kind().name().to_string();
        self.record = Arc::downgrade(record);
    }

    /// Owning class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Class kind tag
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Back-reference to the class record
    pub fn record(&self) -> Option<ClassRef> {
        self.record.upgrade()
    }

    /// Look up a method
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.methods.get(name)
    }

    /// All methods, ordered by name
    pub fn methods(&self) -> impl Iterator<Item = (&String, &Member)> {
        self.methods.iter()
    }

    /// Method names, ordered
    pub fn method_names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    /// Check if a concrete (non-placeholder) method exists
    pub fn has_concrete_method(&self, name: &str) -> bool {
        self.methods
            .get(name)
            .is_some_and(|member| !member.function.is_abstract())
    }

    /// Default data copied into each instance
    pub fn defaults(&self) -> &ValueMap {
        &self.defaults
    }

    /// Constructor body, own or inherited
    pub fn body(&self) -> Option<&Member> {
        self.body.as_ref()
    }

    /// Methods and data as one member map (used for trait composition)
    pub(crate) fn member_values(&self) -> ValueMap {
        let mut members = self.defaults.clone();
        for (name, member) in &self.methods {
            members.insert(name.clone(), Value::Function(member.function.clone()));
        }
        members
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("class_name", &self.class_name)
            .field("kind", &self.kind)
            .field("methods", &self.methods)
            .field("defaults", &self.defaults)
            .field("body", &self.body)
            .finish()
    }
}
