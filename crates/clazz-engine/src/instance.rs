//! Instances of synthesized classes
//!
//! An instance owns a fresh copy of every data member of its class, shares
//! the class's method table through the [`Constructor`] shape, and is sealed
//! before the constructor body runs: existing fields can change, new ones
//! cannot be added.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::class_type::ClassRef;
use crate::constructor::Constructor;
use crate::error::{ClazzError, ClazzResult};
use crate::function::{CallContext, Receiver};
use crate::value::{Value, ValueMap};

struct InstanceInner {
    class: ClassRef,
    shape: Arc<Constructor>,
    fields: RwLock<ValueMap>,
    sealed: AtomicBool,
}

/// Shared handle to an instance
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    /// Allocate an instance with a copy of the shape's default data
    pub(crate) fn allocate(class: ClassRef, shape: Arc<Constructor>) -> Self {
        let fields = shape.defaults().clone();
        Self {
            inner: Arc::new(InstanceInner {
                class,
                shape,
                fields: RwLock::new(fields),
                sealed: AtomicBool::new(false),
            }),
        }
    }

    /// Forbid adding new fields
    pub(crate) fn seal(&self) {
        self.inner.sealed.store(true, Ordering::Release);
    }

    /// Check if the member set is sealed
    pub fn is_sealed(&self) -> bool {
        self.inner.sealed.load(Ordering::Acquire)
    }

    /// The class record this instance was created from
    pub fn class(&self) -> &ClassRef {
        &self.inner.class
    }

    /// Class name identity field
    pub fn class_name(&self) -> &str {
        self.inner.shape.class_name()
    }

    /// Class kind identity field
    pub fn kind(&self) -> &str {
        self.inner.shape.kind()
    }

    /// The shape this instance was built from
    pub fn shape(&self) -> &Arc<Constructor> {
        &self.inner.shape
    }

    /// Read a field, falling back to a method of the same name
    pub fn get(&self, name: &str) -> ClazzResult<Value> {
        if let Some(value) = self.inner.fields.read().get(name) {
            return Ok(value.clone());
        }
        match self.inner.shape.method(name) {
            Some(member) => Ok(Value::Function(member.function().clone())),
            None => Err(ClazzError::NotExistentProperty {
                class: self.class_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    /// Read a field if present
    pub fn field(&self, name: &str) -> Option<Value> {
        self.inner.fields.read().get(name).cloned()
    }

    /// Snapshot of all fields
    pub fn fields(&self) -> ValueMap {
        self.inner.fields.read().clone()
    }

    /// Write a field. Once sealed, only existing fields can be written.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ClazzResult<()> {
        let mut fields = self.inner.fields.write();
        if self.is_sealed() && !fields.contains_key(name) {
            return Err(ClazzError::SealedInstance {
                class: self.class_name().to_string(),
                property: name.to_string(),
            });
        }
        fields.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Check if the class provides a method
    pub fn has_method(&self, name: &str) -> bool {
        self.inner.shape.method(name).is_some()
    }

    /// Invoke a method with this instance as receiver
    pub fn call(&self, method: &str, args: &[Value]) -> ClazzResult<Value> {
        let member = self
            .inner
            .shape
            .method(method)
            .ok_or_else(|| ClazzError::NotExistentMethod {
                class: self.class_name().to_string(),
                method: method.to_string(),
            })?;
        let owner = member.owner()?;
        let receiver = Receiver::Instance(self.clone());
        let ctx = CallContext::new(&receiver, &owner, method);
        member.function().invoke(&ctx, args)
    }

    /// Check class membership by name
    pub fn is_instance_of(&self, name: &str) -> ClazzResult<bool> {
        self.inner.class.is_instance_of(name)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class_name())
            .field("fields", &*self.inner.fields.read())
            .finish()
    }
}
