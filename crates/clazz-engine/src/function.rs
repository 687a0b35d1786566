//! Callable members
//!
//! A [`Function`] is either a native body or an abstract signature
//! placeholder that only carries an arity. Bodies run with a
//! [`CallContext`] describing the receiver (`this` instance or the static
//! context of a class) and the class that declared the running member, which
//! is what makes [`CallContext::call_parent`] work.

use std::fmt;
use std::sync::Arc;

use crate::class_type::ClassRef;
use crate::constructor::CONSTRUCTOR_KEY;
use crate::error::{ClazzError, ClazzResult};
use crate::instance::Instance;
use crate::value::Value;

/// Native function body
pub type NativeFn = Arc<dyn Fn(&CallContext<'_>, &[Value]) -> ClazzResult<Value> + Send + Sync>;

#[derive(Clone)]
enum FunctionBody {
    Native(NativeFn),
    Abstract,
}

/// A callable member or signature placeholder
#[derive(Clone)]
pub struct Function {
    arity: usize,
    body: FunctionBody,
}

impl Function {
    /// Create a function from a native body
    pub fn new(
        arity: usize,
        body: impl Fn(&CallContext<'_>, &[Value]) -> ClazzResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity,
            body: FunctionBody::Native(Arc::new(body)),
        }
    }

    /// Create an abstract signature placeholder
    pub fn abstract_method(arity: usize) -> Self {
        Self {
            arity,
            body: FunctionBody::Abstract,
        }
    }

    /// Create a function that always returns `value`
    pub fn returning(arity: usize, value: Value) -> Self {
        Self::new(arity, move |_ctx, _args| Ok(value.clone()))
    }

    /// Declared parameter count
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Check if this is a signature placeholder
    pub fn is_abstract(&self) -> bool {
        matches!(self.body, FunctionBody::Abstract)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Function) -> bool {
        match (&self.body, &other.body) {
            (FunctionBody::Native(a), FunctionBody::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Placeholder with the same arity
    pub fn signature(&self) -> Function {
        Function::abstract_method(self.arity)
    }

    pub(crate) fn invoke(&self, ctx: &CallContext<'_>, args: &[Value]) -> ClazzResult<Value> {
        match &self.body {
            FunctionBody::Native(body) => body(ctx, args),
            FunctionBody::Abstract => Err(ClazzError::NotImplementedMethod {
                class: ctx.class().name().to_string(),
                method: ctx.method().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.body {
            FunctionBody::Native(_) => write!(f, "[function/{}]", self.arity),
            FunctionBody::Abstract => write!(f, "[abstract/{}]", self.arity),
        }
    }
}

/// The receiver of a call
#[derive(Clone, Debug)]
pub enum Receiver {
    /// Instance method or constructor
    Instance(Instance),
    /// Static member of a class
    Static(ClassRef),
}

impl Receiver {
    /// Class of the receiver
    pub fn class(&self) -> ClassRef {
        match self {
            Receiver::Instance(instance) => instance.class().clone(),
            Receiver::Static(class) => class.clone(),
        }
    }
}

/// Execution context handed to every native body
pub struct CallContext<'a> {
    receiver: &'a Receiver,
    owner: &'a ClassRef,
    method: &'a str,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(receiver: &'a Receiver, owner: &'a ClassRef, method: &'a str) -> Self {
        Self {
            receiver,
            owner,
            method,
        }
    }

    /// The receiver
    pub fn receiver(&self) -> &Receiver {
        self.receiver
    }

    /// `this`, when called on an instance
    pub fn this(&self) -> Option<&Instance> {
        match self.receiver {
            Receiver::Instance(instance) => Some(instance),
            Receiver::Static(_) => None,
        }
    }

    /// Class of the receiver
    pub fn class(&self) -> ClassRef {
        self.receiver.class()
    }

    /// Class that declared the running member
    pub fn owner(&self) -> &ClassRef {
        self.owner
    }

    /// Name of the running member
    pub fn method(&self) -> &str {
        self.method
    }

    /// Read a field (instance receiver) or static member (static receiver)
    pub fn get(&self, name: &str) -> ClazzResult<Value> {
        match self.receiver {
            Receiver::Instance(instance) => instance.get(name),
            Receiver::Static(class) => class.static_property(name),
        }
    }

    /// Write a field (instance receiver) or static member (static receiver)
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ClazzResult<()> {
        match self.receiver {
            Receiver::Instance(instance) => instance.set(name, value),
            Receiver::Static(class) => class.set_static_property(name, value),
        }
    }

    /// Call another member on the same receiver
    pub fn call(&self, method: &str, args: &[Value]) -> ClazzResult<Value> {
        match self.receiver {
            Receiver::Instance(instance) => instance.call(method, args),
            Receiver::Static(class) => class.call_static(method, args),
        }
    }

    /// Call the parent class's implementation of the running member
    pub fn call_parent(&self, args: &[Value]) -> ClazzResult<Value> {
        let parent = self
            .owner
            .parent()?
            .ok_or_else(|| ClazzError::NotExistentMethod {
                class: self.owner.name().to_string(),
                method: format!("parent::{}", self.method),
            })?;

        match self.receiver {
            Receiver::Instance(_) => {
                let constructor = parent.constructor()?;
                let member = if self.method == CONSTRUCTOR_KEY {
                    constructor.body()
                } else {
                    constructor.method(self.method)
                };
                let member = member.ok_or_else(|| ClazzError::NotExistentMethod {
                    class: parent.name().to_string(),
                    method: self.method.to_string(),
                })?;
                let owner = member.owner()?;
                let ctx = CallContext::new(self.receiver, &owner, self.method);
                member.function().invoke(&ctx, args)
            }
            Receiver::Static(_) => {
                let (owner, function) = parent.find_static_function(self.method)?;
                let ctx = CallContext::new(self.receiver, &owner, self.method);
                function.invoke(&ctx, args)
            }
        }
    }

    /// Look up a class constant
    pub fn constant(&self, name: &str) -> ClazzResult<Value> {
        let class = self.class();
        class
            .constant(name)?
            .ok_or_else(|| ClazzError::NotExistentProperty {
                class: class.name().to_string(),
                property: name.to_string(),
            })
    }

    /// Positional argument, or `MissedArgument`
    pub fn argument<'v>(&self, args: &'v [Value], index: usize) -> ClazzResult<&'v Value> {
        args.get(index).ok_or_else(|| ClazzError::MissedArgument {
            argument: format!("{}#{}", self.method, index),
        })
    }
}
