//! Clazz Engine
//!
//! Runtime class composition: class records declared as plain data are
//! synthesized into instantiable types.
//! - **Registry**: [`ClassManager`] keeps records by name
//! - **Records**: [`ClassType`] runs the definition pipeline and reflection
//! - **Definitions**: [`ClassDefinition`] validates and applies `$_` meta attributes
//! - **Builder**: [`ClassBuilder`] stages edits and commits them
//! - **Kinds**: Class, AbstractClass, Interface and Trait ([`kinds`])
//!
//! # Example
//!
//! ```rust,ignore
//! use clazz_engine::{definition, ClassManager, Function, Value};
//!
//! let manager = ClassManager::new();
//! manager.add_interface("Greets", definition! { "hello" => Function::abstract_method(0) })?;
//! let person = manager.add_class(
//!     "Person",
//!     definition! {
//!         "$_implements" => Value::strings(["Greets"]),
//!         "hello" => Function::returning(0, Value::from("hi")),
//!     },
//! )?;
//! let alice = person.create_instance(&[])?;
//! assert_eq!(alice.call("hello", &[])?, Value::from("hi"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod class_type;
pub mod config;
pub mod constructor;
pub mod definition;
pub mod error;
pub mod function;
pub mod instance;
pub mod kind;
pub mod kinds;
pub mod loader;
pub mod manager;
pub mod reflect;
pub mod statics;
pub mod value;

pub use builder::ClassBuilder;
pub use class_type::{ClassParents, ClassRef, ClassType};
pub use config::{ConfigError, ManagerConfig, TraitConflictPolicy};
pub use constructor::{Constructor, Member, CONSTRUCTOR_KEY};
pub use definition::{is_meta_key, ClassDefinition, ResolvedDefinition, META_PREFIX};
pub use error::{ClazzError, ClazzResult, ErrorKind};
pub use function::{CallContext, Function, NativeFn, Receiver};
pub use instance::Instance;
pub use kind::{
    BodyRule, Capability, ClassKind, KindRegistry, KindRegistryBuilder, MetaOption, OptionContext,
};
pub use kinds::{ABSTRACT_CLASS, CLASS, INTERFACE, TRAIT};
pub use loader::{ClassLoader, NoopLoader};
pub use manager::{ClassManager, ManagerOptions};
pub use reflect::{ClassSummary, MethodSummary};
pub use statics::StaticContext;
pub use value::{Value, ValueMap};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
