//! Class kind descriptors
//!
//! A [`ClassKind`] describes what records of one kind may do: which
//! capabilities they have, which kinds they may extend, and which meta
//! attributes they recognize. Meta attributes are dispatched through an
//! explicit table of [`MetaOption`]s (key → validator/applier pair), so an
//! extension adds a recognized option by appending to the table before the
//! kind is sealed in a [`KindRegistry`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::class_type::ClassRef;
use crate::definition::{ClassDefinition, ResolvedDefinition};
use crate::error::{ClazzError, ClazzResult};
use crate::manager::ClassManager;
use crate::value::{Value, ValueMap};

/// Something a kind may or may not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Records can produce instances
    Instantiate,
    /// `$_constructor` body
    Constructor,
    /// `$_final`
    Final,
    /// `$_static` members
    Static,
    /// `$_abstract` method declarations
    Abstract,
    /// `$_implements` contracts
    Interfaces,
    /// `$_traits` mixins
    Traits,
}

impl Capability {
    /// Builder-facing name
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Instantiate => "instantiate",
            Capability::Constructor => "constructor",
            Capability::Final => "final",
            Capability::Static => "static",
            Capability::Abstract => "abstract",
            Capability::Interfaces => "interfaces",
            Capability::Traits => "traits",
        }
    }
}

/// What ordinary (non-meta) members a kind accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    /// Any methods and data
    Members,
    /// Methods only, kept as signature placeholders
    SignaturesOnly,
}

/// Context handed to option validators and appliers
pub struct OptionContext<'a> {
    /// Record being processed
    pub record: &'a ClassRef,
    /// Owning manager
    pub manager: &'a ClassManager,
    /// Full (scaffold-merged) definition being processed
    pub definition: &'a ClassDefinition,
    /// Key of the option being handled
    pub option: &'static str,
}

impl OptionContext<'_> {
    /// Name of the record being processed
    pub fn class_name(&self) -> &str {
        self.record.name()
    }

    /// Build an `InvalidClassOption` error for the current option
    pub fn invalid(&self, reason: impl Into<String>) -> ClazzError {
        ClazzError::InvalidClassOption {
            option: self.option.to_string(),
            class: self.class_name().to_string(),
            reason: reason.into(),
        }
    }
}

/// Validates a meta attribute value without side effects on the record
pub type ValidateFn = fn(&OptionContext<'_>, &Value) -> ClazzResult<()>;

/// Applies a validated meta attribute value to the staged resolution
pub type ApplyFn = fn(&OptionContext<'_>, &Value, &mut ResolvedDefinition) -> ClazzResult<()>;

/// Lists class names a meta attribute value refers to
pub type RelatedFn = fn(&Value) -> Vec<String>;

/// One recognized meta attribute
#[derive(Clone)]
pub struct MetaOption {
    key: &'static str,
    default: Option<fn() -> Value>,
    validate: ValidateFn,
    apply: ApplyFn,
    related: Option<RelatedFn>,
}

impl MetaOption {
    /// Create an option with a validator and an applier
    pub fn new(key: &'static str, validate: ValidateFn, apply: ApplyFn) -> Self {
        Self {
            key,
            default: None,
            validate,
            apply,
            related: None,
        }
    }

    /// Option that rejects any non-null value
    pub fn forbidden(key: &'static str) -> Self {
        Self::new(key, reject_non_null, apply_nothing)
    }

    /// Value placed in the base definition of every record of the kind
    pub fn with_default(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Class names referenced by the value, loaded before processing
    pub fn with_related(mut self, related: RelatedFn) -> Self {
        self.related = Some(related);
        self
    }

    /// Meta attribute key
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Base-definition value, if any
    pub fn default_value(&self) -> Option<Value> {
        self.default.map(|default| default())
    }

    /// Run the validator
    pub fn validate(&self, ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
        (self.validate)(ctx, value)
    }

    /// Run the applier
    pub fn apply(
        &self,
        ctx: &OptionContext<'_>,
        value: &Value,
        resolved: &mut ResolvedDefinition,
    ) -> ClazzResult<()> {
        (self.apply)(ctx, value, resolved)
    }

    /// Referenced class names
    pub fn related(&self, value: &Value) -> Vec<String> {
        self.related.map(|related| related(value)).unwrap_or_default()
    }
}

impl fmt::Debug for MetaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaOption").field("key", &self.key).finish()
    }
}

fn reject_non_null(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    if value.is_null() {
        Ok(())
    } else {
        Err(ctx.invalid(format!(
            "not supported by {}",
            ctx.record.kind().name()
        )))
    }
}

fn apply_nothing(
    _ctx: &OptionContext<'_>,
    _value: &Value,
    _resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    Ok(())
}

/// Descriptor of one class kind
#[derive(Debug, Clone)]
pub struct ClassKind {
    name: String,
    parent_kinds: Vec<String>,
    capabilities: FxHashSet<Capability>,
    options: Vec<MetaOption>,
    body_rule: BodyRule,
    carries_abstract: bool,
}

impl ClassKind {
    /// Create a kind with no capabilities and no options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_kinds: Vec::new(),
            capabilities: FxHashSet::default(),
            options: Vec::new(),
            body_rule: BodyRule::Members,
            carries_abstract: false,
        }
    }

    /// Allow extending records of `kind`
    pub fn with_parent_kind(mut self, kind: impl Into<String>) -> Self {
        self.parent_kinds.push(kind.into());
        self
    }

    /// Grant a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Append a meta option
    pub fn with_option(mut self, option: MetaOption) -> Self {
        self.add_option(option);
        self
    }

    /// Set the body rule
    pub fn with_body_rule(mut self, rule: BodyRule) -> Self {
        self.body_rule = rule;
        self
    }

    /// Records of this kind may leave abstract methods unimplemented
    pub fn carrying_abstract(mut self) -> Self {
        self.carries_abstract = true;
        self
    }

    /// Grant a capability (extension use)
    pub fn add_capability(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    /// Append or replace a meta option (extension use)
    pub fn add_option(&mut self, option: MetaOption) {
        match self.options.iter_mut().find(|o| o.key == option.key) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
    }

    /// Kind name (the type tag)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check a capability
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Check if records of this kind can produce instances
    pub fn is_instantiable(&self) -> bool {
        self.supports(Capability::Instantiate)
    }

    /// Check if this kind may extend `parent_kind`
    pub fn can_extend(&self, parent_kind: &str) -> bool {
        self.parent_kinds.iter().any(|k| k == parent_kind)
    }

    /// Allowed parent kinds
    pub fn parent_kinds(&self) -> &[String] {
        &self.parent_kinds
    }

    /// Body rule
    pub fn body_rule(&self) -> BodyRule {
        self.body_rule
    }

    /// Check if abstract methods may stay unimplemented
    pub fn carries_abstract(&self) -> bool {
        self.carries_abstract
    }

    /// Dispatch table, in application order
    pub fn options(&self) -> &[MetaOption] {
        &self.options
    }

    /// Look up the handler of a meta attribute
    pub fn option(&self, key: &str) -> Option<&MetaOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Base definition data every record of this kind starts from
    pub fn base_definition(&self) -> ValueMap {
        self.options
            .iter()
            .filter_map(|o| o.default_value().map(|v| (o.key.to_string(), v)))
            .collect()
    }

    /// Fail with `UnsupportedOperation` unless the capability is granted
    pub fn require(&self, capability: Capability, operation: &str) -> ClazzResult<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(ClazzError::unsupported(&self.name, operation))
        }
    }
}

type KindExtension = Box<dyn Fn(&mut ClassKind) + Send + Sync>;

/// Sealed table of class kinds
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: FxHashMap<String, Arc<ClassKind>>,
    order: Vec<String>,
}

static STANDARD_KINDS: Lazy<Arc<KindRegistry>> =
    Lazy::new(|| KindRegistryBuilder::standard().build());

impl KindRegistry {
    /// Start building a custom table
    pub fn builder() -> KindRegistryBuilder {
        KindRegistryBuilder::default()
    }

    /// Shared table of Class, AbstractClass, Interface and Trait
    pub fn standard() -> Arc<KindRegistry> {
        STANDARD_KINDS.clone()
    }

    /// Look up a kind
    pub fn get(&self, name: &str) -> ClazzResult<Arc<ClassKind>> {
        self.kinds
            .get(name)
            .cloned()
            .ok_or_else(|| ClazzError::UnknownKind {
                kind: name.to_string(),
            })
    }

    /// Check if a kind is registered
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Kind names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

/// Assembles kinds and their extensions, then seals them
#[derive(Default)]
pub struct KindRegistryBuilder {
    kinds: Vec<ClassKind>,
    extensions: Vec<(String, KindExtension)>,
}

impl KindRegistryBuilder {
    /// Builder preloaded with the four standard kinds and their extensions
    pub fn standard() -> Self {
        crate::kinds::register_standard(Self::default())
    }

    /// Register a kind (a kind with the same name is replaced)
    pub fn register(mut self, kind: ClassKind) -> Self {
        if let Some(existing) = self.kinds.iter_mut().find(|k| k.name == kind.name) {
            warn!(kind = %kind.name, "replacing previously registered class kind");
            *existing = kind;
        } else {
            self.kinds.push(kind);
        }
        self
    }

    /// Augment a kind when the table is built
    pub fn extend(
        mut self,
        target: impl Into<String>,
        extension: impl Fn(&mut ClassKind) + Send + Sync + 'static,
    ) -> Self {
        self.extensions.push((target.into(), Box::new(extension)));
        self
    }

    /// Apply extensions and seal the table
    pub fn build(self) -> Arc<KindRegistry> {
        let mut kinds = self.kinds;
        for (target, extension) in &self.extensions {
            match kinds.iter_mut().find(|k| &k.name == target) {
                Some(kind) => extension(kind),
                None => warn!(kind = %target, "extension targets an unregistered class kind"),
            }
        }

        let mut registry = KindRegistry::default();
        for kind in kinds {
            registry.order.push(kind.name.clone());
            registry.kinds.insert(kind.name.clone(), Arc::new(kind));
        }
        Arc::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{ABSTRACT_CLASS, CLASS, INTERFACE, TRAIT};

    #[test]
    fn test_standard_kinds_registered() {
        let registry = KindRegistry::standard();
        assert_eq!(
            registry.names(),
            &[
                CLASS.to_string(),
                ABSTRACT_CLASS.to_string(),
                INTERFACE.to_string(),
                TRAIT.to_string()
            ]
        );
        assert!(matches!(
            registry.get("Struct"),
            Err(ClazzError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_extensions_applied_before_sealing() {
        let registry = KindRegistry::standard();
        let class = registry.get(CLASS).unwrap();
        assert!(class.supports(Capability::Interfaces));
        assert!(class.supports(Capability::Traits));
        assert!(class.option("$_implements").is_some());
        assert!(class.option("$_traits").is_some());

        let abstract_class = registry.get(ABSTRACT_CLASS).unwrap();
        assert!(abstract_class.supports(Capability::Traits));

        let trait_kind = registry.get(TRAIT).unwrap();
        assert!(!trait_kind.supports(Capability::Traits));
        assert!(trait_kind.option("$_traits").is_none());
    }

    #[test]
    fn test_parent_kind_rules() {
        let registry = KindRegistry::standard();
        let class = registry.get(CLASS).unwrap();
        assert!(class.can_extend(CLASS));
        assert!(class.can_extend(ABSTRACT_CLASS));
        assert!(!class.can_extend(INTERFACE));

        let abstract_class = registry.get(ABSTRACT_CLASS).unwrap();
        assert!(abstract_class.can_extend(ABSTRACT_CLASS));
        assert!(!abstract_class.can_extend(CLASS));

        assert!(registry.get(INTERFACE).unwrap().can_extend(INTERFACE));
        assert!(registry.get(TRAIT).unwrap().can_extend(TRAIT));
    }

    #[test]
    fn test_base_definition_from_defaults() {
        let registry = KindRegistry::standard();
        let base = registry.get(CLASS).unwrap().base_definition();
        assert_eq!(base.get("$_extends"), Some(&Value::Null));
        assert_eq!(base.get("$_final"), Some(&Value::Bool(false)));

        let abstract_base = registry.get(ABSTRACT_CLASS).unwrap().base_definition();
        assert!(!abstract_base.contains_key("$_final"));
    }

    #[test]
    fn test_custom_kind_with_extension() {
        let registry = KindRegistry::builder()
            .register(
                ClassKind::new("Record")
                    .with_capability(Capability::Instantiate)
                    .with_parent_kind("Record"),
            )
            .extend("Record", |kind| kind.add_capability(Capability::Static))
            .extend("Missing", |kind| kind.add_capability(Capability::Final))
            .build();

        let record = registry.get("Record").unwrap();
        assert!(record.is_instantiable());
        assert!(record.supports(Capability::Static));
        assert!(!registry.contains("Missing"));
    }

    #[test]
    fn test_require_reports_operation() {
        let kind = ClassKind::new("Plain");
        let err = kind.require(Capability::Final, "set_final").unwrap_err();
        assert_eq!(err, ClazzError::unsupported("Plain", "set_final"));
    }
}
