//! Trait kind and the `$_traits` extension

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::TraitConflictPolicy;
use crate::constructor::CONSTRUCTOR_KEY;
use crate::definition::{ResolvedDefinition, ABSTRACT_KEY, FINAL_KEY, STATIC_KEY, TRAITS_KEY};
use crate::error::{ClazzError, ClazzResult};
use crate::kind::{ClassKind, MetaOption, OptionContext};
use crate::value::Value;

use super::common::{constants_option, extends_option, requires_option};
use super::interface::{name_list, related_names};
use super::TRAIT;

pub(super) fn kind() -> ClassKind {
    ClassKind::new(TRAIT)
        .with_parent_kind(TRAIT)
        .with_option(extends_option())
        .with_option(requires_option())
        .with_option(constants_option())
        .with_option(MetaOption::forbidden(FINAL_KEY))
        .with_option(MetaOption::forbidden(STATIC_KEY))
        .with_option(MetaOption::forbidden(ABSTRACT_KEY))
        .with_option(MetaOption::forbidden(CONSTRUCTOR_KEY))
}

/// `$_traits`: trait names whose members are copied into the record
pub fn traits_option() -> MetaOption {
    MetaOption::new(TRAITS_KEY, validate_traits, apply_traits).with_related(related_names)
}

fn validate_traits(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    for name in name_list(ctx, value)? {
        if name == ctx.class_name() {
            return Err(ClazzError::InheritanceCycle {
                class: name.to_string(),
            });
        }
        let mixin = ctx.manager.get(name)?;
        if mixin.kind().name() != TRAIT {
            return Err(ClazzError::NotATrait {
                class: ctx.class_name().to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

// Traits are merged in order. A member authored by the class itself is never
// replaced; among traits, the later one wins unless conflicts are errors.
fn apply_traits(
    ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    let own_members = ctx.definition.members();
    let own_statics = ctx.definition.statics();
    let policy = ctx.manager.config().trait_conflicts;
    let mut provided_by: BTreeMap<String, String> = BTreeMap::new();

    for name in name_list(ctx, value)? {
        let mixin = ctx.manager.get(name)?;
        let shape = mixin.constructor()?;

        for (static_name, member) in mixin.static_members()? {
            if !own_statics.contains_key(&static_name) {
                resolved.statics.insert(static_name, member);
            }
        }

        for (member, provided) in shape.member_values() {
            if own_members.contains_key(&member) {
                continue;
            }
            if let Some(first) = provided_by.get(&member) {
                let same = resolved.mixed.get(&member) == Some(&provided);
                if !same && policy == TraitConflictPolicy::Error {
                    return Err(ClazzError::TraitConflict {
                        class: ctx.class_name().to_string(),
                        member,
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
                debug!(
                    class = %ctx.class_name(),
                    member = %member,
                    replaced = %first,
                    by = %name,
                    "trait member overridden by a later trait"
                );
            }
            provided_by.insert(member.clone(), name.to_string());
            resolved.mixed.insert(member, provided);
        }

        debug!(class = %ctx.class_name(), mixin = %name, "trait composed");
        if !resolved.traits.iter().any(|t| t.name() == name) {
            resolved.traits.push(mixin);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::kind::{Capability, KindRegistryBuilder};
    use crate::manager::{ClassManager, ManagerOptions};
    use crate::value::Value;
    use crate::TRAIT;

    use super::super::class::static_option;

    fn static_traits_manager() -> ClassManager {
        let kinds = KindRegistryBuilder::standard()
            .extend(TRAIT, |kind| {
                kind.add_capability(Capability::Static);
                kind.add_option(static_option());
            })
            .build();
        ClassManager::with_options(ManagerOptions {
            kinds,
            ..ManagerOptions::default()
        })
    }

    #[test]
    fn test_trait_statics_copied_into_class() {
        let manager = static_traits_manager();
        manager
            .add_trait(
                "Counted",
                crate::definition! { "$_static" => crate::definition! { "count" => 0 } },
            )
            .unwrap();
        manager
            .add_trait(
                "Tagged",
                crate::definition! {
                    "$_extends" => "Counted",
                    "$_static" => crate::definition! { "tag" => "pet", "legs" => 2 },
                },
            )
            .unwrap();
        let dog = manager
            .add_class(
                "Dog",
                crate::definition! {
                    "$_traits" => Value::strings(["Tagged"]),
                    "$_static" => crate::definition! { "legs" => 4 },
                },
            )
            .unwrap();

        assert_eq!(dog.static_property("count").unwrap(), Value::from(0));
        assert_eq!(dog.static_property("tag").unwrap(), Value::from("pet"));
        assert_eq!(dog.static_property("legs").unwrap(), Value::from(4));

        // The copy belongs to the class; the trait keeps its own value.
        dog.set_static_property("count", 3).unwrap();
        assert_eq!(dog.static_property("count").unwrap(), Value::from(3));
        let counted = manager.get("Counted").unwrap();
        assert_eq!(counted.static_property("count").unwrap(), Value::from(0));
    }
}
