//! Reflection summaries
//!
//! [`ClassSummary`] is a serializable snapshot of a synthesized record, used
//! by tooling to describe classes without walking the record API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::class_type::{ClassParents, ClassRef};
use crate::error::ClazzResult;
use crate::kind::Capability;
use crate::value::ValueMap;

/// One method of a synthesized shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSummary {
    /// Method name
    pub name: String,
    /// Parameter count
    pub arity: usize,
    /// Record that declared it
    pub owner: String,
    /// Signature placeholder without a body
    pub is_abstract: bool,
}

/// Snapshot of a class record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    /// Class name
    pub name: String,
    /// Kind tag
    pub kind: String,
    /// Parent class
    pub parent: Option<String>,
    /// Final flag
    pub is_final: bool,
    /// Whether the kind can produce instances
    pub instantiable: bool,
    /// Whether an instance of this record or a descendant exists
    pub instance_created: bool,
    /// Ancestors by relation
    pub ancestors: ClassParents,
    /// Visible constants
    pub constants: ValueMap,
    /// Visible static members
    pub statics: ValueMap,
    /// Abstract-method table (`name → arity`)
    pub abstract_methods: BTreeMap<String, usize>,
    /// Methods of the synthesized shape
    pub methods: Vec<MethodSummary>,
    /// Default instance data
    pub fields: ValueMap,
    /// Records extending, implementing or composing this one
    pub children: Vec<String>,
}

impl ClassSummary {
    /// Summarize a record, synthesizing it if needed
    pub fn of(record: &ClassRef) -> ClazzResult<Self> {
        let shape = record.constructor()?;
        let statics = if record.kind().supports(Capability::Static) {
            record.static_members()?
        } else {
            ValueMap::new()
        };

        Ok(Self {
            name: record.name().to_string(),
            kind: record.kind().name().to_string(),
            parent: record.parent()?.map(|p| p.name().to_string()),
            is_final: record.is_final(),
            instantiable: record.kind().is_instantiable(),
            instance_created: record.was_instance_created(),
            ancestors: record.class_parents_grouped()?,
            constants: record.constants()?,
            statics,
            abstract_methods: record
                .abstract_methods()?
                .into_iter()
                .map(|(name, function)| (name, function.arity()))
                .collect(),
            methods: shape
                .methods()
                .map(|(name, member)| MethodSummary {
                    name: name.clone(),
                    arity: member.function().arity(),
                    owner: member.owner_name().to_string(),
                    is_abstract: member.function().is_abstract(),
                })
                .collect(),
            fields: shape.defaults().clone(),
            children: record.children(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;
    use crate::manager::ClassManager;
    use crate::value::Value;

    #[test]
    fn test_summary_of_derived_class() {
        let manager = ClassManager::new();
        manager
            .add_class(
                "Animal",
                crate::definition! {
                    "$_constants" => Value::map([("LEGS", Value::from(4))]),
                    "$_static" => Value::map([("count", Value::from(0))]),
                    "name" => "animal",
                    "speak" => Function::returning(0, Value::from("...")),
                },
            )
            .unwrap();
        let dog = manager
            .add_class(
                "Dog",
                crate::definition! {
                    "$_extends" => "Animal",
                    "speak" => Function::returning(0, Value::from("woof")),
                    "fetch" => Function::returning(1, Value::Null),
                },
            )
            .unwrap();

        let summary = dog.summary().unwrap();
        assert_eq!(summary.kind, "Class");
        assert_eq!(summary.parent.as_deref(), Some("Animal"));
        assert_eq!(summary.ancestors.parents, vec!["Animal"]);
        assert_eq!(summary.constants.get("LEGS"), Some(&Value::from(4)));
        assert_eq!(summary.statics.get("count"), Some(&Value::from(0)));
        assert_eq!(summary.fields.get("name"), Some(&Value::from("animal")));

        let owners: Vec<(&str, &str)> = summary
            .methods
            .iter()
            .map(|m| (m.name.as_str(), m.owner.as_str()))
            .collect();
        assert_eq!(owners, vec![("fetch", "Dog"), ("speak", "Dog")]);

        let animal = manager.get("Animal").unwrap().summary().unwrap();
        assert_eq!(animal.children, vec!["Dog"]);
    }

    #[test]
    fn test_summary_serializes() {
        let manager = ClassManager::new();
        let greets = manager
            .add_interface(
                "Greets",
                crate::definition! { "hello" => Function::abstract_method(1) },
            )
            .unwrap();
        let json = serde_json::to_value(greets.summary().unwrap()).unwrap();
        assert_eq!(json["kind"], "Interface");
        assert_eq!(json["instantiable"], false);
        assert_eq!(json["abstract_methods"]["hello"], 1);
        assert_eq!(json["methods"][0]["is_abstract"], true);
    }
}
