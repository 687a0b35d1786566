//! Integration tests for instances, method calls and static members

use clazz_engine::{
    definition, ClassManager, ClazzError, Function, Value, ValueMap, CLASS,
};

fn animal_and_dog(manager: &ClassManager) {
    manager
        .add_class(
            "Animal",
            definition! {
                "$_constructor" => Function::new(1, |ctx, args| {
                    let name = ctx.argument(args, 0)?.clone();
                    ctx.set("name", name)?;
                    Ok(Value::Null)
                }),
                "name" => Value::Null,
                "speak" => Function::returning(0, Value::from("...")),
            },
        )
        .unwrap();
    manager
        .add_class(
            "Dog",
            definition! {
                "$_extends" => "Animal",
                "$_constructor" => Function::new(1, |ctx, args| {
                    ctx.call_parent(args)?;
                    ctx.set("good", true)?;
                    Ok(Value::Null)
                }),
                "good" => false,
                "speak" => Function::new(0, |ctx, args| {
                    let base = ctx.call_parent(args)?;
                    Ok(Value::from(format!("woof {}", base.as_str().unwrap_or(""))))
                }),
            },
        )
        .unwrap();
}

#[test]
fn test_constructor_and_call_parent() {
    let manager = ClassManager::new();
    animal_and_dog(&manager);
    let dog = manager.get("Dog").unwrap();

    let rex = dog.create_instance(&[Value::from("Rex")]).unwrap();
    assert_eq!(rex.get("name").unwrap(), Value::from("Rex"));
    assert_eq!(rex.get("good").unwrap(), Value::from(true));
    assert_eq!(rex.call("speak", &[]).unwrap(), Value::from("woof ..."));
    assert_eq!(rex.class_name(), "Dog");
    assert_eq!(rex.kind(), CLASS);
    assert!(rex.is_instance_of("Animal").unwrap());
    assert!(!rex.is_instance_of("Cat").unwrap());
}

#[test]
fn test_missing_constructor_argument() {
    let manager = ClassManager::new();
    animal_and_dog(&manager);
    let err = manager
        .get("Animal")
        .unwrap()
        .create_instance(&[])
        .unwrap_err();
    assert!(matches!(err, ClazzError::MissedArgument { .. }));
}

#[test]
fn test_instances_are_sealed_and_independent() {
    let manager = ClassManager::new();
    let list = manager
        .add_class("List", definition! { "items" => Value::strings(["seed"]) })
        .unwrap();

    let first = list.create_instance(&[]).unwrap();
    let second = list.create_instance(&[]).unwrap();
    first.set("items", Value::strings(["changed"])).unwrap();
    assert_eq!(second.get("items").unwrap(), Value::strings(["seed"]));
    assert!(!first.ptr_eq(&second));

    assert!(first.is_sealed());
    assert_eq!(
        first.set("extra", 1).unwrap_err(),
        ClazzError::SealedInstance {
            class: "List".to_string(),
            property: "extra".to_string(),
        }
    );
    assert!(matches!(
        first.get("extra"),
        Err(ClazzError::NotExistentProperty { .. })
    ));
    assert!(matches!(
        first.call("missing", &[]),
        Err(ClazzError::NotExistentMethod { .. })
    ));
}

#[test]
fn test_abstract_template_method() {
    let manager = ClassManager::new();
    manager
        .add_abstract_class(
            "Shape",
            definition! {
                "$_abstract" => Value::map([("area", Value::from(Function::abstract_method(0)))]),
                "describe" => Function::new(0, |ctx, _args| {
                    let area = ctx.call("area", &[])?;
                    Ok(Value::from(format!("area={}", area.as_f64().unwrap_or(0.0))))
                }),
            },
        )
        .unwrap();
    let square = manager
        .add_class(
            "Square",
            definition! {
                "$_extends" => "Shape",
                "side" => 3,
                "area" => Function::new(0, |ctx, _args| {
                    let side = ctx.get("side")?.as_f64().unwrap_or(0.0);
                    Ok(Value::from(side * side))
                }),
                "parentArea" => Function::new(0, |ctx, _args| ctx.call("area_of_parent", &[])),
                "area_of_parent" => Function::new(0, |ctx, args| ctx.call_parent(args)),
            },
        )
        .unwrap();

    let shape = manager.get("Shape").unwrap();
    assert!(matches!(
        shape.create_instance(&[]),
        Err(ClazzError::NotInstantiable { .. })
    ));

    let sq = square.create_instance(&[]).unwrap();
    assert_eq!(sq.call("describe", &[]).unwrap(), Value::from("area=9"));
    // The parent has no `area_of_parent` at all.
    assert!(matches!(
        sq.call("parentArea", &[]),
        Err(ClazzError::NotExistentMethod { .. })
    ));
}

#[test]
fn test_call_parent_reaches_abstract_placeholder() {
    let manager = ClassManager::new();
    manager
        .add_abstract_class(
            "Shape",
            definition! {
                "$_abstract" => Value::map([("area", Value::from(Function::abstract_method(0)))]),
            },
        )
        .unwrap();
    let square = manager
        .add_class(
            "Square",
            definition! {
                "$_extends" => "Shape",
                "area" => Function::new(0, |ctx, args| ctx.call_parent(args)),
            },
        )
        .unwrap();

    let sq = square.create_instance(&[]).unwrap();
    assert_eq!(
        sq.call("area", &[]).unwrap_err(),
        ClazzError::NotImplementedMethod {
            class: "Square".to_string(),
            method: "area".to_string(),
        }
    );
}

#[test]
fn test_static_members_are_live() {
    let manager = ClassManager::new();
    let counter = manager
        .add_class(
            "Counter",
            definition! {
                "$_static" => Value::map([
                    ("count", Value::from(0)),
                    ("increment", Value::from(Function::new(0, |ctx, _args| {
                        let next = ctx.get("count")?.as_f64().unwrap_or(0.0) + 1.0;
                        ctx.set("count", next)?;
                        ctx.get("count")
                    }))),
                ]),
            },
        )
        .unwrap();

    assert_eq!(counter.call_static("increment", &[]).unwrap(), Value::from(1));
    assert_eq!(counter.static_property("count").unwrap(), Value::from(1));

    counter.set_static_property("count", 10).unwrap();
    assert_eq!(counter.call_static("increment", &[]).unwrap(), Value::from(11));

    assert!(matches!(
        counter.static_property("missing"),
        Err(ClazzError::NotExistentProperty { .. })
    ));
    assert!(matches!(
        counter.call_static("count", &[]),
        Err(ClazzError::NotExistentMethod { .. })
    ));
}

#[test]
fn test_statics_resolve_to_declaring_class() {
    let manager = ClassManager::new();
    let base = manager
        .add_class(
            "Base",
            definition! { "$_static" => Value::map([("instances", Value::from(0))]) },
        )
        .unwrap();
    let derived = manager
        .add_class(
            "Derived",
            definition! {
                "$_extends" => "Base",
                "$_static" => Value::map([("label", Value::from("derived"))]),
            },
        )
        .unwrap();

    derived.set_static_property("instances", 5).unwrap();
    assert_eq!(base.static_property("instances").unwrap(), Value::from(5));
    assert_eq!(derived.static_names().unwrap(), vec!["instances", "label"]);
    assert!(base.static_property("label").is_err());
}

#[test]
fn test_static_call_parent() {
    let manager = ClassManager::new();
    manager
        .add_class(
            "Base",
            definition! {
                "$_static" => Value::map([
                    ("create", Value::from(Function::returning(0, Value::from("base")))),
                ]),
            },
        )
        .unwrap();
    let derived = manager
        .add_class(
            "Derived",
            definition! {
                "$_extends" => "Base",
                "$_static" => Value::map([
                    ("create", Value::from(Function::new(0, |ctx, args| {
                        let base = ctx.call_parent(args)?;
                        Ok(Value::from(format!("derived+{}", base.as_str().unwrap_or(""))))
                    }))),
                ]),
            },
        )
        .unwrap();

    assert_eq!(
        derived.call_static("create", &[]).unwrap(),
        Value::from("derived+base")
    );
}

#[test]
fn test_statics_unsupported_on_interfaces() {
    let manager = ClassManager::new();
    let contract = manager.add_interface("Contract", ValueMap::new()).unwrap();
    assert!(matches!(
        contract.static_property("x"),
        Err(ClazzError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_constants_resolution() {
    let manager = ClassManager::new();
    manager
        .add_interface(
            "Versioned",
            definition! { "$_constants" => Value::map([("VERSION", Value::from(1)), ("API", Value::from("v1"))]) },
        )
        .unwrap();
    manager
        .add_class(
            "Base",
            definition! { "$_constants" => Value::map([("VERSION", Value::from(2))]) },
        )
        .unwrap();
    let child = manager
        .add_class(
            "Child",
            definition! {
                "$_extends" => "Base",
                "$_implements" => Value::strings(["Versioned"]),
                "$_constants" => Value::map([("OWN", Value::from(true))]),
                "version" => Function::new(0, |ctx, _args| ctx.constant("VERSION")),
            },
        )
        .unwrap();

    assert_eq!(child.constant("OWN").unwrap(), Some(Value::from(true)));
    assert_eq!(child.constant("VERSION").unwrap(), Some(Value::from(2)));
    assert_eq!(child.constant("API").unwrap(), Some(Value::from("v1")));
    assert_eq!(child.constant("NOPE").unwrap(), None);

    let all = child.constants().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["VERSION"], Value::from(2));

    let instance = child.create_instance(&[]).unwrap();
    assert_eq!(instance.call("version", &[]).unwrap(), Value::from(2));
}
