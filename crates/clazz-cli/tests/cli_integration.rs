//! Integration tests for the commands behind `clazz check`, `clazz describe`
//! and `clazz new`.

use std::path::{Path, PathBuf};

use clazz_cli::commands::{check, describe, new};
use clazz_cli::manifest::ClassManifest;
use clazz_engine::{ManagerConfig, TraitConflictPolicy, Value};
use tempfile::TempDir;

const SHAPES: &str = r#"{
    "classes": [
        { "name": "HasArea", "kind": "Interface", "definition": {
            "$_constants": { "UNITS": "cm" },
            "area": { "$abstract": 0 }
        } },
        { "name": "Named", "kind": "Trait", "definition": {
            "label": "shape",
            "getLabel": { "$fn": { "get": "label" } }
        } },
        { "name": "Shape", "kind": "AbstractClass", "definition": {
            "$_implements": ["HasArea"],
            "$_traits": ["Named"],
            "$_static": { "count": 0 }
        } },
        { "name": "Square", "definition": {
            "$_extends": "Shape",
            "side": 0,
            "$_constructor": { "$fn": { "arity": 1, "set": "side" } },
            "area": { "$fn": { "returns": 4 } }
        } },
        { "name": "Broken", "definition": { "$_extends": "Shape" } }
    ]
}"#;

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("classes.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn load(path: &Path) -> ClassManifest {
    ClassManifest::from_file(path).unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// check
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_check_reports_each_class() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SHAPES);

    let outcomes = check::run(&load(&path), ManagerConfig::default());
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["HasArea", "Named", "Shape", "Square", "Broken"]);

    for outcome in &outcomes[..4] {
        assert!(outcome.passed(), "{} failed: {:?}", outcome.name, outcome.error);
    }
    let broken = &outcomes[4];
    assert!(!broken.passed());
    assert!(broken.error.as_deref().unwrap_or("").contains("area"));
}

#[test]
fn test_check_forward_references() {
    let manifest = ClassManifest::parse(
        r#"{ "classes": [
            { "name": "Child", "definition": { "$_extends": "Parent" } },
            { "name": "Parent" }
        ] }"#,
    )
    .unwrap();
    let outcomes = check::run(&manifest, ManagerConfig::default());
    assert!(outcomes.iter().all(|o| o.passed()));
}

#[test]
fn test_check_registration_errors() {
    let manifest =
        ClassManifest::parse(r#"{ "classes": [ { "name": "Odd", "kind": "Enum" } ] }"#).unwrap();
    let outcomes = check::run(&manifest, ManagerConfig::default());
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].passed());
}

#[test]
fn test_check_honors_config() {
    let manifest = ClassManifest::parse(
        r#"{ "classes": [
            { "name": "A", "kind": "Trait", "definition": { "m": { "$fn": { "returns": "a" } } } },
            { "name": "B", "kind": "Trait", "definition": { "m": { "$fn": { "returns": "b" } } } },
            { "name": "C", "definition": { "$_traits": ["A", "B"] } }
        ] }"#,
    )
    .unwrap();

    let lenient = check::run(&manifest, ManagerConfig::default());
    assert!(lenient.iter().all(|o| o.passed()));

    let strict = check::run(
        &manifest,
        ManagerConfig {
            trait_conflicts: TraitConflictPolicy::Error,
            ..ManagerConfig::default()
        },
    );
    assert!(!strict[2].passed());
}

// ────────────────────────────────────────────────────────────────────────────
// describe
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_describe_summary() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SHAPES);

    let summary = describe::run(&path, ManagerConfig::default(), "Square").unwrap();
    assert_eq!(summary.kind, "Class");
    assert_eq!(summary.parent.as_deref(), Some("Shape"));
    assert_eq!(summary.ancestors.interfaces, vec!["HasArea"]);
    assert_eq!(summary.ancestors.traits, vec!["Named"]);
    assert_eq!(summary.constants["UNITS"], Value::from("cm"));
    assert!(summary.statics.contains_key("count"));

    let method_names: Vec<&str> = summary.methods.iter().map(|m| m.name.as_str()).collect();
    assert!(method_names.contains(&"area"));
    assert!(method_names.contains(&"getLabel"));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["name"], "Square");
}

#[test]
fn test_describe_unknown_class() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SHAPES);
    assert!(describe::run(&path, ManagerConfig::default(), "Circle").is_err());
}

// ────────────────────────────────────────────────────────────────────────────
// new
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_new_with_args_and_call() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SHAPES);

    let outcome = new::run(
        &path,
        ManagerConfig::default(),
        "Square",
        Some("[2]"),
        Some("getLabel"),
    )
    .unwrap();
    assert_eq!(outcome.class, "Square");
    assert_eq!(outcome.fields["side"], Value::from(2));
    assert_eq!(outcome.result, Some(Value::from("shape")));
}

#[test]
fn test_new_rejects_abstract_class() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SHAPES);
    assert!(new::run(&path, ManagerConfig::default(), "Shape", None, None).is_err());
}

// ────────────────────────────────────────────────────────────────────────────
// config and manifests on disk
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clazz.toml");
    std::fs::write(&path, "strict-meta = true\n").unwrap();

    let config = clazz_cli::load_config(Some(&path)).unwrap();
    assert!(config.strict_meta);
    assert_eq!(
        clazz_cli::load_config(None).unwrap(),
        ManagerConfig::default()
    );
    assert!(clazz_cli::load_config(Some(&dir.path().join("missing.toml"))).is_err());
}

#[test]
fn test_malformed_manifest() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, "{ \"classes\": [");
    assert!(ClassManifest::from_file(&path).is_err());
    assert!(clazz_cli::load_manager(&path, ManagerConfig::default()).is_err());
}
