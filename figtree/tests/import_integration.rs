//! Integration tests for `$import` directive resolution.

mod common;

use common::ConfigTree;
use figtree::Error;
use serde_json::json;

#[test]
fn test_import_single_file() {
    let tree = ConfigTree::new();
    tree.write("base.json", r#"{"a": 1, "b": 1}"#);
    let file = tree.write("conf.json", r#"{"$import": "./base.json", "b": 2}"#);

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    // Importing file's own keys win.
    assert_eq!(found.config, json!({"a": 1, "b": 2}));
}

#[test]
fn test_import_list_later_wins() {
    let tree = ConfigTree::new();
    tree.write("one.json", r#"{"x": "one", "a": 1}"#);
    tree.write("two.json", r#"{"x": "two", "b": 2}"#);
    let file = tree.write(
        "conf.json",
        r#"{"$import": ["./one.json", "./two.json"]}"#,
    );

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"x": "two", "a": 1, "b": 2}));
}

#[test]
fn test_import_blank_file_contributes_nothing() {
    let tree = ConfigTree::new();
    tree.write("real.json", r#"{"kept": true}"#);
    tree.write("blank.yaml", "\n");
    let file = tree.write(
        "conf.json",
        r#"{"$import": ["./real.json", "./blank.yaml"]}"#,
    );

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    // The blank file must not wipe the keys merged before it.
    assert_eq!(found.config, json!({"kept": true}));
    assert!(!found.is_empty);
}

#[test]
fn test_import_nested_chain() {
    let tree = ConfigTree::new();
    tree.write("root.yaml", "level: root\nroot_only: true\n");
    tree.write("mid.yaml", "$import: ./root.yaml\nlevel: mid\n");
    let file = tree.write("leaf.yaml", "$import: ./mid.yaml\nlevel: leaf\n");

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(
        found.config,
        json!({"level": "leaf", "root_only": true})
    );
}

#[test]
fn test_import_relative_to_importing_file() {
    let tree = ConfigTree::new();
    tree.write("shared/base.json", r#"{"from_shared": true}"#);
    tree.write("sub/mid.json", r#"{"$import": "../shared/base.json"}"#);
    let file = tree.write("conf.json", r#"{"$import": "./sub/mid.json"}"#);

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"from_shared": true}));
}

#[test]
fn test_import_across_formats() {
    let tree = ConfigTree::new();
    tree.write("base.toml", "kind = \"toml\"\n");
    let file = tree.write("conf.yaml", "$import: ./base.toml\nextra: 1\n");

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"kind": "toml", "extra": 1}));
}

#[test]
fn test_import_arrays_merge_by_default() {
    let tree = ConfigTree::new();
    tree.write("base.json", r#"{"plugins": ["a", "b"]}"#);
    let file = tree.write(
        "conf.json",
        r#"{"$import": "./base.json", "plugins": ["c"]}"#,
    );

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"plugins": ["a", "b", "c"]}));
}

#[test]
fn test_import_arrays_replace_when_disabled() {
    let tree = ConfigTree::new();
    tree.write("base.json", r#"{"plugins": ["a", "b"]}"#);
    let file = tree.write(
        "conf.json",
        r#"{"$import": "./base.json", "plugins": ["c"]}"#,
    );

    let explorer = tree
        .builder("app")
        .with_merge_import_arrays(false)
        .build_sync()
        .unwrap();
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"plugins": ["c"]}));
}

#[test]
fn test_import_cycle_is_detected() {
    let tree = ConfigTree::new();
    tree.write("a.json", r#"{"$import": "./b.json"}"#);
    tree.write("b.json", r#"{"$import": "./a.json"}"#);

    let explorer = tree.explorer_sync("app");
    let err = explorer.load(tree.path("a.json")).unwrap_err();

    assert!(matches!(err, Error::CyclicImport { .. }));
}

#[test]
fn test_import_self_cycle_is_detected() {
    let tree = ConfigTree::new();
    let file = tree.write("self.json", r#"{"$import": "./self.json"}"#);

    let explorer = tree.explorer_sync("app");
    let err = explorer.load(&file).unwrap_err();

    assert!(matches!(err, Error::CyclicImport { .. }));
}

#[test]
fn test_import_diamond_is_allowed() {
    let tree = ConfigTree::new();
    tree.write("shared.json", r#"{"s": 1}"#);
    tree.write("left.json", r#"{"$import": "./shared.json", "l": 1}"#);
    tree.write("right.json", r#"{"$import": "./shared.json", "r": 1}"#);
    let file = tree.write(
        "conf.json",
        r#"{"$import": ["./left.json", "./right.json"]}"#,
    );

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert_eq!(found.config, json!({"s": 1, "l": 1, "r": 1}));
}

#[test]
fn test_import_invalid_shape_is_rejected() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"$import": 42}"#);

    let explorer = tree.explorer_sync("app");
    let err = explorer.load(&file).unwrap_err();

    assert!(matches!(err, Error::InvalidImport { .. }));
}

#[test]
fn test_import_missing_target_is_error() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"$import": "./nowhere.json"}"#);

    let explorer = tree.explorer_sync("app");
    let err = explorer.load(&file).unwrap_err();

    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn test_import_key_is_removed_from_result() {
    let tree = ConfigTree::new();
    tree.write("base.json", r#"{"a": 1}"#);
    let file = tree.write("conf.json", r#"{"$import": "./base.json"}"#);

    let explorer = tree.explorer_sync("app");
    let found = explorer.load(&file).unwrap().unwrap();

    assert!(found.config.get("$import").is_none());
}

#[tokio::test]
async fn test_async_import_matches_sync() {
    let tree = ConfigTree::new();
    tree.write("base.json", r#"{"a": 1}"#);
    let file = tree.write("conf.json", r#"{"$import": "./base.json", "b": 2}"#);

    let sync_found = tree.explorer_sync("app").load(&file).unwrap();
    let async_found = tree.explorer("app").load(&file).await.unwrap();

    assert_eq!(sync_found, async_found);
}
