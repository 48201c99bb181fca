//! Integration tests for the `load` and `show-places` commands.

mod common;

use common::{arg, TestEnv};
use predicates::prelude::*;

#[test]
fn test_load_json_file() {
    let env = TestEnv::new();
    let file = env.write_file("settings.json", r#"{"debug": true}"#);

    env.command()
        .args(["load", "mymod", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""debug": true"#));
}

#[test]
fn test_load_resolves_imports() {
    let env = TestEnv::new();
    env.write_file("base.json", r#"{"a": 1, "b": 1}"#);
    let file = env.write_file("settings.json", r#"{"$import": "./base.json", "b": 2}"#);

    env.command()
        .args(["load", "mymod", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""a": 1"#))
        .stdout(predicate::str::contains(r#""b": 2"#));
}

#[test]
fn test_load_cyclic_import_fails() {
    let env = TestEnv::new();
    env.write_file("a.json", r#"{"$import": "./b.json"}"#);
    let file = env.write_file("b.json", r#"{"$import": "./a.json"}"#);

    env.command()
        .args(["load", "mymod", &arg(&file)])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("cyclic"));
}

#[test]
fn test_load_missing_file_fails() {
    let env = TestEnv::new();
    let file = env.path("nowhere.json");

    env.command()
        .args(["load", "mymod", &arg(&file)])
        .assert()
        .failure()
        .code(6);
}

#[test]
fn test_load_parse_error_fails() {
    let env = TestEnv::new();
    let file = env.write_file("broken.json", "{not json");

    env.command()
        .args(["load", "mymod", &arg(&file)])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_show_places_lists_defaults() {
    let env = TestEnv::new();

    env.command()
        .args(["show-places", "mymod", "--from", &arg(&env.temp_path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("package.json"))
        .stdout(predicate::str::contains(".mymodrc"))
        .stdout(predicate::str::contains("mymod.config.toml"));
}

#[test]
fn test_show_places_reflects_meta_override() {
    let env = TestEnv::new();
    env.write_file(".figtreerc.json", r#"{"search_places": ["only.json"]}"#);

    env.command()
        .args(["show-places", "mymod", "--from", &arg(&env.temp_path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("only.json"))
        .stdout(predicate::str::contains("package.json").not());
}
