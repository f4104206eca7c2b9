//! Preset handling for the build-dir and products commands.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_dir_from_variants() {
  let env = TestEnv::from_fixture("linux_toolchain.json");

  env
    .buildplan_cmd()
    .arg("build-dir")
    .assert()
    .success()
    .stdout(predicate::str::diff("ninja-ReleaseAssert+stdlib-DebugAssert\n"));
}

#[test]
fn build_dir_override_is_verbatim() {
  let env = TestEnv::from_content(
    r#"{ "flags": { "host_target": "linux-x86_64" }, "variants": { "build_subdir": "custom-dir", "enable_asan": true } }"#,
  );

  env
    .buildplan_cmd()
    .arg("build-dir")
    .assert()
    .success()
    .stdout(predicate::str::diff("custom-dir\n"));
}

#[test]
fn build_dir_json_includes_computed_label() {
  let env = TestEnv::from_content(
    r#"{ "flags": { "host_target": "linux-x86_64" }, "variants": { "build_subdir": "custom-dir", "enable_asan": true } }"#,
  );
  let json = env.json(&["build-dir"]);

  assert_eq!(json["build_subdir"], "custom-dir");
  assert_eq!(json["label"], "ninja-Debug+asan");
}

#[test]
fn products_lists_builtin_registry() {
  let env = TestEnv::from_fixture("linux_cmark.json");
  let json = env.json(&["products"]);

  let names: Vec<&str> = json
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["name"].as_str().unwrap())
    .collect();
  assert_eq!(names.len(), 20);
  assert!(names.contains(&"languagepm"));
}

#[test]
fn products_lists_custom_registry() {
  let env = TestEnv::from_content(
    r#"{
      "flags": { "host_target": "linux-x86_64" },
      "registry": [
        { "name": "base" },
        { "name": "tool", "dependencies": ["base"], "flags": { "externally_orchestrated": true } }
      ]
    }"#,
  );

  env
    .buildplan_cmd()
    .args(["--verbose", "products"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Products (2):"))
    .stdout(predicate::str::contains("tool [orchestrated]"))
    .stdout(predicate::str::contains("depends on: base"));
}

#[test]
fn unknown_preset_field_fails() {
  let env = TestEnv::from_content(r#"{ "flags": { "host_target": "linux-x86_64" }, "jobs": 4 }"#);

  env
    .buildplan_cmd()
    .arg("products")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown field"));
}
