//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_single_product() {
  let env = TestEnv::from_fixture("linux_cmark.json");

  env
    .buildplan_cmd()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Phase 1: cmark"))
    .stdout(predicate::str::contains("build cmark on linux-x86_64"))
    .stdout(predicate::str::contains("1 steps across 1 phases"));
}

#[test]
fn plan_schedules_dependencies_first() {
  let env = TestEnv::from_fixture("linux_toolchain.json");
  let json = env.json(&["plan"]);

  let schedule: Vec<Vec<String>> = serde_json::from_value(json["schedule"].clone()).unwrap();
  let flat: Vec<&str> = schedule.iter().flatten().map(String::as_str).collect();
  let position = |name: &str| flat.iter().position(|p| *p == name).unwrap();

  assert!(position("cmark") < position("llvm"));
  assert!(position("llvm") < position("language"));
  assert!(position("foundation") < position("xctest"));
  assert_eq!(flat.last(), Some(&"languagepm"));
  assert!(!flat.contains(&"lldb"));
}

#[test]
fn plan_reports_build_subdir_and_targets() {
  let env = TestEnv::from_fixture("linux_toolchain.json");
  let json = env.json(&["plan"]);

  assert_eq!(json["build_subdir"], "ninja-ReleaseAssert+stdlib-DebugAssert");
  assert_eq!(json["hosts"].as_array().unwrap().len(), 1);

  let text = json.to_string();
  assert!(text.contains("language-stdlib-linux-x86_64"));
  assert!(text.contains("check-language-validation-linux-x86_64"));
}

#[test]
fn plan_products_argument_overrides_preset() {
  let env = TestEnv::from_fixture("linux_toolchain.json");
  let json = env.json(&["plan", "cmark"]);

  assert_eq!(json["schedule"], serde_json::json!([["cmark"]]));
}

#[test]
fn plan_verbose_lists_targets() {
  let env = TestEnv::from_fixture("linux_toolchain.json");

  env
    .buildplan_cmd()
    .args(["--verbose", "plan"])
    .assert()
    .success()
    .stdout(predicate::str::contains("      language-stdlib-linux-x86_64"));
}

#[test]
fn plan_unknown_product_fails() {
  let env = TestEnv::from_fixture("linux_cmark.json");

  env
    .buildplan_cmd()
    .args(["plan", "docs"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown product 'docs'"));
}

#[test]
fn plan_cyclic_registry_fails() {
  let env = TestEnv::from_fixture("cyclic_registry.json");

  env
    .buildplan_cmd()
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dependency cycle"));
}

#[test]
fn plan_unsupported_host_test_mode_fails() {
  let env = TestEnv::from_fixture("ios_host_tests.json");

  env
    .buildplan_cmd()
    .args(["plan", "cmark"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("host-only tests are not supported"));
}
