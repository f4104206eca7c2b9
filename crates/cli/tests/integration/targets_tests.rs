//! Targets command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn targets_for_preset_host() {
  let env = TestEnv::from_fixture("linux_cmark.json");

  env
    .buildplan_cmd()
    .arg("targets")
    .assert()
    .success()
    .stdout(predicate::str::contains("Host linux-x86_64"))
    .stdout(predicate::str::contains("language-test-stdlib-linux-x86_64"))
    .stdout(predicate::str::contains("check-language-linux-x86_64"));
}

#[test]
fn android_host_tests_are_non_executable() {
  let env = TestEnv::from_fixture("android_host_tests.json");
  let json = env.json(&["targets"]);

  let tests: Vec<String> = serde_json::from_value(json[0]["config"]["test_run_targets"].clone()).unwrap();
  assert_eq!(tests, vec!["check-language-only_non_executable-android-aarch64"]);

  let sdks = json[0]["config"]["sdks_to_configure"].as_array().unwrap();
  assert_eq!(sdks.len(), 2);
}

#[test]
fn explicit_cross_host_configures_only_itself() {
  let env = TestEnv::from_fixture("linux_cmark.json");
  let json = env.json(&["targets", "--host", "linux-aarch64"]);

  assert_eq!(json[0]["host"], "linux-aarch64");
  assert_eq!(
    json[0]["config"]["stdlib_build_targets"],
    serde_json::json!(["language-test-stdlib-linux-aarch64"])
  );
}

#[test]
fn unknown_host_fails() {
  let env = TestEnv::from_fixture("linux_cmark.json");

  env
    .buildplan_cmd()
    .args(["targets", "--host", "plan9-x86_64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid host: plan9-x86_64"));
}
