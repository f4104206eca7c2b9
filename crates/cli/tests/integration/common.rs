//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment holding one preset file.
pub struct TestEnv {
  pub temp: TempDir,
  pub preset_path: PathBuf,
}

impl TestEnv {
  /// Copy a fixture to a temporary `preset.json`.
  pub fn from_fixture(name: &str) -> Self {
    Self::from_content(&fixture_content(name))
  }

  /// Write `content` to a temporary `preset.json`.
  pub fn from_content(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let preset_path = temp.path().join("preset.json");
    std::fs::write(&preset_path, content).unwrap();
    Self { temp, preset_path }
  }

  /// Get a Command for the buildplan binary with `--preset` already set.
  ///
  /// `RUST_LOG` is cleared so log output never mixes into asserted stderr.
  pub fn buildplan_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("buildplan");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--preset").arg(&self.preset_path);
    cmd
  }

  /// Run with `--output json` and parse stdout.
  pub fn json(&self, args: &[&str]) -> serde_json::Value {
    let output = self.buildplan_cmd().args(["--output", "json"]).args(args).output().unwrap();
    assert!(
      output.status.success(),
      "command failed: {}",
      String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
  }
}
