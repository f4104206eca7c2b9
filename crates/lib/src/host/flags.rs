//! Global build and test flags.
//!
//! [`GlobalFlags`] is the single immutable configuration value threaded through
//! the resolver and the dispatch driver. Every field is a plain named flag; the
//! core never parses command-line syntax. Field names follow the JSON preset
//! format read by [`crate::config`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which configured stdlib deployment targets are actually built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AllowlistRepr", into = "AllowlistRepr")]
pub enum DeploymentAllowlist {
  /// Build every configured target (written `"all"`).
  #[default]
  All,
  /// Build only the named targets.
  Only(Vec<String>),
}

impl DeploymentAllowlist {
  pub fn permits(&self, target_name: &str) -> bool {
    match self {
      Self::All => true,
      Self::Only(names) => names.iter().any(|n| n == target_name),
    }
  }
}

/// Wire form of [`DeploymentAllowlist`]: either the keyword `"all"` or a list
/// of target names. A list holding only `"all"` means the same as the keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AllowlistRepr {
  Keyword(String),
  List(Vec<String>),
}

impl TryFrom<AllowlistRepr> for DeploymentAllowlist {
  type Error = String;

  fn try_from(repr: AllowlistRepr) -> Result<Self, Self::Error> {
    match repr {
      AllowlistRepr::Keyword(word) if word == "all" => Ok(Self::All),
      AllowlistRepr::Keyword(word) => Err(format!("expected \"all\" or a list of targets, got \"{}\"", word)),
      AllowlistRepr::List(names) if names.len() == 1 && names[0] == "all" => Ok(Self::All),
      AllowlistRepr::List(names) => Ok(Self::Only(names)),
    }
  }
}

impl From<DeploymentAllowlist> for AllowlistRepr {
  fn from(allowlist: DeploymentAllowlist) -> Self {
    match allowlist {
      DeploymentAllowlist::All => AllowlistRepr::Keyword("all".to_string()),
      DeploymentAllowlist::Only(names) => AllowlistRepr::List(names),
    }
  }
}

/// Flat set of named build/test switches.
///
/// Everything defaults to off. `host_target` defaults to empty; the config
/// loader fills it with the detected machine target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalFlags {
  // === Targets ===
  /// The designated host target (e.g. "macosx-arm64").
  pub host_target: String,
  /// Additional hosts the toolchain is cross-compiled for.
  pub cross_compile_hosts: Vec<String>,
  /// Targets to configure the stdlib for. `None` means just the host.
  pub stdlib_deployment_targets: Option<Vec<String>>,
  /// Subset of the configured targets whose stdlib is built.
  pub build_stdlib_deployment_targets: DeploymentAllowlist,
  /// Architectures whose tests are never run.
  pub skip_test_archs: Vec<String>,

  // === Per-platform build switches ===
  pub build_osx: bool,
  pub build_ios_device: bool,
  pub build_ios_simulator: bool,
  pub build_tvos_device: bool,
  pub build_tvos_simulator: bool,
  pub build_watchos_device: bool,
  pub build_watchos_simulator: bool,
  pub build_linux: bool,
  pub build_freebsd: bool,
  pub build_cygwin: bool,
  pub build_android: bool,
  pub build_wasm: bool,

  // === Per-platform test switches ===
  pub test_osx: bool,
  pub test_ios_simulator: bool,
  pub test_tvos_simulator: bool,
  pub test_watchos_simulator: bool,
  pub test_linux: bool,
  pub test_freebsd: bool,
  pub test_cygwin: bool,
  pub test_android: bool,
  pub test_wasm: bool,

  // === Host-only test switches ===
  pub test_android_host: bool,
  pub test_ios_host: bool,
  pub test_tvos_host: bool,
  pub test_watchos_host: bool,

  // === Test subsets ===
  pub build_stdlib_unittest_extra: bool,
  pub validation_test: bool,
  pub long_test: bool,
  pub stress_test: bool,
  pub only_executable_test: bool,
  pub only_non_executable_test: bool,

  // === Optimization variants ===
  pub test_optimized: bool,
  pub test_optimize_for_size: bool,
  pub test_optimize_none_with_implicit_dynamic: bool,

  // === Benchmarks ===
  pub benchmark: bool,
  pub build_external_benchmarks: bool,

  // === Mac Catalyst ===
  pub maccatalyst: bool,
  pub maccatalyst_ios_tests: bool,

  // === Products ===
  pub build_minimal_stdlib: bool,
  pub install_all: bool,
  pub install_products: BTreeSet<String>,
  pub test_products: BTreeSet<String>,
}

impl GlobalFlags {
  /// Flags with only the host target set.
  pub fn for_host(host_target: impl Into<String>) -> Self {
    Self {
      host_target: host_target.into(),
      ..Default::default()
    }
  }

  /// Whether any test suite beyond the default one was requested.
  ///
  /// Those suites need the full standard library rather than the reduced
  /// test build.
  pub fn wants_extra_testing(&self) -> bool {
    self.build_stdlib_unittest_extra || self.validation_test || self.long_test || self.stress_test
  }

  /// Number of test subsets (validation, long, stress) that are enabled.
  pub fn enabled_subset_count(&self) -> usize {
    [self.validation_test, self.long_test, self.stress_test]
      .into_iter()
      .filter(|&on| on)
      .count()
  }
}
