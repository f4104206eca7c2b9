//! Host-specific build and test configuration.
//!
//! For one host target and the [`GlobalFlags`], [`resolve`] computes which SDKs
//! must be configured and which concrete stdlib, test and benchmark targets
//! the external build tool is asked for. Resolution is a pure function of its
//! inputs, so results can be memoized with [`HostConfigCache`].
//!
//! Target names follow a fixed grammar:
//!
//! | kind | name |
//! |------|------|
//! | stdlib build | `language-test-stdlib-<t>` or `language-stdlib-<t>` |
//! | test run | `check-language{subset}{exec}-<t>` |
//! | optimized test run | `check-language{subset}-optimize-<t>` |
//! | benchmark build | `language-benchmark-<t>[-external]` |
//! | benchmark run | `check-language-benchmark-<t>[-external]` |

pub mod cache;
pub mod flags;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::platform::{DeploymentTarget, PlatformFamily, SdkCategory, TargetError};

pub use cache::HostConfigCache;
pub use flags::{DeploymentAllowlist, GlobalFlags};

/// Concrete targets the build tool is asked for on one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostSpecificConfiguration {
  /// SDKs that must be configured, including ones nothing is built for.
  pub sdks_to_configure: BTreeSet<SdkCategory>,
  /// Standard library build targets.
  pub stdlib_build_targets: Vec<String>,
  /// Test suites to run.
  pub test_run_targets: Vec<String>,
  /// Benchmark build targets.
  pub benchmark_build_targets: Vec<String>,
  /// Benchmark suites to run.
  pub benchmark_run_targets: Vec<String>,
}

impl HostSpecificConfiguration {
  /// Whether nothing at all is configured or built.
  pub fn is_empty(&self) -> bool {
    self.sdks_to_configure.is_empty()
      && self.stdlib_build_targets.is_empty()
      && self.test_run_targets.is_empty()
      && self.benchmark_build_targets.is_empty()
      && self.benchmark_run_targets.is_empty()
  }
}

/// Optimization modes that get their own test run target.
const OPTIMIZATION_INFIXES: [(&str, fn(&GlobalFlags) -> bool); 3] = [
  ("optimize", |f| f.test_optimized),
  ("optimize_size", |f| f.test_optimize_for_size),
  (
    "optimize_none_with_implicit_dynamic",
    |f| f.test_optimize_none_with_implicit_dynamic,
  ),
];

/// Resolve the configuration for `target` as a host.
///
/// When `target` is the designated host, the configured targets are the stdlib
/// deployment targets (the host alone when unset) and the built targets are
/// those the allowlist permits. Any other target is a cross-compile host that
/// configures only itself.
///
/// # Errors
///
/// - `UnsupportedHostTestMode` if a host-only test run is requested for a
///   family that cannot do one.
/// - `UnknownTarget` / `UnknownPlatform` if a deployment target name is not in
///   the catalogue.
/// - `InvalidAllowlistEntry` if the allowlist names an undeclared target.
pub fn resolve(target: &DeploymentTarget, flags: &GlobalFlags) -> Result<HostSpecificConfiguration, TargetError> {
  check_host_test_modes(flags)?;

  let declared = declared_targets(flags)?;
  let is_primary_host = target.name() == flags.host_target;

  let (to_configure, to_build) = if is_primary_host {
    let configure = declared.clone().unwrap_or_else(|| vec![*target]);
    let allowlist = &flags.build_stdlib_deployment_targets;
    if let DeploymentAllowlist::Only(names) = allowlist
      && let Some(name) = names.iter().find(|name| !configure.iter().any(|t| t.name() == **name))
    {
      return Err(TargetError::InvalidAllowlistEntry(name.clone()));
    }
    let build: Vec<DeploymentTarget> = configure.iter().copied().filter(|t| allowlist.permits(&t.name())).collect();
    (configure, build)
  } else {
    let build = match &declared {
      Some(list) if !list.contains(target) => Vec::new(),
      _ => vec![*target],
    };
    (vec![*target], build)
  };

  let (to_configure, to_build) = match declared {
    Some(list) if list.is_empty() => (Vec::new(), Vec::new()),
    _ => (to_configure, to_build),
  };

  let mut config = HostSpecificConfiguration::default();

  for deployment in &to_configure {
    // SDK paths are needed even when nothing is compiled against them.
    config.sdks_to_configure.insert(deployment.sdk());

    if to_build.contains(deployment) {
      add_target_actions(&mut config, deployment, flags);
    }
  }

  debug!(
    host = %target,
    sdks = config.sdks_to_configure.len(),
    stdlib = config.stdlib_build_targets.len(),
    tests = config.test_run_targets.len(),
    benchmarks = config.benchmark_build_targets.len(),
    "resolved host configuration"
  );

  Ok(config)
}

/// Resolve a host given by name.
pub fn resolve_named(target: &str, flags: &GlobalFlags) -> Result<HostSpecificConfiguration, TargetError> {
  resolve(&target.parse()?, flags)
}

/// Resolve the designated host followed by every cross-compile host.
///
/// Hosts are returned in that order, without duplicates.
pub fn resolve_all_hosts(
  flags: &GlobalFlags,
) -> Result<Vec<(DeploymentTarget, HostSpecificConfiguration)>, TargetError> {
  let mut hosts: Vec<DeploymentTarget> = Vec::new();
  for name in std::iter::once(&flags.host_target).chain(&flags.cross_compile_hosts) {
    let target: DeploymentTarget = name.parse()?;
    if !hosts.contains(&target) {
      hosts.push(target);
    }
  }

  hosts
    .into_iter()
    .map(|host| resolve(&host, flags).map(|config| (host, config)))
    .collect()
}

fn check_host_test_modes(flags: &GlobalFlags) -> Result<(), TargetError> {
  for family in PlatformFamily::ALL {
    if family.host_test_requested(flags) && !family.supports_host_tests() {
      return Err(TargetError::UnsupportedHostTestMode {
        platform: family.to_string(),
      });
    }
  }
  Ok(())
}

/// Parse `stdlib_deployment_targets`, dropping repeated names.
fn declared_targets(flags: &GlobalFlags) -> Result<Option<Vec<DeploymentTarget>>, TargetError> {
  let Some(names) = &flags.stdlib_deployment_targets else {
    return Ok(None);
  };

  let mut targets = Vec::with_capacity(names.len());
  for name in names {
    let target: DeploymentTarget = name.parse()?;
    if !targets.contains(&target) {
      targets.push(target);
    }
  }
  Ok(Some(targets))
}

fn add_target_actions(config: &mut HostSpecificConfiguration, deployment: &DeploymentTarget, flags: &GlobalFlags) {
  let family = deployment.family;
  let name = deployment.name();

  if !family.build_enabled(flags) {
    return;
  }

  if flags.wants_extra_testing() {
    config.stdlib_build_targets.push(format!("language-stdlib-{}", name));
  } else {
    config.stdlib_build_targets.push(format!("language-test-stdlib-{}", name));
  }

  if family.supports_benchmark() {
    config.benchmark_build_targets.push(format!("language-benchmark-{}", name));
    if flags.benchmark {
      config.benchmark_run_targets.push(format!("check-language-benchmark-{}", name));
    }

    if flags.build_external_benchmarks {
      config
        .benchmark_build_targets
        .push(format!("language-benchmark-{}-external", name));
      if flags.benchmark {
        config
          .benchmark_run_targets
          .push(format!("check-language-benchmark-{}-external", name));
      }
    }
  }

  let skip_arch = flags.skip_test_archs.iter().any(|a| a == deployment.arch.as_str());
  if !family.test_enabled(flags) || skip_arch {
    return;
  }

  let host_only = family.supports_host_tests() && family.host_test_requested(flags);
  let subset = subset_infix(flags);
  let exec = execution_infix(flags, host_only);

  let base = if family == PlatformFamily::MacOsx && flags.maccatalyst && flags.maccatalyst_ios_tests {
    format!("check-language{}{}-macosx-maccatalyst-{}", subset, exec, deployment.arch)
  } else {
    format!("check-language{}{}-{}", subset, exec, name)
  };
  config.test_run_targets.push(base);

  if host_only {
    return;
  }

  for (infix, enabled) in OPTIMIZATION_INFIXES {
    if enabled(flags) {
      config
        .test_run_targets
        .push(format!("check-language{}-{}-{}", subset, infix, name));
    }
  }
}

/// `-validation`, `-only_long`, `-only_stress` for a single subset; `-all` once
/// two or more are enabled.
fn subset_infix(flags: &GlobalFlags) -> &'static str {
  if flags.enabled_subset_count() >= 2 {
    "-all"
  } else if flags.validation_test {
    "-validation"
  } else if flags.long_test {
    "-only_long"
  } else if flags.stress_test {
    "-only_stress"
  } else {
    ""
  }
}

fn execution_infix(flags: &GlobalFlags, host_only: bool) -> &'static str {
  if host_only {
    return "-only_non_executable";
  }
  match (flags.only_executable_test, flags.only_non_executable_test) {
    (true, false) => "-only_executable",
    (false, true) => "-only_non_executable",
    _ => "",
  }
}
