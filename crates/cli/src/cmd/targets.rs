//! Implementation of the `buildplan targets` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use buildplan_lib::host::{HostConfigCache, HostSpecificConfiguration};
use buildplan_lib::platform::DeploymentTarget;

use crate::output::{OutputFormat, format_list, print_info, print_json, print_stat};

/// Resolve the host configuration of each requested host, or of the preset's
/// host and cross-compile hosts when none is given.
pub fn cmd_targets(preset: Option<&Path>, hosts: &[String], format: OutputFormat) -> Result<()> {
  let config = super::load_preset(preset)?;
  let flags = &config.flags;

  let names: Vec<String> = if hosts.is_empty() {
    std::iter::once(flags.host_target.clone())
      .chain(flags.cross_compile_hosts.iter().cloned())
      .collect()
  } else {
    hosts.to_vec()
  };

  let mut cache = HostConfigCache::new();
  let mut resolved: Vec<(DeploymentTarget, HostSpecificConfiguration)> = Vec::new();
  for name in &names {
    let target: DeploymentTarget = name.parse().with_context(|| format!("Invalid host: {}", name))?;
    let host_config = cache
      .get_or_resolve(&target, flags)
      .with_context(|| format!("Failed to resolve host {}", name))?;
    resolved.push((target, host_config.clone()));
  }

  if format.is_json() {
    let hosts: Vec<_> = resolved
      .iter()
      .map(|(target, config)| json!({ "host": target, "config": config }))
      .collect();
    return print_json(&hosts);
  }

  for (index, (target, host_config)) in resolved.iter().enumerate() {
    if index > 0 {
      println!();
    }
    print_info(&format!("Host {}", target));
    let sdks: Vec<&str> = host_config.sdks_to_configure.iter().map(|sdk| sdk.as_str()).collect();
    print_stat("SDKs", &format_list(&sdks));
    print_stat("Stdlib builds", &format_list(&host_config.stdlib_build_targets));
    print_stat("Test runs", &format_list(&host_config.test_run_targets));
    print_stat("Benchmark builds", &format_list(&host_config.benchmark_build_targets));
    print_stat("Benchmark runs", &format_list(&host_config.benchmark_run_targets));
  }

  Ok(())
}
