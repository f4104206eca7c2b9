//! Shared helpers for library integration tests.

use buildplan_lib::host::{DeploymentAllowlist, GlobalFlags, HostSpecificConfiguration, resolve_named};

/// Flags with `host` as the designated host and its only deployment target,
/// building every declared target.
pub fn single_target_flags(host: &str) -> GlobalFlags {
  GlobalFlags {
    stdlib_deployment_targets: Some(vec![host.to_string()]),
    build_stdlib_deployment_targets: DeploymentAllowlist::All,
    ..GlobalFlags::for_host(host)
  }
}

/// Resolve the designated host of `flags`.
pub fn resolve_host(flags: &GlobalFlags) -> HostSpecificConfiguration {
  resolve_named(&flags.host_target, flags).unwrap()
}

/// Set a boolean flag by its preset name.
pub fn set_flag(flags: &mut GlobalFlags, name: &str) {
  let mut value = serde_json::to_value(&*flags).unwrap();
  value[name] = serde_json::Value::Bool(true);
  *flags = serde_json::from_value(value).unwrap_or_else(|e| panic!("bad flag {}: {}", name, e));
}
