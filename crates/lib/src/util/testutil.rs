//! Test utilities for buildplan-lib.

use crate::host::GlobalFlags;

/// Flags for resolving `host` as the designated host, with the host as the
/// only stdlib deployment target.
pub fn host_flags(host: &str) -> GlobalFlags {
  GlobalFlags {
    stdlib_deployment_targets: Some(vec![host.to_string()]),
    ..GlobalFlags::for_host(host)
  }
}
