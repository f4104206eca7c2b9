//! Memoized host configuration resolution.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::trace;

use super::{GlobalFlags, HostSpecificConfiguration, resolve};
use crate::platform::{DeploymentTarget, TargetError};

/// Caches [`resolve`] results per `(target name, flags)`.
///
/// Resolution is pure, so a cached entry is always equal to a fresh one.
/// Failed resolutions are not cached.
#[derive(Debug, Default)]
pub struct HostConfigCache {
  entries: HashMap<(String, GlobalFlags), HostSpecificConfiguration>,
  hits: usize,
}

impl HostConfigCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Resolve `target`, returning the cached result if there is one.
  pub fn get_or_resolve(
    &mut self,
    target: &DeploymentTarget,
    flags: &GlobalFlags,
  ) -> Result<&HostSpecificConfiguration, TargetError> {
    match self.entries.entry((target.name(), flags.clone())) {
      Entry::Occupied(entry) => {
        self.hits += 1;
        trace!(host = %target, "host configuration cache hit");
        Ok(entry.into_mut())
      }
      Entry::Vacant(entry) => {
        let config = resolve(target, flags)?;
        Ok(entry.insert(config))
      }
    }
  }

  /// Number of cached configurations.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of lookups answered from the cache.
  pub fn hits(&self) -> usize {
    self.hits
  }
}
