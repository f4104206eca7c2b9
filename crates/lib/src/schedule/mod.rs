//! Build scheduling.
//!
//! [`schedule`] turns a product selection into an ordered list of phases. The
//! products of one phase may be built in any order or concurrently; phases run
//! in list order.
//!
//! The selection is first closed over dependencies, then split into the
//! pre-ordered products and the rest. Each partition is levelled on its own
//! edges and the pre-ordered phases are placed first. Within a phase products
//! keep registry declaration order, so equal inputs always give equal
//! schedules.

mod dag;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::product::{GraphError, Product, ProductRegistry};

use dag::PhaseDag;

/// An ordered list of phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
  phases: Vec<Vec<String>>,

  /// How many leading phases hold pre-ordered products.
  pre_ordered_phases: usize,
}

impl Schedule {
  pub fn phases(&self) -> &[Vec<String>] {
    &self.phases
  }

  /// Number of leading phases that hold pre-ordered products.
  pub fn pre_ordered_phases(&self) -> usize {
    self.pre_ordered_phases
  }

  pub fn len(&self) -> usize {
    self.phases.len()
  }

  pub fn is_empty(&self) -> bool {
    self.phases.is_empty()
  }

  /// Every scheduled product in build order.
  pub fn flatten(&self) -> Vec<&str> {
    self.phases.iter().flatten().map(String::as_str).collect()
  }

  /// Index of the phase that builds `product`.
  pub fn phase_of(&self, product: &str) -> Option<usize> {
    self.phases.iter().position(|phase| phase.iter().any(|p| p == product))
  }

  pub fn contains(&self, product: &str) -> bool {
    self.phase_of(product).is_some()
  }
}

/// Schedule `selected` and everything it depends on.
///
/// # Errors
///
/// Returns `UnknownProduct` if a selected name is not in the registry.
pub fn schedule<S: AsRef<str>>(registry: &ProductRegistry, selected: &[S]) -> Result<Schedule, GraphError> {
  let closure = registry.closure_indices(selected)?;
  let products = registry.products();

  let (pre_ordered, rest): (BTreeSet<usize>, BTreeSet<usize>) = closure
    .iter()
    .partition(|&&position| products[position].flags.pre_dependency_ordered);

  for &position in &pre_ordered {
    warn_cross_partition(registry, &products[position], &rest);
  }

  let early = PhaseDag::new(registry, &pre_ordered).phases()?;
  let late = PhaseDag::new(registry, &rest).phases()?;

  let pre_ordered_phases = early.len();
  let phases: Vec<Vec<String>> = early
    .into_iter()
    .chain(late)
    .map(|phase| phase.into_iter().map(|position| products[position].name.clone()).collect())
    .collect();

  for (index, phase) in phases.iter().enumerate() {
    debug!(phase = index, products = ?phase, pre_ordered = index < pre_ordered_phases, "scheduled phase");
  }

  Ok(Schedule {
    phases,
    pre_ordered_phases,
  })
}

/// A pre-ordered product depending on a later-built product cannot have that
/// dependency honoured.
fn warn_cross_partition(registry: &ProductRegistry, product: &Product, rest: &BTreeSet<usize>) {
  for dependency in &product.dependencies {
    if registry.declaration_index(dependency).is_some_and(|dep| rest.contains(&dep)) {
      warn!(
        product = %product.name,
        dependency = %dependency,
        "pre-ordered product depends on a product scheduled after it"
      );
    }
  }
}
