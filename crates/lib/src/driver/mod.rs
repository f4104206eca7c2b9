//! Planning and dispatching a toolchain build.
//!
//! [`plan`] runs every check before anything is dispatched: it names the
//! build directory, schedules the selected products and resolves the
//! configuration of every host. [`run`] then walks the plan phase by phase
//! and, for each host, hands one [`DispatchStep`] per product and action to a
//! [`Dispatcher`].
//!
//! Externally orchestrated products of a phase are grouped into one step per
//! host and action, placed where the first of them would have been.

mod types;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::build_dir::{BuildVariantConfig, build_subdir};
use crate::host::{GlobalFlags, HostSpecificConfiguration, resolve_all_hosts};
use crate::platform::DeploymentTarget;
use crate::product::{ActionContext, Product, ProductActions, ProductRegistry};
use crate::schedule::{Schedule, schedule};

pub use types::{DispatchAction, DispatchError, DispatchReport, DispatchStep, DispatchUnit, PlanError};

/// Receives dispatch steps. Implementations talk to the external build tool.
///
/// Steps arrive in dependency order. A dispatcher may run the steps of one
/// phase concurrently on its own.
pub trait Dispatcher {
  fn dispatch(&mut self, step: &DispatchStep) -> Result<(), DispatchError>;
}

/// Resolved configuration of one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPlan {
  pub target: DeploymentTarget,
  pub config: HostSpecificConfiguration,
}

/// Everything decided before dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
  /// Working directory name under the build root.
  pub build_subdir: String,
  pub schedule: Schedule,
  /// The designated host first, then each cross-compile host.
  pub hosts: Vec<HostPlan>,
}

/// Check and resolve everything needed to dispatch `selected`.
///
/// # Errors
///
/// Returns `PlanError::Graph` for unknown products and `PlanError::Target`
/// for any host resolution failure. Nothing is dispatched in either case.
pub fn plan<S: AsRef<str>>(
  registry: &ProductRegistry,
  selected: &[S],
  flags: &GlobalFlags,
  variants: &BuildVariantConfig,
) -> Result<BuildPlan, PlanError> {
  let build_subdir = build_subdir(variants);
  let schedule = schedule(registry, selected)?;
  let hosts = resolve_all_hosts(flags)?
    .into_iter()
    .map(|(target, config)| HostPlan { target, config })
    .collect::<Vec<_>>();

  info!(
    build_subdir = %build_subdir,
    phases = schedule.len(),
    hosts = hosts.len(),
    "build planned"
  );

  Ok(BuildPlan {
    build_subdir,
    schedule,
    hosts,
  })
}

impl BuildPlan {
  /// Every step a successful run would dispatch, in order.
  pub fn steps(&self, registry: &ProductRegistry, flags: &GlobalFlags) -> Vec<DispatchStep> {
    let mut steps = Vec::new();
    for phase in self.schedule.phases() {
      for host in &self.hosts {
        let products = phase_products(registry, phase);
        for unit in units(&products, &host_context(host, flags)) {
          steps.extend(unit.into_iter().flatten());
        }
      }
    }
    steps
  }
}

/// Dispatch `plan`, skipping the dependents of failed products.
///
/// A failed step stops the remaining actions of its products on every host;
/// any product that transitively depends on a failed one is skipped.
pub fn run(
  plan: &BuildPlan,
  registry: &ProductRegistry,
  flags: &GlobalFlags,
  dispatcher: &mut dyn Dispatcher,
) -> DispatchReport {
  let mut report = DispatchReport::default();

  for (index, phase) in plan.schedule.phases().iter().enumerate() {
    debug!(phase = index, products = phase.len(), "dispatching phase");

    for host in &plan.hosts {
      let ctx = host_context(host, flags);

      let products: Vec<&Product> = phase_products(registry, phase)
        .into_iter()
        .filter(|product| !is_blocked(registry, &mut report, &product.name))
        .collect();

      for unit in units(&products, &ctx) {
        for step in unit.into_iter().flatten() {
          // An earlier action of the same unit may have failed.
          if step.unit.products().iter().any(|p| report.is_failed(p)) {
            continue;
          }

          match dispatcher.dispatch(&step) {
            Ok(()) => {
              debug!(step = %step, "dispatched");
              report.dispatched.push(step);
            }
            Err(err) => {
              warn!(step = %step, error = %err, "dispatch failed");
              for product in step.unit.products() {
                report.failed.push((product.clone(), err.clone()));
              }
            }
          }
        }
      }
    }
  }

  info!(
    dispatched = report.dispatched.len(),
    failed = report.failed.len(),
    skipped = report.skipped.len(),
    "dispatch complete"
  );
  report
}

fn host_context<'a>(host: &'a HostPlan, flags: &'a GlobalFlags) -> ActionContext<'a> {
  ActionContext {
    host: &host.target,
    flags,
    config: &host.config,
  }
}

fn phase_products<'r>(registry: &'r ProductRegistry, phase: &[String]) -> Vec<&'r Product> {
  phase.iter().filter_map(|name| registry.get(name)).collect()
}

/// Whether `product` must not be dispatched because it, or something it
/// depends on, failed. Newly blocked products are recorded as skipped.
fn is_blocked(registry: &ProductRegistry, report: &mut DispatchReport, product: &str) -> bool {
  if report.blocker(product).is_some() {
    return true;
  }

  let blocker = report
    .failed
    .iter()
    .map(|(name, _)| name.as_str())
    .find(|failed| registry.depends_on(product, failed))
    .map(str::to_string);

  match blocker {
    Some(dependency) => {
      warn!(product = %product, dependency = %dependency, "skipping product after dependency failure");
      report.skipped.push((product.to_string(), dependency));
      true
    }
    None => false,
  }
}

/// The steps of one phase on one host, grouped per dispatch unit and ordered
/// build, test, install.
fn units(products: &[&Product], ctx: &ActionContext<'_>) -> Vec<[Option<DispatchStep>; 3]> {
  let mut units = Vec::new();
  let mut orchestrated: Option<usize> = None;

  for product in products {
    if product.flags.externally_orchestrated {
      match orchestrated {
        Some(position) => merge_into_group(&mut units[position], product, ctx),
        None => {
          let mut group = [None, None, None];
          merge_into_group(&mut group, product, ctx);
          orchestrated = Some(units.len());
          units.push(group);
        }
      }
    } else {
      units.push(DispatchAction::ALL.map(|action| product.should(action, ctx).then(|| product.step(action, ctx))));
    }
  }

  units
}

fn merge_into_group(group: &mut [Option<DispatchStep>; 3], product: &Product, ctx: &ActionContext<'_>) {
  for (slot, action) in group.iter_mut().zip(DispatchAction::ALL) {
    if !product.should(action, ctx) {
      continue;
    }
    let step = slot.get_or_insert_with(|| DispatchStep {
      unit: DispatchUnit::Orchestrated(Vec::new()),
      host: *ctx.host,
      action,
      targets: Vec::new(),
    });
    if let DispatchUnit::Orchestrated(members) = &mut step.unit {
      members.push(product.name.clone());
    }
    for target in product.targets(action, ctx) {
      if !step.targets.contains(&target) {
        step.targets.push(target);
      }
    }
  }
}
