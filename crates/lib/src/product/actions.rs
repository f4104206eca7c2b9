//! Uniform build/test/install interface over products.
//!
//! The driver never matches on product names. It asks each scheduled product,
//! through [`ProductActions`], whether it should build, test or install on a
//! host, and collects the resulting [`DispatchStep`]s.

use crate::driver::{DispatchAction, DispatchStep, DispatchUnit};
use crate::host::{GlobalFlags, HostSpecificConfiguration};
use crate::platform::DeploymentTarget;

use super::{Product, ProductKind};

/// Everything a product needs to decide what to do on one host.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
  pub host: &'a DeploymentTarget,
  pub flags: &'a GlobalFlags,
  pub config: &'a HostSpecificConfiguration,
}

/// Per-product build, test and install behaviour.
///
/// `build`, `test` and `install` describe the request; they do not perform it.
/// The driver hands the returned steps to a dispatcher.
pub trait ProductActions {
  fn name(&self) -> &str;

  fn should_build(&self, ctx: &ActionContext<'_>) -> bool;

  fn should_test(&self, ctx: &ActionContext<'_>) -> bool;

  fn should_install(&self, ctx: &ActionContext<'_>) -> bool;

  /// Concrete build-tool targets for `action` on the context's host.
  fn targets(&self, action: DispatchAction, ctx: &ActionContext<'_>) -> Vec<String>;

  fn build(&self, ctx: &ActionContext<'_>) -> DispatchStep {
    self.step(DispatchAction::Build, ctx)
  }

  fn test(&self, ctx: &ActionContext<'_>) -> DispatchStep {
    self.step(DispatchAction::Test, ctx)
  }

  fn install(&self, ctx: &ActionContext<'_>) -> DispatchStep {
    self.step(DispatchAction::Install, ctx)
  }

  fn should(&self, action: DispatchAction, ctx: &ActionContext<'_>) -> bool {
    match action {
      DispatchAction::Build => self.should_build(ctx),
      DispatchAction::Test => self.should_test(ctx),
      DispatchAction::Install => self.should_install(ctx),
    }
  }

  fn step(&self, action: DispatchAction, ctx: &ActionContext<'_>) -> DispatchStep {
    DispatchStep {
      unit: DispatchUnit::Product(self.name().to_string()),
      host: *ctx.host,
      action,
      targets: self.targets(action, ctx),
    }
  }
}

impl ProductActions for Product {
  fn name(&self) -> &str {
    &self.name
  }

  fn should_build(&self, ctx: &ActionContext<'_>) -> bool {
    if self.flags.host_platform_restricted && ctx.host.family.is_darwin() {
      return false;
    }
    match self.kind {
      ProductKind::Benchmarks => ctx.host.family.supports_benchmark(),
      ProductKind::MinimalStdlib => ctx.flags.build_minimal_stdlib,
      _ => true,
    }
  }

  fn should_test(&self, ctx: &ActionContext<'_>) -> bool {
    if !self.should_build(ctx) {
      return false;
    }
    match self.kind {
      ProductKind::Language => !ctx.config.test_run_targets.is_empty(),
      ProductKind::Benchmarks => !ctx.config.benchmark_run_targets.is_empty(),
      ProductKind::EarlyLanguageDriver => false,
      _ => ctx.flags.test_products.contains(&self.name),
    }
  }

  fn should_install(&self, ctx: &ActionContext<'_>) -> bool {
    if !self.should_build(ctx) {
      return false;
    }
    (ctx.flags.install_all && !self.flags.ignores_install_all) || ctx.flags.install_products.contains(&self.name)
  }

  fn targets(&self, action: DispatchAction, ctx: &ActionContext<'_>) -> Vec<String> {
    match (self.kind, action) {
      (ProductKind::Language, DispatchAction::Build) => ctx.config.stdlib_build_targets.clone(),
      (ProductKind::Language, DispatchAction::Test) => ctx.config.test_run_targets.clone(),
      (ProductKind::Benchmarks, DispatchAction::Build) => ctx.config.benchmark_build_targets.clone(),
      (ProductKind::Benchmarks, DispatchAction::Test) => ctx.config.benchmark_run_targets.clone(),
      _ => Vec::new(),
    }
  }
}
