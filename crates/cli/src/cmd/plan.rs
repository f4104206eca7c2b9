//! Implementation of the `buildplan plan` command.
//!
//! Plans a build from a preset and performs a dry run: every step that would
//! be handed to the build tool is recorded and printed instead of executed.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;

use buildplan_lib::driver::{DispatchError, DispatchStep, Dispatcher, plan, run};

use crate::output::{
  OutputFormat, format_list, print_info, print_json, print_stat, print_step, print_success, print_warning,
};

/// Records steps instead of executing them.
#[derive(Debug, Default)]
struct DryRun {
  steps: Vec<DispatchStep>,
}

impl Dispatcher for DryRun {
  fn dispatch(&mut self, step: &DispatchStep) -> Result<(), DispatchError> {
    debug!(step = %step, "dry run");
    self.steps.push(step.clone());
    Ok(())
  }
}

pub fn cmd_plan(preset: Option<&Path>, products: &[String], verbose: bool, format: OutputFormat) -> Result<()> {
  let mut config = super::load_preset(preset)?;
  if !products.is_empty() {
    config.products = products.to_vec();
  }

  let registry = config.product_registry().context("Failed to build product registry")?;
  let variants = config.build_variants();
  let build = plan(&registry, &config.products, &config.flags, &variants).context("Failed to plan build")?;

  let mut dry_run = DryRun::default();
  let report = run(&build, &registry, &config.flags, &mut dry_run);
  debug!(dispatched = report.dispatched.len(), "dry run complete");

  if format.is_json() {
    return print_json(&json!({
      "build_subdir": build.build_subdir,
      "schedule": build.schedule.phases(),
      "hosts": build.hosts,
      "steps": dry_run.steps,
    }));
  }

  if config.products.is_empty() {
    print_warning("No products selected; nothing to do.");
    return Ok(());
  }

  print_stat("Build directory", &build.build_subdir);
  print_stat(
    "Hosts",
    &format_list(&build.hosts.iter().map(|h| h.target.name()).collect::<Vec<_>>()),
  );
  println!();

  for (index, phase) in build.schedule.phases().iter().enumerate() {
    print_info(&format!("Phase {}: {}", index + 1, format_list(phase)));
  }
  println!();

  for step in &dry_run.steps {
    print_step(&step.to_string());
    if verbose {
      for target in &step.targets {
        println!("      {}", target);
      }
    }
  }

  println!();
  print_success(&format!("{} steps across {} phases", dry_run.steps.len(), build.schedule.len()));

  Ok(())
}
