//! Implementation of the `buildplan products` command.

use std::path::Path;

use anyhow::{Context, Result};

use buildplan_lib::product::Product;

use crate::output::{OutputFormat, format_list, print_json, symbols};

pub fn cmd_products(preset: Option<&Path>, verbose: bool, format: OutputFormat) -> Result<()> {
  let config = super::load_preset(preset)?;
  let registry = config.product_registry().context("Failed to build product registry")?;

  if format.is_json() {
    return print_json(&registry.products());
  }

  println!("Products ({}):", registry.len());
  for product in registry.products() {
    let tags = tags(product);
    if tags.is_empty() {
      println!("  {} {}", symbols::INFO, product.name);
    } else {
      println!("  {} {} [{}]", symbols::INFO, product.name, tags.join(", "));
    }
    if verbose {
      println!("      depends on: {}", format_list(&product.dependencies));
    }
  }

  Ok(())
}

fn tags(product: &Product) -> Vec<&'static str> {
  let flags = &product.flags;
  [
    (flags.pre_dependency_ordered, "pre-ordered"),
    (flags.externally_orchestrated, "orchestrated"),
    (flags.ignores_install_all, "no-install-all"),
    (flags.host_platform_restricted, "host-restricted"),
  ]
  .into_iter()
  .filter_map(|(set, tag)| set.then_some(tag))
  .collect()
}
