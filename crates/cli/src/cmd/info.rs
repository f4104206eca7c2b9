use anyhow::Result;
use serde_json::json;

use buildplan_lib::platform::DeploymentTarget;
use buildplan_lib::product::ProductRegistry;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_warning};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let host = DeploymentTarget::current();
  let registry = ProductRegistry::builtin();

  if format.is_json() {
    return print_json(&json!({
      "version": env!("CARGO_PKG_VERSION"),
      "host_target": host.map(|t| t.name()),
      "sdk": host.map(|t| t.sdk().to_string()),
      "builtin_products": registry.len(),
    }));
  }

  print_info(&format!("buildplan v{}", env!("CARGO_PKG_VERSION")));
  match host {
    Some(target) => {
      print_stat("Host target", &target.name());
      print_stat("SDK", target.sdk().as_str());
    }
    None => print_warning("Could not detect a known deployment target for this machine."),
  }
  print_stat("Built-in products", &registry.len().to_string());

  Ok(())
}
