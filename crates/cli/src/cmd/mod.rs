mod build_dir;
mod info;
mod plan;
mod products;
mod targets;

use std::path::Path;

use anyhow::{Context, Result};
use buildplan_lib::config::BuildConfig;

pub use build_dir::cmd_build_dir;
pub use info::cmd_info;
pub use plan::cmd_plan;
pub use products::cmd_products;
pub use targets::cmd_targets;

/// Load the preset at `path`, or an empty preset for the detected host.
fn load_preset(path: Option<&Path>) -> Result<BuildConfig> {
  match path {
    Some(path) => BuildConfig::load(path).with_context(|| format!("Failed to load preset: {}", path.display())),
    None => BuildConfig::from_json("{}").context("Failed to create default preset"),
  }
}
