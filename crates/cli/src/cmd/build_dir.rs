//! Implementation of the `buildplan build-dir` command.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use buildplan_lib::build_dir::{build_subdir, compute_label};

use crate::output::{OutputFormat, print_json};

pub fn cmd_build_dir(preset: Option<&Path>, format: OutputFormat) -> Result<()> {
  let config = super::load_preset(preset)?;
  let variants = config.build_variants();
  let subdir = build_subdir(&variants);

  if format.is_json() {
    return print_json(&json!({
      "build_subdir": subdir,
      "label": compute_label(&variants),
      "variants": variants,
    }));
  }

  println!("{}", subdir);
  Ok(())
}
