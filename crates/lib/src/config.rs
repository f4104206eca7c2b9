//! JSON build presets.
//!
//! A preset selects products, sets [`GlobalFlags`] and describes the build
//! variants. Every field is optional:
//!
//! ```json
//! {
//!   "products": ["languagepm"],
//!   "flags": { "host_target": "macosx-x86_64", "build_osx": true },
//!   "variants": { "build_variant": "Release", "assertions": true }
//! }
//! ```
//!
//! An empty `host_target` is replaced by the detected machine target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::build_dir::{BuildVariant, BuildVariantConfig, ComponentVariant, CoverageMode, Sanitizers};
use crate::host::GlobalFlags;
use crate::platform::host_target_name;
use crate::product::{GraphError, ProductRecord, ProductRegistry};

/// Errors that can occur while loading a preset.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid preset: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid product registry: {0}")]
  Graph(#[from] GraphError),

  #[error("no host_target given and the current machine is not a known deployment target")]
  NoHostTarget,
}

/// Build variant settings as written in a preset.
///
/// Per-component values fall back to `build_variant` and `assertions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantSettings {
  pub cmake_generator: String,
  pub build_variant: BuildVariant,
  pub assertions: bool,

  pub cmark_build_variant: Option<BuildVariant>,
  pub cmark_assertions: Option<bool>,
  pub toolchain_build_variant: Option<BuildVariant>,
  pub toolchain_assertions: Option<bool>,
  pub language_build_variant: Option<BuildVariant>,
  pub language_assertions: Option<bool>,
  pub language_stdlib_build_variant: Option<BuildVariant>,
  pub language_stdlib_assertions: Option<bool>,

  pub language_analyze_code_coverage: CoverageMode,
  pub enable_asan: bool,
  pub enable_ubsan: bool,
  pub enable_tsan: bool,

  /// Overrides the computed build directory name.
  pub build_subdir: Option<String>,
}

impl Default for VariantSettings {
  fn default() -> Self {
    Self {
      cmake_generator: "Ninja".to_string(),
      build_variant: BuildVariant::Debug,
      assertions: false,
      cmark_build_variant: None,
      cmark_assertions: None,
      toolchain_build_variant: None,
      toolchain_assertions: None,
      language_build_variant: None,
      language_assertions: None,
      language_stdlib_build_variant: None,
      language_stdlib_assertions: None,
      language_analyze_code_coverage: CoverageMode::Off,
      enable_asan: false,
      enable_ubsan: false,
      enable_tsan: false,
      build_subdir: None,
    }
  }
}

impl VariantSettings {
  fn component(&self, variant: Option<BuildVariant>, assertions: Option<bool>) -> ComponentVariant {
    ComponentVariant::new(
      variant.unwrap_or(self.build_variant),
      assertions.unwrap_or(self.assertions),
    )
  }

  /// Resolve the per-component fallbacks.
  pub fn to_config(&self) -> BuildVariantConfig {
    BuildVariantConfig {
      generator: self.cmake_generator.clone(),
      cmark: self.component(self.cmark_build_variant, self.cmark_assertions),
      toolchain: self.component(self.toolchain_build_variant, self.toolchain_assertions),
      language: self.component(self.language_build_variant, self.language_assertions),
      stdlib: self.component(self.language_stdlib_build_variant, self.language_stdlib_assertions),
      coverage: self.language_analyze_code_coverage,
      sanitizers: Sanitizers {
        asan: self.enable_asan,
        ubsan: self.enable_ubsan,
        tsan: self.enable_tsan,
      },
      build_subdir: self.build_subdir.clone(),
    }
  }
}

/// A complete build preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
  /// Products to build; their dependencies are added automatically.
  pub products: Vec<String>,
  /// Custom product declarations replacing the built-in registry.
  pub registry: Option<Vec<ProductRecord>>,
  pub flags: GlobalFlags,
  pub variants: VariantSettings,
}

impl BuildConfig {
  /// Load a preset from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loading preset");
    Self::from_json(&content)
  }

  /// Parse a preset and fill in the detected host target when none is given.
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let mut config: BuildConfig = serde_json::from_str(json)?;
    if config.flags.host_target.is_empty() {
      config.flags.host_target = host_target_name().ok_or(ConfigError::NoHostTarget)?;
      debug!(host_target = %config.flags.host_target, "using detected host target");
    }
    Ok(config)
  }

  /// The preset's registry, or the built-in one.
  pub fn product_registry(&self) -> Result<ProductRegistry, ConfigError> {
    match &self.registry {
      Some(records) => Ok(ProductRegistry::from_records(records.clone())?),
      None => Ok(ProductRegistry::builtin()),
    }
  }

  pub fn build_variants(&self) -> BuildVariantConfig {
    self.variants.to_config()
  }
}
