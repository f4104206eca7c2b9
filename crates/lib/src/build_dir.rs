//! Build directory naming.
//!
//! Every build configuration gets its own working directory under the build
//! root. The directory name is derived from the generator, the per-component
//! build variants and assertion settings, coverage and sanitizers, and is
//! short in the common case where all components agree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CMake-style build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildVariant {
  #[default]
  Debug,
  Release,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildVariant {
  pub const ALL: [BuildVariant; 4] = [Self::Debug, Self::Release, Self::RelWithDebInfo, Self::MinSizeRel];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
      Self::RelWithDebInfo => "RelWithDebInfo",
      Self::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildVariant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Build variant and assertion setting of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ComponentVariant {
  pub variant: BuildVariant,
  pub assertions: bool,
}

impl ComponentVariant {
  pub fn new(variant: BuildVariant, assertions: bool) -> Self {
    Self { variant, assertions }
  }

  /// `<Variant>` or `<Variant>Assert`.
  pub fn label(&self) -> String {
    if self.assertions {
      format!("{}Assert", self.variant)
    } else {
      self.variant.to_string()
    }
  }
}

/// Code coverage collection for the core compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoverageMode {
  #[default]
  #[serde(rename = "false")]
  Off,
  #[serde(rename = "true")]
  On,
  #[serde(rename = "not-merged")]
  NotMerged,
}

impl CoverageMode {
  pub fn is_enabled(&self) -> bool {
    !matches!(self, Self::Off)
  }
}

/// Enabled sanitizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sanitizers {
  pub asan: bool,
  pub ubsan: bool,
  pub tsan: bool,
}

/// Inputs of the directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BuildVariantConfig {
  /// Generator name, e.g. "Ninja" or "Unix Makefiles".
  pub generator: String,
  /// The markdown library, standing for the meta component.
  pub cmark: ComponentVariant,
  pub toolchain: ComponentVariant,
  /// The core compiler.
  pub language: ComponentVariant,
  pub stdlib: ComponentVariant,
  pub coverage: CoverageMode,
  pub sanitizers: Sanitizers,
  /// Used verbatim instead of the computed label when set.
  pub build_subdir: Option<String>,
}

impl Default for BuildVariantConfig {
  fn default() -> Self {
    Self::uniform("Ninja", ComponentVariant::default())
  }
}

impl BuildVariantConfig {
  /// Every component built the same way, no coverage or sanitizers.
  pub fn uniform(generator: impl Into<String>, component: ComponentVariant) -> Self {
    Self {
      generator: generator.into(),
      cmark: component,
      toolchain: component,
      language: component,
      stdlib: component,
      coverage: CoverageMode::Off,
      sanitizers: Sanitizers::default(),
      build_subdir: None,
    }
  }
}

/// Compute the directory label for `config`, ignoring any override.
///
/// The label starts from the generator (spaces removed, lowercased). When all
/// components agree it is followed by `-<label>`; when a single component
/// besides the compiler differs, by the toolchain label and that component;
/// otherwise every component is listed. Sanitizers are appended last.
///
/// Distinct configurations always give distinct labels.
pub fn compute_label(config: &BuildVariantConfig) -> String {
  let mut label: String = config
    .generator
    .chars()
    .filter(|c| *c != ' ')
    .flat_map(char::to_lowercase)
    .collect();

  let cmark = config.cmark.label();
  let toolchain = config.toolchain.label();
  let mut language = config.language.label();
  if config.coverage.is_enabled() {
    language.push_str("Coverage");
  }
  let stdlib = config.stdlib.label();

  let language_agrees = language == stdlib && language == cmark;
  if toolchain == language && language_agrees {
    label.push('-');
    label.push_str(&toolchain);
  } else if toolchain != language && language_agrees {
    label.push_str(&format!("-{}+language-{}", toolchain, language));
  } else if toolchain == language && toolchain == cmark && toolchain != stdlib {
    label.push_str(&format!("-{}+stdlib-{}", toolchain, stdlib));
  } else if toolchain == language && toolchain == stdlib && toolchain != cmark {
    label.push_str(&format!("-{}+cmark-{}", toolchain, cmark));
  } else {
    label.push_str(&format!(
      "+cmark-{}+toolchain-{}+language-{}+stdlib-{}",
      cmark, toolchain, language, stdlib
    ));
  }

  let sanitizers = &config.sanitizers;
  for (enabled, suffix) in [(sanitizers.asan, "+asan"), (sanitizers.ubsan, "+ubsan"), (sanitizers.tsan, "+tsan")] {
    if enabled {
      label.push_str(suffix);
    }
  }

  label
}

/// The working directory name: the override when set, otherwise
/// [`compute_label`].
pub fn build_subdir(config: &BuildVariantConfig) -> String {
  match &config.build_subdir {
    Some(subdir) => subdir.clone(),
    None => compute_label(config),
  }
}
