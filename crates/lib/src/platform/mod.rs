//! Deployment targets and the platform catalogue.
//!
//! A [`DeploymentTarget`] is a `(platform family, architecture)` pair written
//! as `family-arch`, e.g. `macosx-x86_64` or `android-armv7`. The family
//! decides which [`SdkCategory`] the target is configured with.

pub mod arch;
pub mod family;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arch::Arch;
pub use family::{PlatformFamily, SdkCategory};

/// Errors raised while naming or resolving deployment targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
  /// The name does not match any target in the platform catalogue.
  #[error("unknown target: {0}")]
  UnknownTarget(String),

  /// The platform family part of a target name is not recognized.
  #[error("unknown platform family '{family}' in target {target}")]
  UnknownPlatform { family: String, target: String },

  /// A host-only test run was requested for a family that cannot do one.
  #[error("host-only tests are not supported for platform {platform}")]
  UnsupportedHostTestMode { platform: String },

  /// The build allowlist names a target that was never declared.
  #[error("deployment target allowlist entry '{0}' is not a declared stdlib deployment target")]
  InvalidAllowlistEntry(String),
}

/// A platform family and architecture a standard library can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentTarget {
  pub family: PlatformFamily,
  pub arch: Arch,
}

impl DeploymentTarget {
  /// Create a target, checking that the family can be deployed to `arch`.
  pub fn new(family: PlatformFamily, arch: Arch) -> Result<Self, TargetError> {
    if !family.archs().contains(&arch) {
      return Err(TargetError::UnknownTarget(format!("{}-{}", family, arch)));
    }
    Ok(Self { family, arch })
  }

  /// Detect the deployment target of the machine we are running on.
  ///
  /// Returns `None` if the OS or architecture has no entry in the catalogue.
  pub fn current() -> Option<Self> {
    Self::new(PlatformFamily::current()?, Arch::current()?).ok()
  }

  /// Returns the target name (e.g., "macosx-x86_64").
  pub fn name(&self) -> String {
    format!("{}-{}", self.family, self.arch)
  }

  pub fn sdk(&self) -> SdkCategory {
    self.family.sdk()
  }

  /// Every target in the catalogue, family by family.
  pub fn all() -> impl Iterator<Item = DeploymentTarget> {
    PlatformFamily::ALL
      .into_iter()
      .flat_map(|family| family.archs().iter().map(move |&arch| DeploymentTarget { family, arch }))
  }
}

impl FromStr for DeploymentTarget {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let Some((family, arch)) = s.split_once('-') else {
      return Err(TargetError::UnknownTarget(s.to_string()));
    };

    let family = family.parse::<PlatformFamily>().map_err(|_| TargetError::UnknownPlatform {
      family: family.to_string(),
      target: s.to_string(),
    })?;
    let arch = arch
      .parse::<Arch>()
      .map_err(|_| TargetError::UnknownTarget(s.to_string()))?;

    Self::new(family, arch)
  }
}

impl TryFrom<String> for DeploymentTarget {
  type Error = TargetError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<DeploymentTarget> for String {
  fn from(target: DeploymentTarget) -> Self {
    target.name()
  }
}

impl fmt::Display for DeploymentTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Returns the name of the deployment target for the current machine.
///
/// Returns `None` if the current platform is not in the catalogue.
pub fn host_target_name() -> Option<String> {
  DeploymentTarget::current().map(|t| t.name())
}
