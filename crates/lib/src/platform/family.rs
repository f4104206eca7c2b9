use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::arch::Arch;
use crate::host::GlobalFlags;

/// SDK categories used when configuring the toolchain.
///
/// One category may cover several deployment targets (every architecture of a
/// platform family shares the family's SDK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SdkCategory {
  Osx,
  Ios,
  IosSimulator,
  Tvos,
  TvosSimulator,
  Watchos,
  WatchosSimulator,
  Linux,
  Freebsd,
  Cygwin,
  Android,
  Wasi,
}

impl SdkCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Osx => "OSX",
      Self::Ios => "IOS",
      Self::IosSimulator => "IOS_SIMULATOR",
      Self::Tvos => "TVOS",
      Self::TvosSimulator => "TVOS_SIMULATOR",
      Self::Watchos => "WATCHOS",
      Self::WatchosSimulator => "WATCHOS_SIMULATOR",
      Self::Linux => "LINUX",
      Self::Freebsd => "FREEBSD",
      Self::Cygwin => "CYGWIN",
      Self::Android => "ANDROID",
      Self::Wasi => "WASI",
    }
  }
}

impl fmt::Display for SdkCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Platform families a standard library can be deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformFamily {
  MacOsx,
  IphoneOs,
  IphoneSimulator,
  AppleTvOs,
  AppleTvSimulator,
  WatchOs,
  WatchSimulator,
  Linux,
  FreeBsd,
  Cygwin,
  Android,
  Wasi,
}

impl PlatformFamily {
  /// Every family, in catalogue order.
  pub const ALL: [PlatformFamily; 12] = [
    Self::MacOsx,
    Self::IphoneOs,
    Self::IphoneSimulator,
    Self::AppleTvOs,
    Self::AppleTvSimulator,
    Self::WatchOs,
    Self::WatchSimulator,
    Self::Linux,
    Self::FreeBsd,
    Self::Cygwin,
    Self::Android,
    Self::Wasi,
  ];

  /// Detect the family of the machine we are running on.
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "macos" => Some(Self::MacOsx),
      "linux" => Some(Self::Linux),
      "freebsd" => Some(Self::FreeBsd),
      "android" => Some(Self::Android),
      _ => None,
    }
  }

  /// Returns the prefix used in deployment target names.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::MacOsx => "macosx",
      Self::IphoneOs => "iphoneos",
      Self::IphoneSimulator => "iphonesimulator",
      Self::AppleTvOs => "appletvos",
      Self::AppleTvSimulator => "appletvsimulator",
      Self::WatchOs => "watchos",
      Self::WatchSimulator => "watchsimulator",
      Self::Linux => "linux",
      Self::FreeBsd => "freebsd",
      Self::Cygwin => "cygwin",
      Self::Android => "android",
      Self::Wasi => "wasi",
    }
  }

  pub fn sdk(&self) -> SdkCategory {
    match self {
      Self::MacOsx => SdkCategory::Osx,
      Self::IphoneOs => SdkCategory::Ios,
      Self::IphoneSimulator => SdkCategory::IosSimulator,
      Self::AppleTvOs => SdkCategory::Tvos,
      Self::AppleTvSimulator => SdkCategory::TvosSimulator,
      Self::WatchOs => SdkCategory::Watchos,
      Self::WatchSimulator => SdkCategory::WatchosSimulator,
      Self::Linux => SdkCategory::Linux,
      Self::FreeBsd => SdkCategory::Freebsd,
      Self::Cygwin => SdkCategory::Cygwin,
      Self::Android => SdkCategory::Android,
      Self::Wasi => SdkCategory::Wasi,
    }
  }

  /// Architectures the family can be deployed to.
  pub fn archs(&self) -> &'static [Arch] {
    use Arch::*;
    match self {
      Self::MacOsx => &[X86_64, Arm64, Arm64e],
      Self::IphoneOs => &[Armv7, Armv7s, Arm64, Arm64e],
      Self::IphoneSimulator | Self::WatchSimulator => &[I386, X86_64, Arm64],
      Self::AppleTvOs => &[Arm64],
      Self::AppleTvSimulator => &[X86_64, Arm64],
      Self::WatchOs => &[Armv7k, Arm64_32],
      Self::Linux => &[
        X86_64,
        I686,
        Armv6,
        Armv7,
        Aarch64,
        Powerpc64,
        Powerpc64le,
        S390x,
        Riscv64,
      ],
      Self::FreeBsd => &[X86_64, Aarch64],
      Self::Cygwin => &[X86_64],
      Self::Android => &[Armv7, Aarch64, X86_64],
      Self::Wasi => &[Wasm32],
    }
  }

  pub fn is_darwin(&self) -> bool {
    matches!(
      self,
      Self::MacOsx
        | Self::IphoneOs
        | Self::IphoneSimulator
        | Self::AppleTvOs
        | Self::AppleTvSimulator
        | Self::WatchOs
        | Self::WatchSimulator
    )
  }

  pub fn is_simulator(&self) -> bool {
    matches!(
      self,
      Self::IphoneSimulator | Self::AppleTvSimulator | Self::WatchSimulator
    )
  }

  /// Whether tests for this family can run in "host-only" mode, executing only
  /// the checks that do not need the device or an emulator.
  pub fn supports_host_tests(&self) -> bool {
    matches!(self, Self::Android)
  }

  /// Benchmarks run on real Darwin hardware only.
  pub fn supports_benchmark(&self) -> bool {
    self.is_darwin() && !self.is_simulator()
  }

  /// Whether the "build this platform" flag for the family is enabled.
  pub fn build_enabled(&self, flags: &GlobalFlags) -> bool {
    match self {
      Self::MacOsx => flags.build_osx,
      Self::IphoneOs => flags.build_ios_device,
      Self::IphoneSimulator => flags.build_ios_simulator,
      Self::AppleTvOs => flags.build_tvos_device,
      Self::AppleTvSimulator => flags.build_tvos_simulator,
      Self::WatchOs => flags.build_watchos_device,
      Self::WatchSimulator => flags.build_watchos_simulator,
      Self::Linux => flags.build_linux,
      Self::FreeBsd => flags.build_freebsd,
      Self::Cygwin => flags.build_cygwin,
      Self::Android => flags.build_android,
      Self::Wasi => flags.build_wasm,
    }
  }

  /// Whether the family's test flag is enabled.
  ///
  /// Device families have no executable test mode, so they are never tested.
  pub fn test_enabled(&self, flags: &GlobalFlags) -> bool {
    match self {
      Self::MacOsx => flags.test_osx,
      Self::IphoneSimulator => flags.test_ios_simulator,
      Self::AppleTvSimulator => flags.test_tvos_simulator,
      Self::WatchSimulator => flags.test_watchos_simulator,
      Self::Linux => flags.test_linux,
      Self::FreeBsd => flags.test_freebsd,
      Self::Cygwin => flags.test_cygwin,
      Self::Android => flags.test_android,
      Self::Wasi => flags.test_wasm,
      Self::IphoneOs | Self::AppleTvOs | Self::WatchOs => false,
    }
  }

  /// Whether a host-only test run was requested for the family.
  pub fn host_test_requested(&self, flags: &GlobalFlags) -> bool {
    match self {
      Self::Android => flags.test_android_host,
      Self::IphoneOs => flags.test_ios_host,
      Self::AppleTvOs => flags.test_tvos_host,
      Self::WatchOs => flags.test_watchos_host,
      _ => false,
    }
  }
}

impl FromStr for PlatformFamily {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL.into_iter().find(|family| family.as_str() == s).ok_or(())
  }
}

impl fmt::Display for PlatformFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
