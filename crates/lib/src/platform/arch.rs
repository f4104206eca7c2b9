use std::fmt;
use std::str::FromStr;

/// CPU architectures that appear in deployment target names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
  X86_64,
  I386,
  I686,
  Arm64,
  Arm64e,
  Arm64_32,
  Aarch64,
  Armv6,
  Armv7,
  Armv7s,
  Armv7k,
  Powerpc64,
  Powerpc64le,
  S390x,
  Riscv64,
  Wasm32,
}

impl Arch {
  /// Detect the current CPU architecture at runtime.
  ///
  /// Darwin spells 64-bit ARM as `arm64`, everything else as `aarch64`, so the
  /// raw `std::env::consts::ARCH` value alone is not enough to name a target.
  pub fn current() -> Option<Self> {
    match (std::env::consts::ARCH, std::env::consts::OS) {
      ("x86_64", _) => Some(Self::X86_64),
      ("x86", _) => Some(Self::I686),
      ("aarch64", "macos" | "ios") => Some(Self::Arm64),
      ("aarch64", _) => Some(Self::Aarch64),
      ("arm", _) => Some(Self::Armv7),
      ("powerpc64", _) => Some(Self::Powerpc64),
      ("s390x", _) => Some(Self::S390x),
      ("riscv64", _) => Some(Self::Riscv64),
      ("wasm32", _) => Some(Self::Wasm32),
      _ => None,
    }
  }

  /// Returns the identifier used inside target names.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::I386 => "i386",
      Self::I686 => "i686",
      Self::Arm64 => "arm64",
      Self::Arm64e => "arm64e",
      Self::Arm64_32 => "arm64_32",
      Self::Aarch64 => "aarch64",
      Self::Armv6 => "armv6",
      Self::Armv7 => "armv7",
      Self::Armv7s => "armv7s",
      Self::Armv7k => "armv7k",
      Self::Powerpc64 => "powerpc64",
      Self::Powerpc64le => "powerpc64le",
      Self::S390x => "s390x",
      Self::Riscv64 => "riscv64",
      Self::Wasm32 => "wasm32",
    }
  }
}

impl FromStr for Arch {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let arch = match s {
      "x86_64" => Self::X86_64,
      "i386" => Self::I386,
      "i686" => Self::I686,
      "arm64" => Self::Arm64,
      "arm64e" => Self::Arm64e,
      "arm64_32" => Self::Arm64_32,
      "aarch64" => Self::Aarch64,
      "armv6" => Self::Armv6,
      "armv7" => Self::Armv7,
      "armv7s" => Self::Armv7s,
      "armv7k" => Self::Armv7k,
      "powerpc64" => Self::Powerpc64,
      "powerpc64le" => Self::Powerpc64le,
      "s390x" => Self::S390x,
      "riscv64" => Self::Riscv64,
      "wasm32" => Self::Wasm32,
      _ => return Err(()),
    };
    Ok(arch)
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
