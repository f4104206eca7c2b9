//! Toolchain products and their declarations.
//!
//! A [`Product`] is a buildable component of the toolchain (compiler, stdlib,
//! package manager, ...) with an ordered list of immediate dependencies and a
//! few classification flags. Products are declared once, validated as a graph
//! by [`ProductRegistry`], and never mutated afterwards.

pub mod actions;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use actions::{ActionContext, ProductActions};
pub use registry::{GraphError, ProductRegistry};

/// Classification flags that change how a product is scheduled or dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductFlags {
  /// Scheduled strictly before every product that is not also pre-ordered.
  pub pre_dependency_ordered: bool,
  /// Built by one coarse external step together with the other orchestrated
  /// products of its phase.
  pub externally_orchestrated: bool,
  /// Left out when every product is installed.
  pub ignores_install_all: bool,
  /// Not built on Darwin hosts, which ship these libraries with the OS.
  pub host_platform_restricted: bool,
}

impl ProductFlags {
  const NONE: Self = Self {
    pre_dependency_ordered: false,
    externally_orchestrated: false,
    ignores_install_all: false,
    host_platform_restricted: false,
  };
}

/// Per-product behaviour. Every known product has its own variant;
/// products declared by an external registry under other names are `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
  EarlyLanguageDriver,
  Cmark,
  Llvm,
  Libcxx,
  Libicu,
  Language,
  Lldb,
  Libdispatch,
  Foundation,
  Xctest,
  Llbuild,
  LanguagePm,
  LanguageSyntax,
  LanguageDriver,
  IndexStoreDb,
  SourceKitLsp,
  LanguageFormat,
  LanguageDocc,
  Benchmarks,
  MinimalStdlib,
  Generic,
}

impl ProductKind {
  const KNOWN: [ProductKind; 20] = [
    Self::EarlyLanguageDriver,
    Self::Cmark,
    Self::Llvm,
    Self::Libcxx,
    Self::Libicu,
    Self::Language,
    Self::Lldb,
    Self::Libdispatch,
    Self::Foundation,
    Self::Xctest,
    Self::Llbuild,
    Self::LanguagePm,
    Self::LanguageSyntax,
    Self::LanguageDriver,
    Self::IndexStoreDb,
    Self::SourceKitLsp,
    Self::LanguageFormat,
    Self::LanguageDocc,
    Self::Benchmarks,
    Self::MinimalStdlib,
  ];

  /// The kind a product name maps to, `Generic` when the name is not known.
  pub fn for_name(name: &str) -> Self {
    Self::KNOWN
      .into_iter()
      .find(|kind| kind.as_str() == name)
      .unwrap_or(Self::Generic)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::EarlyLanguageDriver => "earlylanguagedriver",
      Self::Cmark => "cmark",
      Self::Llvm => "llvm",
      Self::Libcxx => "libcxx",
      Self::Libicu => "libicu",
      Self::Language => "language",
      Self::Lldb => "lldb",
      Self::Libdispatch => "libdispatch",
      Self::Foundation => "foundation",
      Self::Xctest => "xctest",
      Self::Llbuild => "llbuild",
      Self::LanguagePm => "languagepm",
      Self::LanguageSyntax => "languagesyntax",
      Self::LanguageDriver => "languagedriver",
      Self::IndexStoreDb => "indexstoredb",
      Self::SourceKitLsp => "sourcekitlsp",
      Self::LanguageFormat => "languageformat",
      Self::LanguageDocc => "languagedocc",
      Self::Benchmarks => "benchmarks",
      Self::MinimalStdlib => "minimalstdlib",
      Self::Generic => "generic",
    }
  }
}

impl fmt::Display for ProductKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Plain product declaration, as handed over by a registry loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRecord {
  pub name: String,
  #[serde(default)]
  pub dependencies: Vec<String>,
  #[serde(default)]
  pub flags: ProductFlags,
  /// Defaults to the kind matching `name`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<ProductKind>,
}

impl ProductRecord {
  pub fn new(name: impl Into<String>, dependencies: &[&str]) -> Self {
    Self {
      name: name.into(),
      dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
      flags: ProductFlags::default(),
      kind: None,
    }
  }

  pub fn with_flags(mut self, flags: ProductFlags) -> Self {
    self.flags = flags;
    self
  }
}

/// A validated product declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
  pub name: String,
  pub dependencies: Vec<String>,
  pub flags: ProductFlags,
  pub kind: ProductKind,
}

impl From<ProductRecord> for Product {
  fn from(record: ProductRecord) -> Self {
    let kind = record.kind.unwrap_or_else(|| ProductKind::for_name(&record.name));
    Self {
      name: record.name,
      dependencies: record.dependencies,
      flags: record.flags,
      kind,
    }
  }
}

/// Declarations of the default toolchain, in declaration order.
pub fn builtin_records() -> Vec<ProductRecord> {
  let pre_ordered = ProductFlags {
    pre_dependency_ordered: true,
    ..ProductFlags::NONE
  };
  let orchestrated = ProductFlags {
    externally_orchestrated: true,
    ..ProductFlags::NONE
  };
  let restricted = ProductFlags {
    externally_orchestrated: true,
    host_platform_restricted: true,
    ..ProductFlags::NONE
  };
  let no_install_all = ProductFlags {
    ignores_install_all: true,
    ..ProductFlags::NONE
  };

  vec![
    ProductRecord::new("earlylanguagedriver", &[]).with_flags(ProductFlags {
      ignores_install_all: true,
      ..pre_ordered
    }),
    ProductRecord::new("cmark", &[]).with_flags(pre_ordered),
    ProductRecord::new("llvm", &["cmark"]).with_flags(orchestrated),
    ProductRecord::new("libcxx", &["cmark", "llvm"]),
    ProductRecord::new("libicu", &["cmark", "llvm", "libcxx"]).with_flags(restricted),
    ProductRecord::new("language", &["cmark", "earlylanguagedriver", "llvm", "libcxx"]).with_flags(orchestrated),
    ProductRecord::new("lldb", &["cmark", "llvm", "libcxx", "language"]).with_flags(orchestrated),
    ProductRecord::new("libdispatch", &["cmark", "llvm", "language"]).with_flags(restricted),
    ProductRecord::new("foundation", &["cmark", "llvm", "language", "libdispatch", "libicu"]).with_flags(restricted),
    ProductRecord::new("xctest", &["cmark", "llvm", "language", "libdispatch", "foundation"]).with_flags(restricted),
    ProductRecord::new("llbuild", &["cmark", "llvm", "language"]).with_flags(orchestrated),
    ProductRecord::new("languagepm", &["cmark", "llvm", "language", "llbuild", "foundation", "xctest"]),
    ProductRecord::new("languagesyntax", &["cmark", "llvm", "language", "languagepm"]),
    ProductRecord::new("languagedriver", &["llvm", "language", "llbuild"]),
    ProductRecord::new("indexstoredb", &["cmark", "llvm", "language", "languagepm"]),
    ProductRecord::new("sourcekitlsp", &["cmark", "llvm", "language", "languagepm", "indexstoredb", "languagesyntax"]),
    ProductRecord::new("languageformat", &["cmark", "llvm", "language", "languagepm", "languagesyntax"]),
    ProductRecord::new("languagedocc", &["cmark", "llvm", "language", "languagepm"]),
    ProductRecord::new("benchmarks", &["cmark", "llvm", "language", "languagepm"]).with_flags(no_install_all),
    ProductRecord::new("minimalstdlib", &["cmark", "llvm", "language"]).with_flags(no_install_all),
  ]
}
