//! Types for dispatching scheduled products.
//!
//! This module defines the dispatch steps handed to a [`super::Dispatcher`],
//! the errors a dispatcher or the planner can report, and the report of a
//! dispatch run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::platform::{DeploymentTarget, TargetError};
use crate::product::GraphError;

/// The action a step asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchAction {
  Build,
  Test,
  Install,
}

impl DispatchAction {
  /// Actions in the order they run for one product.
  pub const ALL: [DispatchAction; 3] = [Self::Build, Self::Test, Self::Install];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Build => "build",
      Self::Test => "test",
      Self::Install => "install",
    }
  }
}

impl fmt::Display for DispatchAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// What a step acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "products")]
pub enum DispatchUnit {
  /// One individually invoked product.
  Product(String),
  /// The externally orchestrated products of one phase, built by a single
  /// coarse step.
  Orchestrated(Vec<String>),
}

impl DispatchUnit {
  /// Names of the products the step covers.
  pub fn products(&self) -> &[String] {
    match self {
      Self::Product(name) => std::slice::from_ref(name),
      Self::Orchestrated(names) => names,
    }
  }
}

impl fmt::Display for DispatchUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Product(name) => write!(f, "{}", name),
      Self::Orchestrated(names) => write!(f, "[{}]", names.join(", ")),
    }
  }
}

/// One opaque build, test or install request for the external build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchStep {
  pub unit: DispatchUnit,
  pub host: DeploymentTarget,
  pub action: DispatchAction,
  /// Concrete build-tool targets, empty when the product builds its defaults.
  pub targets: Vec<String>,
}

impl fmt::Display for DispatchStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} on {}", self.action, self.unit, self.host)?;
    if !self.targets.is_empty() {
      write!(f, " ({} targets)", self.targets.len())?;
    }
    Ok(())
  }
}

/// Errors a dispatcher reports for a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
  /// The step's host or targets could not be resolved.
  #[error("target error: {0}")]
  Target(#[from] TargetError),

  /// The external build tool refused or failed the step.
  #[error("{step} failed: {reason}")]
  Rejected { step: String, reason: String },
}

impl DispatchError {
  pub fn rejected(step: &DispatchStep, reason: impl Into<String>) -> Self {
    Self::Rejected {
      step: step.to_string(),
      reason: reason.into(),
    }
  }
}

/// Errors raised while planning, before anything is dispatched.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error(transparent)]
  Target(#[from] TargetError),
}

/// Outcome of dispatching a plan.
///
/// A product whose step fails is recorded in `failed`; products that depend on
/// it, directly or transitively, are recorded in `skipped` together with the
/// failed dependency.
#[derive(Debug, Default)]
pub struct DispatchReport {
  /// Steps handed to the dispatcher that succeeded, in dispatch order.
  pub dispatched: Vec<DispatchStep>,

  /// Products whose step failed, with the error.
  pub failed: Vec<(String, DispatchError)>,

  /// Products not dispatched, with the failed dependency that blocked them.
  pub skipped: Vec<(String, String)>,
}

impl DispatchReport {
  /// Returns true if nothing failed or was skipped.
  pub fn is_success(&self) -> bool {
    self.failed.is_empty() && self.skipped.is_empty()
  }

  pub fn is_failed(&self, product: &str) -> bool {
    self.failed.iter().any(|(name, _)| name == product)
  }

  pub fn is_skipped(&self, product: &str) -> bool {
    self.skipped.iter().any(|(name, _)| name == product)
  }

  /// Returns the failure that blocks `product`, if any: the product itself
  /// when it failed, or the dependency it was skipped for.
  pub(crate) fn blocker(&self, product: &str) -> Option<&str> {
    self
      .failed
      .iter()
      .find(|(name, _)| name == product)
      .map(|(name, _)| name.as_str())
      .or_else(|| {
        self
          .skipped
          .iter()
          .find(|(name, _)| name == product)
          .map(|(_, dependency)| dependency.as_str())
      })
  }
}
