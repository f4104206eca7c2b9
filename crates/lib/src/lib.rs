//! buildplan-lib: Planning core for multi-component toolchain builds
//!
//! This crate provides the pieces a build driver needs before it runs any
//! external tool:
//! - `ProductRegistry`: validated product declarations and their dependency graph
//! - `schedule`: ordered build phases for a product selection
//! - `host::resolve`: SDKs, stdlib, test and benchmark targets per host
//! - `build_dir`: collision-free build directory names
//! - `driver`: dispatching scheduled products through a `Dispatcher`

pub mod build_dir;
pub mod config;
pub mod driver;
pub mod host;
pub mod platform;
pub mod product;
pub mod schedule;
pub mod util;

pub use build_dir::{BuildVariantConfig, build_subdir, compute_label};
pub use config::{BuildConfig, ConfigError};
pub use driver::{BuildPlan, DispatchError, DispatchReport, DispatchStep, Dispatcher, PlanError, plan, run};
pub use host::{GlobalFlags, HostConfigCache, HostSpecificConfiguration, resolve, resolve_all_hosts};
pub use platform::{DeploymentTarget, TargetError};
pub use product::{GraphError, Product, ProductRegistry};
pub use schedule::{Schedule, schedule};
