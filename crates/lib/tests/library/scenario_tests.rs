use buildplan_lib::build_dir::{BuildVariantConfig, compute_label};
use buildplan_lib::driver::{DispatchAction, DispatchError, DispatchStep, DispatchUnit, Dispatcher, plan, run};
use buildplan_lib::host::GlobalFlags;
use buildplan_lib::product::{GraphError, ProductRecord, ProductRegistry};
use buildplan_lib::schedule::schedule;

use super::common::{resolve_host, single_target_flags};

/// Collects steps without running anything.
#[derive(Default)]
struct DryRun {
  steps: Vec<DispatchStep>,
}

impl Dispatcher for DryRun {
  fn dispatch(&mut self, step: &DispatchStep) -> Result<(), DispatchError> {
    self.steps.push(step.clone());
    Ok(())
  }
}

#[test]
fn chain_schedules_one_phase_per_product() {
  let registry = ProductRegistry::from_records(vec![
    ProductRecord::new("cmark", &[]),
    ProductRecord::new("llvm", &["cmark"]),
    ProductRecord::new("core", &["llvm"]),
    ProductRecord::new("pm", &["llvm", "core"]),
  ])
  .unwrap();

  let plan = schedule(&registry, &["pm"]).unwrap();
  assert_eq!(plan.phases(), &[vec!["cmark"], vec!["llvm"], vec!["core"], vec!["pm"]]);
}

#[test]
fn cyclic_registry_is_rejected_with_names() {
  let err = ProductRegistry::from_records(vec![
    ProductRecord::new("a", &["c"]),
    ProductRecord::new("b", &["a"]),
    ProductRecord::new("c", &["b"]),
  ])
  .unwrap_err();

  assert_eq!(
    err,
    GraphError::CyclicDependency {
      products: vec!["a".into(), "b".into(), "c".into()]
    }
  );
}

#[test]
fn macos_default_targets() {
  let mut flags = single_target_flags("macosx-x86_64");
  flags.build_osx = true;
  flags.test_osx = true;

  let config = resolve_host(&flags);
  assert_eq!(config.stdlib_build_targets, vec!["language-test-stdlib-macosx-x86_64"]);
  assert_eq!(config.test_run_targets, vec!["check-language-macosx-x86_64"]);

  flags.validation_test = true;
  let config = resolve_host(&flags);
  assert_eq!(config.stdlib_build_targets, vec!["language-stdlib-macosx-x86_64"]);
  assert_eq!(config.test_run_targets, vec!["check-language-validation-macosx-x86_64"]);
}

#[test]
fn android_host_only_has_no_optimize_target() {
  let mut flags = single_target_flags("android-armv7");
  flags.build_android = true;
  flags.test_android = true;
  flags.test_android_host = true;

  let config = resolve_host(&flags);
  assert_eq!(config.test_run_targets, vec!["check-language-only_non_executable-android-armv7"]);

  flags.test_optimized = true;
  assert_eq!(resolve_host(&flags).test_run_targets, config.test_run_targets);
}

#[test]
fn builtin_toolchain_on_linux() {
  let registry = ProductRegistry::builtin();
  let mut flags = GlobalFlags::for_host("linux-x86_64");
  flags.build_linux = true;
  flags.test_linux = true;
  flags.install_all = true;

  let plan = plan(&registry, &["languagepm"], &flags, &BuildVariantConfig::default()).unwrap();
  let mut dispatcher = DryRun::default();
  let report = run(&plan, &registry, &flags, &mut dispatcher);

  assert!(report.is_success());
  assert_eq!(report.dispatched, dispatcher.steps);

  // The pre-ordered products go first and are dispatched one by one.
  assert_eq!(dispatcher.steps[0].unit, DispatchUnit::Product("earlylanguagedriver".into()));
  assert_eq!(dispatcher.steps[1].unit, DispatchUnit::Product("cmark".into()));

  // earlylanguagedriver is excluded from install-all; cmark is not.
  assert!(
    !dispatcher
      .steps
      .iter()
      .any(|s| s.action == DispatchAction::Install && s.unit.products().contains(&"earlylanguagedriver".to_string()))
  );

  let language_test = dispatcher
    .steps
    .iter()
    .find(|s| s.action == DispatchAction::Test && s.unit.products().contains(&"language".to_string()))
    .unwrap();
  assert_eq!(language_test.targets, vec!["check-language-linux-x86_64"]);
  assert!(matches!(language_test.unit, DispatchUnit::Orchestrated(_)));

  // libicu and language share a phase and an orchestrated step.
  let group = dispatcher
    .steps
    .iter()
    .find(|s| s.action == DispatchAction::Build && s.unit.products().contains(&"libicu".to_string()))
    .unwrap();
  assert_eq!(group.unit, DispatchUnit::Orchestrated(vec!["libicu".into(), "language".into()]));
  assert_eq!(group.targets, vec!["language-test-stdlib-linux-x86_64"]);
}

#[test]
fn darwin_host_skips_restricted_products() {
  let registry = ProductRegistry::builtin();
  let mut flags = GlobalFlags::for_host("macosx-arm64");
  flags.build_osx = true;

  let plan = plan(&registry, &["languagepm"], &flags, &BuildVariantConfig::default()).unwrap();
  let steps = plan.steps(&registry, &flags);

  for restricted in ["libicu", "libdispatch", "foundation", "xctest"] {
    assert!(
      steps.iter().all(|s| !s.unit.products().contains(&restricted.to_string())),
      "{restricted} dispatched on a Darwin host"
    );
  }
  assert!(steps.iter().any(|s| s.unit == DispatchUnit::Product("languagepm".into())));
}

#[test]
fn plan_names_build_directory() {
  let registry = ProductRegistry::builtin();
  let flags = GlobalFlags::for_host("linux-x86_64");
  let mut variants = BuildVariantConfig::default();
  variants.sanitizers.asan = true;

  let plan = plan(&registry, &["cmark"], &flags, &variants).unwrap();
  assert_eq!(plan.build_subdir, "ninja-Debug+asan");
  assert_eq!(plan.build_subdir, compute_label(&variants));
}
