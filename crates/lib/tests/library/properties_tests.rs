use std::collections::HashSet;

use buildplan_lib::product::{ProductFlags, ProductRecord, ProductRegistry};
use buildplan_lib::schedule::schedule;
use proptest::prelude::*;

/// Random acyclic registries: product `i` may only depend on products with a
/// smaller index.
fn acyclic_records() -> impl Strategy<Value = Vec<ProductRecord>> {
  (1usize..12)
    .prop_flat_map(|count| {
      let deps = (0..count)
        .map(|i| proptest::collection::vec(0..i.max(1), 0..=i.min(3)))
        .collect::<Vec<_>>();
      (Just(count), deps, proptest::collection::vec(any::<bool>(), count))
    })
    .prop_map(|(count, deps, pre_ordered)| {
      (0..count)
        .map(|i| {
          let mut dependencies: Vec<String> =
            deps[i].iter().filter(|&&d| d < i).map(|d| format!("p{}", d)).collect();
          dependencies.sort();
          dependencies.dedup();
          ProductRecord {
            name: format!("p{}", i),
            dependencies,
            flags: ProductFlags {
              pre_dependency_ordered: pre_ordered[i],
              ..Default::default()
            },
            kind: None,
          }
        })
        .collect()
    })
}

proptest! {
  #[test]
  fn schedule_honours_every_edge(records in acyclic_records(), pick in any::<prop::sample::Index>()) {
    let registry = ProductRegistry::from_records(records).unwrap();
    let selected = registry.products()[pick.index(registry.len())].name.clone();

    let plan = schedule(&registry, &[selected.as_str()]).unwrap();
    let expected: HashSet<String> = registry
      .transitive_closure(&[selected.as_str()])
      .unwrap()
      .into_iter()
      .map(|p| p.name.clone())
      .collect();

    // Each required product exactly once.
    let flat = plan.flatten();
    prop_assert_eq!(flat.len(), expected.len());
    prop_assert_eq!(flat.iter().map(|s| s.to_string()).collect::<HashSet<_>>(), expected);

    for name in &flat {
      let product = registry.get(name).unwrap();
      let phase = plan.phase_of(name).unwrap();
      for dependency in &product.dependencies {
        let dep = registry.get(dependency).unwrap();
        if dep.flags.pre_dependency_ordered == product.flags.pre_dependency_ordered
          || dep.flags.pre_dependency_ordered
        {
          prop_assert!(plan.phase_of(dependency).unwrap() < phase);
        }
      }
    }

    // Pre-ordered products strictly before all others.
    let boundary = plan.pre_ordered_phases();
    for (index, phase) in plan.phases().iter().enumerate() {
      for name in phase {
        prop_assert_eq!(registry.get(name).unwrap().flags.pre_dependency_ordered, index < boundary);
      }
    }

    prop_assert_eq!(schedule(&registry, &[selected.as_str()]).unwrap(), plan);
  }
}
