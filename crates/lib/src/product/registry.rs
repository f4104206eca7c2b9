//! Validated product graph.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::debug;

use super::{Product, ProductRecord, builtin_records};

/// Errors in product declarations or selections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// The products depend on each other in a cycle (or one depends on itself).
  #[error("dependency cycle among products: {}", .products.join(", "))]
  CyclicDependency { products: Vec<String> },

  /// A dependency or selection names a product that was never declared.
  #[error("unknown product '{name}'{}", required_by_suffix(.required_by))]
  UnknownProduct { name: String, required_by: Option<String> },

  /// Two declarations share a name.
  #[error("product '{0}' is declared more than once")]
  DuplicateProduct(String),
}

fn required_by_suffix(required_by: &Option<String>) -> String {
  match required_by {
    Some(product) => format!(" (required by '{}')", product),
    None => String::new(),
  }
}

/// The declared products and the dependency edges between them.
///
/// Edges point from a dependency to its dependent. Construction rejects
/// duplicate names, dangling dependencies and cycles, so every registry is a
/// DAG.
#[derive(Debug, Clone)]
pub struct ProductRegistry {
  /// Products in declaration order.
  products: Vec<Product>,

  /// Node weights are declaration indices.
  graph: DiGraph<usize, ()>,

  /// Map from product name to declaration index.
  index: HashMap<String, usize>,
}

impl ProductRegistry {
  /// Validate `records` and build the registry.
  ///
  /// # Errors
  ///
  /// - `DuplicateProduct` if two records share a name.
  /// - `UnknownProduct` if a dependency was never declared.
  /// - `CyclicDependency` naming the products of the first cycle found, in
  ///   declaration order.
  pub fn from_records(records: Vec<ProductRecord>) -> Result<Self, GraphError> {
    let mut declared = HashSet::with_capacity(records.len());
    for record in &records {
      if !declared.insert(record.name.as_str()) {
        return Err(GraphError::DuplicateProduct(record.name.clone()));
      }
    }

    for record in &records {
      if let Some(missing) = record.dependencies.iter().find(|dep| !declared.contains(dep.as_str())) {
        return Err(GraphError::UnknownProduct {
          name: missing.clone(),
          required_by: Some(record.name.clone()),
        });
      }
    }

    let registry = Self::assemble(records);
    registry.verify_acyclic()?;

    debug!(
      products = registry.products.len(),
      edges = registry.graph.edge_count(),
      "product registry validated"
    );
    Ok(registry)
  }

  /// The default toolchain products.
  pub fn builtin() -> Self {
    Self::assemble(builtin_records())
  }

  /// Build the graph from records whose names are unique and whose
  /// dependencies are all declared.
  fn assemble(records: Vec<ProductRecord>) -> Self {
    let mut graph = DiGraph::with_capacity(records.len(), 0);
    let mut index = HashMap::with_capacity(records.len());
    let mut products = Vec::with_capacity(records.len());

    // First pass: one node per product, in declaration order
    for (position, record) in records.into_iter().enumerate() {
      index.insert(record.name.clone(), position);
      graph.add_node(position);
      products.push(Product::from(record));
    }

    // Second pass: edge from each dependency to its dependent
    for (position, product) in products.iter().enumerate() {
      for dependency in &product.dependencies {
        if let Some(&dep) = index.get(dependency) {
          graph.update_edge(NodeIndex::new(dep), NodeIndex::new(position), ());
        }
      }
    }

    Self { products, graph, index }
  }

  fn verify_acyclic(&self) -> Result<(), GraphError> {
    let cycle = tarjan_scc(&self.graph)
      .into_iter()
      .filter(|component| component.len() > 1 || self.graph.contains_edge(component[0], component[0]))
      .map(|component| component.into_iter().map(|node| self.graph[node]).collect::<BTreeSet<_>>())
      .min_by_key(|positions| positions.first().copied());

    match cycle {
      Some(positions) => Err(GraphError::CyclicDependency {
        products: positions.into_iter().map(|p| self.products[p].name.clone()).collect(),
      }),
      None => Ok(()),
    }
  }

  pub fn get(&self, name: &str) -> Option<&Product> {
    self.index.get(name).map(|&position| &self.products[position])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Position of the product in declaration order.
  pub fn declaration_index(&self, name: &str) -> Option<usize> {
    self.index.get(name).copied()
  }

  /// All products in declaration order.
  pub fn products(&self) -> &[Product] {
    &self.products
  }

  pub fn len(&self) -> usize {
    self.products.len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }

  /// Declaration indices of the immediate dependencies of `position`.
  pub(crate) fn dependency_indices(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
    self
      .graph
      .neighbors_directed(NodeIndex::new(position), Direction::Incoming)
      .map(|node| self.graph[node])
  }

  /// Declaration indices of `selected` and everything they transitively
  /// depend on.
  pub(crate) fn closure_indices<S: AsRef<str>>(&self, selected: &[S]) -> Result<BTreeSet<usize>, GraphError> {
    let mut closure = BTreeSet::new();
    let mut stack = Vec::with_capacity(selected.len());

    for name in selected {
      let name = name.as_ref();
      let Some(&position) = self.index.get(name) else {
        return Err(GraphError::UnknownProduct {
          name: name.to_string(),
          required_by: None,
        });
      };
      stack.push(position);
    }

    while let Some(position) = stack.pop() {
      if closure.insert(position) {
        stack.extend(self.dependency_indices(position));
      }
    }

    Ok(closure)
  }

  /// `selected` plus everything they transitively depend on, in declaration
  /// order.
  pub fn transitive_closure<S: AsRef<str>>(&self, selected: &[S]) -> Result<Vec<&Product>, GraphError> {
    Ok(
      self
        .closure_indices(selected)?
        .into_iter()
        .map(|position| &self.products[position])
        .collect(),
    )
  }

  /// Whether `product` depends on `dependency`, directly or transitively.
  pub fn depends_on(&self, product: &str, dependency: &str) -> bool {
    let (Some(&from), Some(&to)) = (self.index.get(product), self.index.get(dependency)) else {
      return false;
    };
    from != to
      && self
        .closure_indices(&[product])
        .map(|closure| closure.contains(&to))
        .unwrap_or(false)
  }
}

impl Default for ProductRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}
