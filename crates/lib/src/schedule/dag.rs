//! Phase computation over a subset of the product graph.
//!
//! A [`PhaseDag`] holds the selected products of one ordering partition and
//! the dependency edges between them. Phases are computed with Kahn's
//! algorithm by levels: every product whose dependencies are all in earlier
//! phases joins the next phase.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::product::{GraphError, ProductRegistry};

pub(crate) struct PhaseDag<'a> {
  registry: &'a ProductRegistry,

  /// Node weights are declaration indices.
  graph: DiGraph<usize, ()>,

  /// Map from declaration index to node index.
  nodes: HashMap<usize, NodeIndex>,
}

impl<'a> PhaseDag<'a> {
  /// Build the sub-graph induced by `members`. Edges to products outside
  /// `members` are dropped.
  pub(crate) fn new(registry: &'a ProductRegistry, members: &BTreeSet<usize>) -> Self {
    let mut graph = DiGraph::with_capacity(members.len(), 0);
    let mut nodes = HashMap::with_capacity(members.len());

    for &position in members {
      nodes.insert(position, graph.add_node(position));
    }

    for &position in members {
      let dependent = nodes[&position];
      for dependency in registry.dependency_indices(position) {
        if let Some(&dep) = nodes.get(&dependency) {
          // Edge from dependency to dependent
          graph.add_edge(dep, dependent, ());
        }
      }
    }

    Self { registry, graph, nodes }
  }

  /// Group the members into phases, each sorted by declaration order.
  pub(crate) fn phases(&self) -> Result<Vec<Vec<usize>>, GraphError> {
    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    // Ordered by declaration index, so each phase comes out sorted.
    let mut remaining: BTreeSet<usize> = self.nodes.keys().copied().collect();
    let mut phases = Vec::new();

    while !remaining.is_empty() {
      let ready: Vec<usize> = remaining
        .iter()
        .copied()
        .filter(|position| in_degree[&self.nodes[position]] == 0)
        .collect();

      if ready.is_empty() {
        return Err(GraphError::CyclicDependency {
          products: remaining
            .iter()
            .map(|&position| self.registry.products()[position].name.clone())
            .collect(),
        });
      }

      for position in &ready {
        remaining.remove(position);

        // Decrement in-degree of dependents
        for neighbor in self.graph.neighbors_directed(self.nodes[position], Direction::Outgoing) {
          if let Some(deg) = in_degree.get_mut(&neighbor) {
            *deg = deg.saturating_sub(1);
          }
        }
      }

      phases.push(ready);
    }

    Ok(phases)
  }
}
