use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a node in the routing graph.
pub type NodeId = i64;

/// Directed, weighted edge within the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: NodeId,
    pub weight: f64,
}

/// Adjacency-list graph consumed by the pathfinding algorithms.
///
/// Nodes are kept in identifier order so listings and renderings are stable
/// between runs. Every edge endpoint is a declared node, including targets
/// that have no outgoing edges of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to, weight)` triples, in order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut graph = Self::new();
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight);
        }
        graph
    }

    /// Declare a node without adding any edges.
    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    /// Append `from -> to` with the given weight.
    ///
    /// Parallel edges are kept as-is. Weights are expected to be finite and
    /// non-negative; this is not checked here, and the search results for a
    /// graph violating it are unspecified. Use the [`crate::loader`] functions
    /// to get validated input.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.adjacency.entry(from).or_default().push(Edge { target: to, weight });
        self.add_node(to);
    }

    /// Return the outgoing edges for a given node identifier.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `node` was declared, either directly or as an edge endpoint.
    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Declared nodes in ascending identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every edge as `(from, edge)`, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, edges)| edges.iter().map(move |edge| (from, edge)))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
