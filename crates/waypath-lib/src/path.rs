use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::avl::AvlMap;
use crate::error::Error;
use crate::graph::{Graph, NodeId};

/// Distance reported for nodes the search never reached.
pub const INFINITY: f64 = f64::INFINITY;

/// Best-known distance from the source for every node seen by a query.
///
/// Nodes without an entry read as [`INFINITY`]. Serialises non-finite values
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DistanceTable(BTreeMap<NodeId, f64>);

impl DistanceTable {
    /// Distance recorded for `node`, or [`INFINITY`] when there is none.
    pub fn get(&self, node: NodeId) -> f64 {
        self.0.get(&node).copied().unwrap_or(INFINITY)
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.get(node).is_finite()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.0.iter().map(|(&node, &distance)| (node, distance))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Running totals along `path`, taking the lightest edge between each
    /// consecutive pair. Stops at the first pair `graph` has no edge for.
    pub fn along_path(graph: &Graph, path: &[NodeId]) -> Self {
        let mut table = Self::default();
        let Some(&first) = path.first() else {
            return table;
        };

        let mut total = 0.0;
        table.set(first, total);
        for pair in path.windows(2) {
            let Some(weight) = graph
                .neighbours(pair[0])
                .iter()
                .filter(|edge| edge.target == pair[1])
                .map(|edge| edge.weight)
                .min_by(f64::total_cmp)
            else {
                break;
            };
            total += weight;
            table.set(pair[1], total);
        }
        table
    }

    fn set(&mut self, node: NodeId, distance: f64) {
        self.0.insert(node, distance);
    }
}

/// Node that currently yields each node's best-known distance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PredecessorTable(BTreeMap<NodeId, Option<NodeId>>);

impl PredecessorTable {
    pub fn get(&self, node: NodeId) -> Option<NodeId> {
        self.0.get(&node).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, node: NodeId, predecessor: Option<NodeId>) {
        self.0.insert(node, predecessor);
    }
}

/// Result of a single-source query stopped at `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    pub source: NodeId,
    pub target: NodeId,
    pub distances: DistanceTable,
    pub predecessors: PredecessorTable,
    /// Nodes from `source` to `target`; just `[target]` when unreachable.
    pub path: Vec<NodeId>,
}

impl ShortestPath {
    /// Distance to the target, [`INFINITY`] when it was not reached.
    pub fn distance(&self) -> f64 {
        self.distances.get(self.target)
    }

    pub fn is_reachable(&self) -> bool {
        self.distances.is_reachable(self.target)
    }

    /// The path as consecutive `(from, to)` pairs in traversal order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        path_edges(&self.path)
    }
}

/// Ordering used for entries of the balanced-tree frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierOrder {
    /// Entries keyed by `(distance, node)`: the minimum is the closest
    /// frontier node, with the smaller identifier winning ties. Improvements
    /// remove the stale key before inserting the new one.
    #[default]
    Distance,
    /// Entries keyed by node identifier with the distance as payload, so the
    /// minimum is the *smallest identifier* on the frontier. Improvements
    /// overwrite the payload in place.
    ///
    /// This does not extract nodes in distance order and, because the search
    /// stops at the target, can report a longer-than-optimal route. It is kept
    /// to reproduce that behaviour, not as a general-purpose choice.
    NodeId,
}

impl fmt::Display for FrontierOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            FrontierOrder::Distance => "distance",
            FrontierOrder::NodeId => "node-id",
        };
        f.write_str(value)
    }
}

impl FromStr for FrontierOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distance" => Ok(FrontierOrder::Distance),
            "node-id" | "node_id" | "node" => Ok(FrontierOrder::NodeId),
            _ => Err(Error::UnsupportedOption {
                kind: "frontier order",
                name: s.to_string(),
                expected: "distance, node-id",
            }),
        }
    }
}

/// Run Dijkstra's algorithm from `source`, using an [`AvlMap`] as the
/// frontier, and stop as soon as `target` is extracted.
///
/// Distances of nodes that were never extracted are the last relaxed
/// estimates, not necessarily final. Edge weights must be non-negative.
pub fn dijkstra(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    order: FrontierOrder,
) -> ShortestPath {
    debug!(source, target, %order, "starting balanced-tree search");

    let (mut distances, mut predecessors) = initial_tables(graph, source);
    let extracted = match order {
        FrontierOrder::Distance => {
            search_by_distance(graph, source, target, &mut distances, &mut predecessors)
        }
        FrontierOrder::NodeId => {
            search_by_node_id(graph, source, target, &mut distances, &mut predecessors)
        }
    };

    let path = reconstruct_path(&predecessors, target);
    debug!(
        extracted,
        distance = distances.get(target),
        hops = path.len().saturating_sub(1),
        "balanced-tree search finished"
    );

    ShortestPath {
        source,
        target,
        distances,
        predecessors,
        path,
    }
}

fn search_by_distance(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    distances: &mut DistanceTable,
    predecessors: &mut PredecessorTable,
) -> usize {
    let mut frontier: AvlMap<FrontierKey, ()> = AvlMap::new();
    frontier.insert(FrontierKey::new(0.0, source), ());

    let mut extracted = 0;
    while let Some((entry, ())) = frontier.pop_first() {
        extracted += 1;
        if entry.node == target {
            break;
        }

        relax(
            graph,
            entry.node,
            entry.distance.0,
            distances,
            predecessors,
            |node, previous, candidate| {
                frontier.remove(&FrontierKey::new(previous, node));
                frontier.insert(FrontierKey::new(candidate, node), ());
            },
        );
    }
    extracted
}

fn search_by_node_id(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    distances: &mut DistanceTable,
    predecessors: &mut PredecessorTable,
) -> usize {
    let mut frontier: AvlMap<NodeId, f64> = AvlMap::new();
    frontier.insert(source, 0.0);

    let mut extracted = 0;
    while let Some((node, distance)) = frontier.pop_first() {
        extracted += 1;
        if node == target {
            break;
        }

        relax(
            graph,
            node,
            distance,
            distances,
            predecessors,
            |next, _, candidate| {
                frontier.insert(next, candidate);
            },
        );
    }
    extracted
}

/// Run Dijkstra's algorithm with a binary heap frontier.
///
/// Shares the stop-at-target policy of [`dijkstra`]; superseded heap entries
/// are left in place and skipped when popped.
pub fn heap_dijkstra(graph: &Graph, source: NodeId, target: NodeId) -> ShortestPath {
    debug!(source, target, "starting heap search");

    let (mut distances, mut predecessors) = initial_tables(graph, source);
    let mut queue = BinaryHeap::new();
    queue.push(QueueEntry::new(source, 0.0));

    let mut extracted = 0usize;
    while let Some(entry) = queue.pop() {
        let distance = entry.cost.0;
        if distance > distances.get(entry.node) {
            continue;
        }

        extracted += 1;
        if entry.node == target {
            break;
        }

        relax(
            graph,
            entry.node,
            distance,
            &mut distances,
            &mut predecessors,
            |node, _, candidate| queue.push(QueueEntry::new(node, candidate)),
        );
    }

    let path = reconstruct_path(&predecessors, target);
    debug!(extracted, distance = distances.get(target), "heap search finished");

    ShortestPath {
        source,
        target,
        distances,
        predecessors,
        path,
    }
}

/// Best simple path found by [`exhaustive_search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExhaustiveResult {
    pub distance: f64,
    pub path: Vec<NodeId>,
}

/// Enumerate every simple path from `source` to `target` by backtracking and
/// keep the cheapest one (the first one found wins ties).
///
/// Exponential in the size of the graph; intended as a reference answer on
/// small inputs. Returns `None` when no path exists.
pub fn exhaustive_search(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
) -> Option<ExhaustiveResult> {
    let mut search = Backtrack {
        graph,
        target,
        path: vec![source],
        visited: HashSet::from([source]),
        best: None,
        explored: 0,
    };
    search.visit(source, 0.0);
    debug!(
        source,
        target,
        explored = search.explored,
        "exhaustive search finished"
    );
    search.best
}

struct Backtrack<'a> {
    graph: &'a Graph,
    target: NodeId,
    path: Vec<NodeId>,
    visited: HashSet<NodeId>,
    best: Option<ExhaustiveResult>,
    explored: usize,
}

impl Backtrack<'_> {
    fn visit(&mut self, node: NodeId, distance: f64) {
        self.explored += 1;
        if node == self.target {
            let improves = match &self.best {
                Some(best) => distance < best.distance,
                None => true,
            };
            if improves {
                self.best = Some(ExhaustiveResult {
                    distance,
                    path: self.path.clone(),
                });
            }
            return;
        }

        for edge in self.graph.neighbours(node) {
            if !self.visited.insert(edge.target) {
                continue;
            }
            self.path.push(edge.target);
            self.visit(edge.target, distance + edge.weight);
            self.path.pop();
            self.visited.remove(&edge.target);
        }
    }
}

/// Walk `predecessors` back from `target` and return the path source-first.
///
/// A target without a predecessor yields `[target]`. The walk gives up with a
/// warning if it revisits more nodes than the table holds, which only happens
/// when the table describes a cycle.
pub fn reconstruct_path(predecessors: &PredecessorTable, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(previous) = predecessors.get(current) {
        if path.len() >= predecessors.len() {
            warn!(target, "predecessor chain loops; truncating reconstructed path");
            break;
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Consecutive `(from, to)` pairs of `path` in traversal order.
pub fn path_edges(path: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    path.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

fn initial_tables(graph: &Graph, source: NodeId) -> (DistanceTable, PredecessorTable) {
    let mut distances = DistanceTable::default();
    let mut predecessors = PredecessorTable::default();
    for node in graph.nodes() {
        distances.set(node, INFINITY);
        predecessors.set(node, None);
    }
    distances.set(source, 0.0);
    predecessors.set(source, None);
    (distances, predecessors)
}

/// Relax every outgoing edge of `node`, calling `on_improve(next, previous,
/// candidate)` for each neighbour whose distance strictly decreased.
fn relax(
    graph: &Graph,
    node: NodeId,
    distance: f64,
    distances: &mut DistanceTable,
    predecessors: &mut PredecessorTable,
    mut on_improve: impl FnMut(NodeId, f64, f64),
) {
    for edge in graph.neighbours(node) {
        let candidate = distance + edge.weight;
        let previous = distances.get(edge.target);
        if candidate < previous {
            trace!(from = node, to = edge.target, candidate, "relaxed edge");
            distances.set(edge.target, candidate);
            predecessors.set(edge.target, Some(node));
            on_improve(edge.target, previous, candidate);
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Balanced-tree frontier key: distance first, node identifier as tie-break.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierKey {
    distance: FloatOrd,
    node: NodeId,
}

impl FrontierKey {
    fn new(distance: f64, node: NodeId) -> Self {
        Self {
            distance: FloatOrd(distance),
            node,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_by_distance(graph: &Graph, source: NodeId) -> (usize, DistanceTable) {
        let (mut distances, mut predecessors) = initial_tables(graph, source);
        // 99 is never declared, so the whole reachable graph is drained.
        let extracted = search_by_distance(graph, source, 99, &mut distances, &mut predecessors);
        (extracted, distances)
    }

    #[test]
    fn improved_entry_replaces_its_stale_key() {
        // Node 2 is first queued at 10, then improved to 2 through node 1.
        let graph = Graph::from_edges([(0, 2, 10.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let (extracted, distances) = drain_by_distance(&graph, 0);

        assert_eq!(extracted, 3, "each node extracted exactly once");
        assert_eq!(distances.get(2), 2.0);
    }

    #[test]
    fn repeated_improvements_still_extract_once() {
        let graph = Graph::from_edges([
            (0, 3, 9.0),
            (0, 1, 1.0),
            (1, 3, 6.0),
            (1, 2, 1.0),
            (2, 3, 1.0),
        ]);
        let (extracted, distances) = drain_by_distance(&graph, 0);

        assert_eq!(extracted, graph.node_count());
        assert_eq!(distances.get(3), 3.0);
    }
}
