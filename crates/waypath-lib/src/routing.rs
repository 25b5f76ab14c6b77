use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::{
    dijkstra, exhaustive_search, heap_dijkstra, path_edges, DistanceTable, FrontierOrder,
    ShortestPath,
};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm over a balanced-tree frontier.
    #[default]
    Avl,
    /// Dijkstra's algorithm over a binary heap frontier.
    Heap,
    /// Enumerate every simple path (small graphs only).
    Exhaustive,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Avl => "avl",
            RouteAlgorithm::Heap => "heap",
            RouteAlgorithm::Exhaustive => "exhaustive",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "avl" | "dijkstra" => Ok(RouteAlgorithm::Avl),
            "heap" | "bfs" => Ok(RouteAlgorithm::Heap),
            "exhaustive" | "dfs" => Ok(RouteAlgorithm::Exhaustive),
            _ => Err(Error::UnsupportedOption {
                kind: "algorithm",
                name: s.to_string(),
                expected: "avl, heap, exhaustive",
            }),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub source: NodeId,
    pub target: NodeId,
    pub algorithm: RouteAlgorithm,
    /// Frontier ordering; only consulted by [`RouteAlgorithm::Avl`].
    pub frontier: FrontierOrder,
}

impl RouteRequest {
    /// Balanced-tree Dijkstra request with the default frontier ordering.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            algorithm: RouteAlgorithm::default(),
            frontier: FrontierOrder::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_frontier(mut self, frontier: FrontierOrder) -> Self {
        self.frontier = frontier;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontier: Option<FrontierOrder>,
    pub source: NodeId,
    pub target: NodeId,
    /// Total weight of the route; `None` when the target is unreachable.
    pub distance: Option<f64>,
    /// Nodes visited in order; `[target]` alone when unreachable.
    pub steps: Vec<NodeId>,
    /// Route as ordered `(from, to)` pairs.
    pub edges: Vec<(NodeId, NodeId)>,
    /// Distance table produced by the search.
    pub distances: DistanceTable,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }

    fn from_search(
        algorithm: RouteAlgorithm,
        frontier: Option<FrontierOrder>,
        result: ShortestPath,
    ) -> Self {
        let distance = result.is_reachable().then(|| result.distance());
        Self {
            algorithm,
            frontier,
            source: result.source,
            target: result.target,
            distance,
            edges: result.edges(),
            steps: result.path,
            distances: result.distances,
        }
    }
}

/// Compute a route using the requested algorithm.
///
/// Both endpoints must be declared in `graph`. An unreachable target is not an
/// error: the plan comes back with `distance: None` and a single step.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    for node in [request.source, request.target] {
        if !graph.contains(node) {
            return Err(Error::UnknownNode { node });
        }
    }

    let plan = match request.algorithm {
        RouteAlgorithm::Avl => {
            let result = dijkstra(graph, request.source, request.target, request.frontier);
            RoutePlan::from_search(request.algorithm, Some(request.frontier), result)
        }
        RouteAlgorithm::Heap => {
            let result = heap_dijkstra(graph, request.source, request.target);
            RoutePlan::from_search(request.algorithm, None, result)
        }
        RouteAlgorithm::Exhaustive => exhaustive_plan(graph, request),
    };

    tracing::debug!(
        algorithm = %plan.algorithm,
        source = plan.source,
        target = plan.target,
        reachable = plan.is_reachable(),
        hops = plan.hop_count(),
        "planned route"
    );
    Ok(plan)
}

/// The exhaustive search only knows the winning path, so its distance table
/// holds the running totals along that path and nothing else.
fn exhaustive_plan(graph: &Graph, request: &RouteRequest) -> RoutePlan {
    let Some(best) = exhaustive_search(graph, request.source, request.target) else {
        return RoutePlan {
            algorithm: RouteAlgorithm::Exhaustive,
            frontier: None,
            source: request.source,
            target: request.target,
            distance: None,
            steps: vec![request.target],
            edges: Vec::new(),
            distances: DistanceTable::default(),
        };
    };

    let distances = DistanceTable::along_path(graph, &best.path);
    RoutePlan {
        algorithm: RouteAlgorithm::Exhaustive,
        frontier: None,
        source: request.source,
        target: request.target,
        distance: Some(best.distance),
        edges: path_edges(&best.path),
        steps: best.path,
        distances,
    }
}
