//! waypath library entry points.
//!
//! This crate exposes a height-balanced ordered map, the shortest-path engine
//! that uses it as its frontier, the heap-based and exhaustive variants it is
//! checked against, and helpers to load graphs and render results. Higher-level
//! consumers (the CLI) should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod avl;
pub mod error;
pub mod graph;
pub mod loader;
pub mod output;
pub mod path;
pub mod routing;

pub use avl::AvlMap;
pub use error::{Error, Result};
pub use graph::{Edge, Graph, NodeId};
pub use loader::{load_graph, resolve_graph_path, GraphDocument, GRAPH_ENV_VAR};
pub use output::{render_dot, RouteStep, RouteSummary};
pub use path::{
    dijkstra, exhaustive_search, heap_dijkstra, path_edges, reconstruct_path, DistanceTable,
    ExhaustiveResult, FrontierOrder, PredecessorTable, ShortestPath, INFINITY,
};
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest};
