use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Step taken during traversal of a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub node: NodeId,
    /// Distance from the source when this node is reached, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Structured representation of a planned route that higher-level consumers
/// can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub source: NodeId,
    pub target: NodeId,
    pub reachable: bool,
    pub distance: Option<f64>,
    pub hops: usize,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary.
    pub fn from_plan(plan: &RoutePlan) -> Self {
        let steps = plan
            .steps
            .iter()
            .enumerate()
            .map(|(index, &node)| RouteStep {
                index,
                node,
                distance: Some(plan.distances.get(node)).filter(|d| d.is_finite()),
            })
            .collect();

        Self {
            algorithm: plan.algorithm,
            source: plan.source,
            target: plan.target,
            reachable: plan.is_reachable(),
            distance: plan.distance,
            hops: plan.hop_count(),
            steps,
        }
    }

    /// Human-readable rendering, one step per line.
    pub fn render_text(&self) -> String {
        let mut buffer = String::new();

        let Some(distance) = self.distance else {
            let _ = writeln!(
                buffer,
                "No route from {} to {} (algorithm: {})",
                self.source, self.target, self.algorithm
            );
            return buffer;
        };

        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, distance {}, algorithm: {})",
            self.source,
            self.target,
            self.hops,
            format_weight(distance),
            self.algorithm
        );
        for step in &self.steps {
            match step.distance {
                Some(at) => {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} [{}]",
                        step.index,
                        step.node,
                        format_weight(at)
                    );
                }
                None => {
                    let _ = writeln!(buffer, "{:>3}: {}", step.index, step.node);
                }
            }
        }
        buffer
    }

    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render `graph` as a Graphviz digraph, drawing the edges listed in `route`
/// in bold red. Every edge is labelled with its weight.
///
/// Between two route nodes joined by parallel edges only the lightest one is
/// highlighted (the first of equal weights), matching the edge the searches
/// relax through.
pub fn render_dot(graph: &Graph, route: &[(NodeId, NodeId)]) -> String {
    let highlighted: HashSet<(NodeId, usize)> = route
        .iter()
        .filter_map(|&(from, to)| {
            lightest_edge(graph, from, to).map(|position| (from, position))
        })
        .collect();
    let on_route: HashSet<NodeId> = route.iter().flat_map(|&(from, to)| [from, to]).collect();

    let mut buffer = String::new();
    let _ = writeln!(buffer, "digraph waypath {{");
    let _ = writeln!(
        buffer,
        "    node [shape=circle, style=filled, fillcolor=lightblue];"
    );

    for node in graph.nodes() {
        if on_route.contains(&node) {
            let _ = writeln!(buffer, "    {node} [fillcolor=salmon];");
        } else {
            let _ = writeln!(buffer, "    {node};");
        }
    }

    for from in graph.nodes() {
        for (position, edge) in graph.neighbours(from).iter().enumerate() {
            let label = format_weight(edge.weight);
            if highlighted.contains(&(from, position)) {
                let _ = writeln!(
                    buffer,
                    "    {from} -> {} [label=\"{label}\", color=red, penwidth=3];",
                    edge.target
                );
            } else {
                let _ = writeln!(buffer, "    {from} -> {} [label=\"{label}\"];", edge.target);
            }
        }
    }

    let _ = writeln!(buffer, "}}");
    buffer
}

/// Position of the lightest `from -> to` edge within `from`'s adjacency list.
fn lightest_edge(graph: &Graph, from: NodeId, to: NodeId) -> Option<usize> {
    graph
        .neighbours(from)
        .iter()
        .enumerate()
        .filter(|(_, edge)| edge.target == to)
        .min_by(|(_, a), (_, b)| a.weight.total_cmp(&b.weight))
        .map(|(position, _)| position)
}

/// Whole-number weights print without a fractional part.
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{}", weight as i64)
    } else {
        format!("{weight}")
    }
}
