//! Route command handler for computing a shortest path between two nodes.

use anyhow::{Context, Result};
use clap::Args;

use waypath_lib::{
    plan_route, render_dot, FrontierOrder, Graph, NodeId, RouteAlgorithm, RouteRequest,
    RouteSummary,
};

use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    /// Source node identifier.
    #[arg(long = "from", allow_negative_numbers = true)]
    pub from: NodeId,
    /// Target node identifier.
    #[arg(long = "to", allow_negative_numbers = true)]
    pub to: NodeId,
    /// Algorithm to use: avl, heap, or exhaustive.
    #[arg(long, default_value_t = RouteAlgorithm::Avl)]
    pub algorithm: RouteAlgorithm,
    /// Ordering of the balanced-tree frontier: distance or node-id.
    #[arg(long, default_value_t = FrontierOrder::Distance)]
    pub frontier: FrontierOrder,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(self.from, self.to)
            .with_algorithm(self.algorithm)
            .with_frontier(self.frontier)
    }
}

/// Handle the route subcommand and return the rendered output.
///
/// An unreachable target is reported in the output, not as an error.
pub fn handle_route_command(
    graph: &Graph,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<String> {
    let request = args.to_request();
    let plan = plan_route(graph, &request)
        .with_context(|| format!("failed to plan route from {} to {}", args.from, args.to))?;

    if !plan.is_reachable() {
        tracing::info!(from = args.from, to = args.to, "target is unreachable");
    }

    let rendered = match format {
        OutputFormat::Text => RouteSummary::from_plan(&plan).render_text(),
        OutputFormat::Json => {
            let mut json = RouteSummary::from_plan(&plan).to_json()?;
            json.push('\n');
            json
        }
        OutputFormat::Dot => render_dot(graph, &plan.edges),
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: NodeId, to: NodeId) -> RouteCommandArgs {
        RouteCommandArgs {
            from,
            to,
            algorithm: RouteAlgorithm::Avl,
            frontier: FrontierOrder::Distance,
        }
    }

    #[test]
    fn text_output_lists_every_step() {
        let graph = Graph::from_edges([(1, 2, 1.0), (2, 3, 2.0), (1, 3, 4.0), (3, 4, 1.0)]);
        let output =
            handle_route_command(&graph, &args(1, 3), OutputFormat::Text).expect("route exists");

        assert!(output.starts_with("Route: 1 -> 3 (2 hops, distance 3, algorithm: avl)"));
        assert!(output.contains("  2: 3 [3]"));
    }

    #[test]
    fn dot_output_highlights_route() {
        let graph = Graph::from_edges([(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]);
        let output =
            handle_route_command(&graph, &args(0, 2), OutputFormat::Dot).expect("route exists");

        assert!(output.contains("0 -> 1 [label=\"1\", color=red, penwidth=3];"));
        assert!(output.contains("0 -> 2 [label=\"5\"];"));
    }

    #[test]
    fn unknown_node_is_an_error() {
        let graph = Graph::from_edges([(0, 1, 1.0)]);
        let error =
            handle_route_command(&graph, &args(0, 42), OutputFormat::Text).expect_err("unknown");
        assert!(format!("{error:#}").contains("unknown node: 42"));
    }
}
