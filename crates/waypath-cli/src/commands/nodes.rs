//! Nodes command handler: lists the loaded graph.

use std::fmt::Write;

use anyhow::Result;

use waypath_lib::{render_dot, Graph, GraphDocument};

use crate::output::OutputFormat;

/// Handle the nodes subcommand and return the rendered output.
pub fn handle_nodes_command(graph: &Graph, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => render_node_list(graph),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&GraphDocument::from_graph(graph))?;
            json.push('\n');
            json
        }
        OutputFormat::Dot => render_dot(graph, &[]),
    };
    Ok(rendered)
}

fn render_node_list(graph: &Graph) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    for node in graph.nodes() {
        let targets = graph
            .neighbours(node)
            .iter()
            .map(|edge| edge.target.to_string())
            .collect::<Vec<_>>();
        if targets.is_empty() {
            let _ = writeln!(buffer, "- {node}");
        } else {
            let _ = writeln!(buffer, "- {node} -> {}", targets.join(", "));
        }
    }
    buffer
}
