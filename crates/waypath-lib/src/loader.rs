//! Reading graphs from disk.
//!
//! Two formats are understood, selected by file extension:
//!
//! - `*.json`: `{"nodes": [..], "edges": [{"from": 1, "to": 2, "weight": 1.5}, ..]}`
//!   where `nodes` is optional and only needed for isolated nodes.
//! - anything else: an edge list with one `from to weight` triple per line.
//!   A line holding a single identifier declares an isolated node; blank
//!   lines and `#` comments are ignored.
//!
//! Unlike [`Graph::add_edge`], the loaders reject negative and non-finite
//! weights, so graphs read through this module satisfy the search
//! preconditions.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Environment variable consulted when no graph path is passed explicitly.
pub const GRAPH_ENV_VAR: &str = "WAYPATH_GRAPH";

/// Serialized form of a single edge in the JSON format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// Serialized form of a whole graph in the JSON format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Capture every node and edge of `graph`.
    pub fn from_graph(graph: &Graph) -> Self {
        let edges = graph
            .edges()
            .map(|(from, edge)| EdgeRecord {
                from,
                to: edge.target,
                weight: edge.weight,
            })
            .collect();
        Self {
            nodes: graph.nodes().collect(),
            edges,
        }
    }

    /// Validate weights and build the graph.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::new();
        for node in self.nodes {
            graph.add_node(node);
        }
        for record in self.edges {
            check_weight(record.from, record.to, record.weight)?;
            graph.add_edge(record.from, record.to, record.weight);
        }
        Ok(graph)
    }
}

/// Resolve the graph file from an explicit path or [`GRAPH_ENV_VAR`].
pub fn resolve_graph_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(GRAPH_ENV_VAR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => return Err(Error::GraphNotConfigured),
        },
    };

    if !path.is_file() {
        return Err(Error::GraphNotFound { path });
    }
    Ok(path)
}

/// Load a graph, picking the format from the file extension.
pub fn load_graph(path: &Path) -> Result<Graph> {
    if !path.is_file() {
        return Err(Error::GraphNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let graph = if is_json {
        parse_json(&contents)?
    } else {
        parse_edge_list(&contents)?
    };

    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Parse the JSON graph format.
pub fn parse_json(contents: &str) -> Result<Graph> {
    let document: GraphDocument = serde_json::from_str(contents)?;
    document.into_graph()
}

/// Parse the whitespace-separated edge-list format.
pub fn parse_edge_list(contents: &str) -> Result<Graph> {
    let mut graph = Graph::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        match fields.as_slice() {
            [node] => graph.add_node(parse_node(node, line)?),
            [from, to, weight] => {
                let from = parse_node(from, line)?;
                let to = parse_node(to, line)?;
                let weight = weight.parse::<f64>().map_err(|_| Error::GraphParse {
                    line,
                    message: format!("invalid weight '{weight}'"),
                })?;
                check_weight(from, to, weight)?;
                graph.add_edge(from, to, weight);
            }
            _ => {
                return Err(Error::GraphParse {
                    line,
                    message: format!(
                        "expected 'from to weight' or a single node, found {} fields",
                        fields.len()
                    ),
                })
            }
        }
    }

    Ok(graph)
}

fn parse_node(token: &str, line: usize) -> Result<NodeId> {
    token.parse::<NodeId>().map_err(|_| Error::GraphParse {
        line,
        message: format!("invalid node identifier '{token}'"),
    })
}

fn check_weight(from: NodeId, to: NodeId, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(Error::MalformedWeight { from, to, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_list_skips_comments_and_blank_lines() {
        let graph = parse_edge_list("# demo\n\n1 2 1.5  # first\n2 3 2\n7\n").expect("parses");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![1, 2, 3, 7]);
        assert_eq!(graph.neighbours(1)[0].weight, 1.5);
    }

    #[test]
    fn edge_list_reports_line_numbers() {
        let error = parse_edge_list("1 2 1\n1 2\n").expect_err("two fields");
        assert!(matches!(error, Error::GraphParse { line: 2, .. }));

        let error = parse_edge_list("a 2 1\n").expect_err("bad node");
        assert!(format!("{error}").contains("invalid node identifier 'a'"));
    }

    #[test]
    fn negative_and_infinite_weights_are_rejected() {
        let error = parse_edge_list("1 2 -1\n").expect_err("negative");
        assert!(matches!(error, Error::MalformedWeight { from: 1, to: 2, .. }));

        let error = parse_edge_list("1 2 inf\n").expect_err("infinite");
        assert!(matches!(error, Error::MalformedWeight { .. }));
    }

    #[test]
    fn json_document_round_trips_isolated_nodes() {
        let mut graph = Graph::from_edges([(0, 1, 1.0), (1, 2, 2.5)]);
        graph.add_node(9);

        let document = GraphDocument::from_graph(&graph);
        let encoded = serde_json::to_string(&document).expect("serialize");
        let decoded = parse_json(&encoded).expect("parse");
        assert_eq!(decoded, graph);
    }
}
