use waypath_lib::{Edge, Graph};

#[test]
fn edges_register_both_endpoints() {
    let graph = Graph::from_edges([(1, 2, 1.0), (2, 3, 2.0)]);

    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(graph.contains(3));
    assert!(graph.neighbours(3).is_empty(), "sink has no outgoing edges");
    assert!(!graph.contains(4));
    assert!(graph.neighbours(4).is_empty());
}

#[test]
fn parallel_edges_are_kept_in_insertion_order() {
    let mut graph = Graph::new();
    graph.add_edge(0, 1, 3.0);
    graph.add_edge(0, 1, 1.0);

    assert_eq!(
        graph.neighbours(0),
        &[
            Edge {
                target: 1,
                weight: 3.0
            },
            Edge {
                target: 1,
                weight: 1.0
            }
        ]
    );
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn edges_iterate_grouped_by_source() {
    let graph = Graph::from_edges([(2, 0, 1.0), (0, 1, 4.0), (0, 2, 5.0)]);
    let listed: Vec<_> = graph
        .edges()
        .map(|(from, edge)| (from, edge.target, edge.weight))
        .collect();

    assert_eq!(listed, vec![(0, 1, 4.0), (0, 2, 5.0), (2, 0, 1.0)]);
}

#[test]
fn add_node_does_not_clear_existing_edges() {
    let mut graph = Graph::from_edges([(0, 1, 1.0)]);
    graph.add_node(0);
    graph.add_node(8);

    assert_eq!(graph.neighbours(0).len(), 1);
    assert!(graph.contains(8));
    assert!(!graph.is_empty());
    assert!(Graph::new().is_empty());
}
