use waypath_lib::{
    plan_route, Error, FrontierOrder, Graph, RouteAlgorithm, RouteRequest, INFINITY,
};

fn scenario_b() -> Graph {
    Graph::from_edges([
        (0, 1, 1.0),
        (0, 2, 1.0),
        (2, 1, 2.0),
        (1, 3, 1.0),
        (2, 3, 5.0),
    ])
}

#[test]
fn default_request_uses_balanced_tree_by_distance() {
    let request = RouteRequest::new(0, 3);
    assert_eq!(request.algorithm, RouteAlgorithm::Avl);
    assert_eq!(request.frontier, FrontierOrder::Distance);

    let plan = plan_route(&scenario_b(), &request).expect("route exists");
    assert_eq!(plan.algorithm, RouteAlgorithm::Avl);
    assert_eq!(plan.frontier, Some(FrontierOrder::Distance));
    assert_eq!(plan.distance, Some(2.0));
    assert_eq!(plan.steps, vec![0, 1, 3]);
    assert_eq!(plan.edges, vec![(0, 1), (1, 3)]);
    assert_eq!(plan.hop_count(), 2);
}

#[test]
fn every_algorithm_agrees_on_scenario() {
    let graph = scenario_b();
    for algorithm in [
        RouteAlgorithm::Avl,
        RouteAlgorithm::Heap,
        RouteAlgorithm::Exhaustive,
    ] {
        let request = RouteRequest::new(0, 3).with_algorithm(algorithm);
        let plan = plan_route(&graph, &request).expect("route exists");
        assert_eq!(plan.algorithm, algorithm);
        assert_eq!(plan.distance, Some(2.0), "{algorithm}");
        assert_eq!(plan.steps, vec![0, 1, 3], "{algorithm}");
    }
}

#[test]
fn exhaustive_plan_records_running_totals() {
    let request = RouteRequest::new(0, 3).with_algorithm(RouteAlgorithm::Exhaustive);
    let plan = plan_route(&scenario_b(), &request).expect("route exists");

    assert_eq!(plan.frontier, None);
    assert_eq!(plan.distances.get(0), 0.0);
    assert_eq!(plan.distances.get(1), 1.0);
    assert_eq!(plan.distances.get(3), 2.0);
    assert_eq!(plan.distances.get(2), INFINITY, "off-route nodes are not recorded");
}

#[test]
fn unreachable_target_is_a_plan_not_an_error() {
    for algorithm in [
        RouteAlgorithm::Avl,
        RouteAlgorithm::Heap,
        RouteAlgorithm::Exhaustive,
    ] {
        let request = RouteRequest::new(3, 0).with_algorithm(algorithm);
        let plan = plan_route(&scenario_b(), &request).expect("plan produced");
        assert!(!plan.is_reachable());
        assert_eq!(plan.distance, None);
        assert_eq!(plan.steps, vec![0]);
        assert_eq!(plan.hop_count(), 0);
    }
}

#[test]
fn undeclared_endpoints_are_rejected() {
    let graph = scenario_b();

    let error = plan_route(&graph, &RouteRequest::new(9, 3)).expect_err("unknown source");
    assert!(matches!(error, Error::UnknownNode { node: 9 }));

    let error = plan_route(&graph, &RouteRequest::new(0, -4)).expect_err("unknown target");
    assert_eq!(format!("{error}"), "unknown node: -4");
}

#[test]
fn isolated_declared_node_is_known_but_unreachable() {
    let mut graph = scenario_b();
    graph.add_node(50);

    let plan = plan_route(&graph, &RouteRequest::new(0, 50)).expect("declared");
    assert_eq!(plan.steps, vec![50]);
    assert_eq!(plan.distances.get(50), INFINITY);
}

#[test]
fn algorithm_and_frontier_names_parse() {
    assert_eq!("avl".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Avl);
    assert_eq!("Heap".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Heap);
    assert_eq!(
        "dfs".parse::<RouteAlgorithm>().unwrap(),
        RouteAlgorithm::Exhaustive
    );
    assert_eq!(
        "node-id".parse::<FrontierOrder>().unwrap(),
        FrontierOrder::NodeId
    );

    let error = "astar".parse::<RouteAlgorithm>().expect_err("unsupported");
    assert!(format!("{error}").contains("unsupported algorithm 'astar'"));
    assert!("fifo".parse::<FrontierOrder>().is_err());
}

#[test]
fn plan_serialises_unreachable_distance_as_null() {
    let plan = plan_route(&scenario_b(), &RouteRequest::new(3, 0)).expect("plan produced");
    let json = serde_json::to_value(&plan).expect("serialize");

    assert_eq!(json["algorithm"], "avl");
    assert_eq!(json["frontier"], "distance");
    assert!(json["distance"].is_null());
    assert!(json["distances"]["0"].is_null());
    assert_eq!(json["distances"]["3"], 0.0);
}
