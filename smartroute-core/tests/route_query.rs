use geo::{Distance, Haversine, Point};
use petgraph::graph::NodeIndex;
use smartroute_core::prelude::*;

/// A(0,0) -> B(0,1) residential, B -> C(0,2) motorway, as (lon, lat)
fn corridor() -> (RoadNetwork, [NodeIndex; 3]) {
    let mut builder = RoadNetwork::builder();
    let a = builder.add_node(10, 0.0, 0.0);
    let b = builder.add_node(20, 0.0, 1.0);
    let c = builder.add_node(30, 0.0, 2.0);
    builder.add_edge(a, b, RoadEdge::new(100.0).with_highway("residential"));
    builder.add_edge(b, c, RoadEdge::new(200.0).with_highway("motorway"));
    (builder.build(), [a, b, c])
}

/// Two ways from West to East: a slow direct street and a faster detour.
fn town() -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    let west = builder.add_node(1, 0.000, 0.000);
    let east = builder.add_node(2, 0.009, 0.000);
    let north = builder.add_node(3, 0.0045, 0.004);

    let length = |a: (f64, f64), b: (f64, f64)| Haversine.distance(Point::new(a.0, a.1), Point::new(b.0, b.1));
    let direct = length((0.0, 0.0), (0.009, 0.0));
    let leg = length((0.0, 0.0), (0.0045, 0.004));

    for (from, to, edge) in [
        (west, east, RoadEdge::new(direct).with_highway("living_street")),
        (west, north, RoadEdge::new(leg).with_highway("primary")),
        (north, east, RoadEdge::new(leg).with_highway("primary").with_maxspeed("45 mph")),
    ] {
        builder.add_edge(from, to, edge.clone());
        builder.add_edge(to, from, edge);
    }
    builder.build()
}

#[test]
fn distance_route_follows_corridor() {
    let (network, [a, b, c]) = corridor();
    let request = RouteRequest::new((0.0, 0.0), (2.0, 0.0));

    let outcome = shortest_route(&network, &request).unwrap();
    assert_eq!(outcome.route.nodes(), &[a, b, c]);
    assert_eq!(outcome.route.osm_ids(&network), vec![10, 20, 30]);
    assert_eq!(total_length(&outcome.view, outcome.route.nodes()), 300.0);
}

#[test]
fn avoiding_highways_disconnects_corridor() {
    let (network, _) = corridor();
    let request = RouteRequest::new((0.0, 0.0), (2.0, 0.0)).avoid_highways(true);

    let error = shortest_route(&network, &request).unwrap_err();
    assert!(matches!(error, Error::NoPath { from: 10, to: 30 }), "{error}");
    assert_eq!(network.edge_count(), 2);
}

#[test]
fn same_snapped_node_gives_single_node_route() {
    let (network, [a, _, _]) = corridor();
    let request = RouteRequest::new((0.0, 0.0), (0.01, 0.01));

    let outcome = shortest_route(&network, &request).unwrap();
    assert_eq!(outcome.route.nodes(), &[a]);
    assert_eq!(total_length(&outcome.view, outcome.route.nodes()), 0.0);
}

#[test]
fn time_weight_prefers_faster_detour() {
    let network = town();
    let base = RouteRequest::new((0.0, 0.0), (0.0, 0.009));

    let shortest = shortest_route(&network, &base).unwrap();
    assert_eq!(shortest.route.osm_ids(&network), vec![1, 2]);

    let fastest = shortest_route(&network, &base.weight(WeightMode::Time)).unwrap();
    assert_eq!(fastest.route.osm_ids(&network), vec![1, 3, 2]);

    let summary = summarize(&fastest.view, &fastest.route, WeightMode::Time);
    assert!(summary.duration_s > 0.0);
    assert!((summary.duration_s - fastest.cost).abs() < 1e-6);
    assert!(summary.distance_m > total_length(&network, shortest.route.nodes()));
}

#[test]
fn time_query_leaves_cached_network_unannotated() {
    let network = town();
    let request = RouteRequest::new((0.0, 0.0), (0.0, 0.009)).weight(WeightMode::Time);

    shortest_route(&network, &request).unwrap();
    assert!(network.edges().all(|edge| edge.travel_time.is_none()));
}

#[test]
fn astar_matches_dijkstra_cost() {
    let network = town();
    for weight in [WeightMode::Distance, WeightMode::Time] {
        let request = RouteRequest::new((0.0, 0.0), (0.0, 0.009)).weight(weight);
        let exact = shortest_route(&network, &request).unwrap();
        let guided = shortest_route(&network, &request.algorithm(Algorithm::AStar)).unwrap();
        assert_eq!(exact.route, guided.route);
        assert!((exact.cost - guided.cost).abs() < 1e-6);
    }
}

#[test]
fn feature_from_route() {
    let (network, _) = corridor();
    let request = RouteRequest::new((0.0, 0.0), (2.0, 0.0));
    let outcome = shortest_route(&network, &request).unwrap();
    let summary = summarize(&outcome.view, &outcome.route, request.weight);
    let properties = RouteProperties::new(request.algorithm, request.weight, false, &summary);

    let feature = route_to_feature(&outcome.view, outcome.route.nodes(), &properties).unwrap();
    let value = serde_json::to_value(feature).unwrap();
    assert_eq!(
        value["geometry"]["coordinates"],
        serde_json::json!([[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]])
    );
    assert_eq!(value["properties"]["distance_m"], 300.0);
    assert_eq!(value["properties"]["duration_s"], 0.0);
    assert_eq!(value["properties"]["nodes"], 3);
}
