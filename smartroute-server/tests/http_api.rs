use std::{sync::Arc, thread, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use geo::{Distance, Haversine, Point};
use serde_json::{Value, json};
use smartroute_core::prelude::*;
use smartroute_server::{AppState, DEFAULT_PLACE, build_router};
use tower::ServiceExt;

const CORRIDOR: &str = "Corridor";
const SLOW: &str = "Slow";

/// Serves fixture networks instead of reading OSM extracts
struct FixtureLoader;

impl NetworkLoader for FixtureLoader {
    fn load(&self, place: &str) -> Result<RoadNetwork, Error> {
        match place {
            DEFAULT_PLACE => Ok(hoboken()),
            CORRIDOR => Ok(corridor()),
            SLOW => {
                thread::sleep(Duration::from_millis(300));
                Ok(corridor())
            }
            _ => Err(Error::PlaceNotFound(place.to_string())),
        }
    }
}

/// A(0,0) -> B(0,1) residential, B -> C(0,2) motorway, as (lon, lat)
fn corridor() -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    let a = builder.add_node(1, 0.0, 0.0);
    let b = builder.add_node(2, 0.0, 1.0);
    let c = builder.add_node(3, 0.0, 2.0);
    builder.add_edge(a, b, RoadEdge::new(100.0).with_highway("residential"));
    builder.add_edge(b, c, RoadEdge::new(200.0).with_highway("motorway"));
    builder.build()
}

/// Three two-way residential segments around the test route endpoints
fn hoboken() -> RoadNetwork {
    let stops = [
        (101, -74.032, 40.742),
        (102, -74.0305, 40.7395),
        (103, -74.0285, 40.7370),
        (104, -74.027, 40.735),
    ];
    let mut builder = RoadNetwork::builder();
    let nodes: Vec<_> = stops
        .iter()
        .map(|&(id, lon, lat)| builder.add_node(id, lon, lat))
        .collect();

    for (pair, ids) in stops.windows(2).zip(nodes.windows(2)) {
        let length = Haversine.distance(Point::new(pair[0].1, pair[0].2), Point::new(pair[1].1, pair[1].2));
        let edge = RoadEdge::new(length).with_highway("residential");
        builder.add_edge(ids[0], ids[1], edge.clone());
        builder.add_edge(ids[1], ids[0], edge);
    }
    builder.build()
}

fn app() -> Router {
    build_router(Arc::new(AppState::with_loader(FixtureLoader, Duration::from_secs(5))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

const CORRIDOR_ROUTE: &str =
    "/route-geojson?place=Corridor&origin_lat=0&origin_lon=0&dest_lat=2&dest_lon=0";

#[tokio::test]
async fn index_reports_running() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "SmartRoute server running" }));
}

#[tokio::test]
async fn test_route_uses_default_place() {
    let (status, body) = get(app(), "/test-route").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "dijkstra");
    assert_eq!(body["total_nodes"], 4);
    assert_eq!(body["route_nodes"], json!([101, 102, 103, 104]));
    assert!(body["total_distance_m"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn corridor_route_as_feature() {
    let (status, body) = get(app(), CORRIDOR_ROUTE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["geometry"]["type"], "LineString");
    assert_eq!(
        body["geometry"]["coordinates"],
        json!([[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]])
    );

    let properties = &body["properties"];
    assert_eq!(properties["algorithm"], "dijkstra");
    assert_eq!(properties["weight"], "distance");
    assert_eq!(properties["avoid_highways"], false);
    assert_eq!(properties["distance_m"], 300.0);
    assert_eq!(properties["duration_s"], 0.0);
    assert_eq!(properties["nodes"], 3);
}

#[tokio::test]
async fn omitted_weight_matches_distance() {
    let (_, implicit) = get(app(), CORRIDOR_ROUTE).await;
    let (_, explicit) = get(app(), &format!("{CORRIDOR_ROUTE}&weight=distance")).await;
    assert_eq!(implicit, explicit);
}

#[tokio::test]
async fn time_weight_reports_duration() {
    let (status, body) = get(app(), &format!("{CORRIDOR_ROUTE}&weight=time&algo=astar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"]["weight"], "time");
    // 100 m at 30 km/h plus 200 m at 100 km/h
    let duration = body["properties"]["duration_s"].as_f64().unwrap();
    assert!((duration - 19.2).abs() < 1e-6, "{duration}");
}

#[tokio::test]
async fn missing_coordinate_is_bad_request() {
    let (status, body) = get(
        app(),
        "/route-geojson?origin_lat=0&origin_lon=0&dest_lat=2",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing required query param: dest_lon" }));
}

#[tokio::test]
async fn non_numeric_coordinate_is_bad_request() {
    let (status, body) = get(
        app(),
        "/route-geojson?origin_lat=north&origin_lon=0&dest_lat=2&dest_lon=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid query param: origin_lat" }));
}

#[tokio::test]
async fn avoiding_highways_without_alternative_fails() {
    let (status, body) = get(app(), &format!("{CORRIDOR_ROUTE}&avoid_highways=TRUE")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("internal error: "), "{message}");
    assert!(message.contains("No path"), "{message}");
}

#[tokio::test]
async fn unknown_algorithm_is_internal_error() {
    let (status, body) = get(app(), &format!("{CORRIDOR_ROUTE}&algo=bfs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("'bfs'"));
}

#[tokio::test]
async fn unknown_place_is_internal_error() {
    let (status, body) = get(
        app(),
        "/route-geojson?place=Atlantis&origin_lat=0&origin_lon=0&dest_lat=2&dest_lon=0",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn slow_load_times_out() {
    let state = AppState::with_loader(FixtureLoader, Duration::from_millis(20));
    let app = build_router(Arc::new(state));
    let (status, body) = get(
        app,
        "/route-geojson?place=Slow&origin_lat=0&origin_lon=0&dest_lat=2&dest_lon=0",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn networks_are_cached_across_requests() {
    let state = Arc::new(AppState::with_loader(FixtureLoader, Duration::from_secs(5)));
    let app = build_router(Arc::clone(&state));

    get(app.clone(), CORRIDOR_ROUTE).await;
    get(app, &format!("{CORRIDOR_ROUTE}&weight=time")).await;

    assert!(state.cache.contains(CORRIDOR));
    assert_eq!(state.cache.len(), 1);
    let cached = state.cache.get_or_load(CORRIDOR).unwrap();
    assert!(cached.edges().all(|edge| edge.travel_time.is_none()));
}
