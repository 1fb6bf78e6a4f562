//! HTTP routes.
//!
//! Handlers validate query parameters on the async side, then run loading and
//! path search on the blocking pool under the configured time limit.

use std::sync::Arc;

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use geojson::Feature;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use smartroute_core::prelude::{
    Algorithm, OsmNodeId, RouteProperties, RouteRequest, WeightMode, route_to_feature,
    shortest_route, summarize, total_length,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::ApiError, state::AppState};

/// Place used when a request doesn't name one
pub const DEFAULT_PLACE: &str = "Hoboken, New Jersey, USA";

const TEST_ORIGIN: (f64, f64) = (40.742, -74.032);
const TEST_DESTINATION: (f64, f64) = (40.735, -74.027);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/test-route", get(test_route))
        .route("/route-geojson", get(route_geojson))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "SmartRoute server running" }))
}

#[derive(Debug, Serialize)]
struct TestRouteResponse {
    algorithm: Algorithm,
    total_nodes: usize,
    total_distance_m: f64,
    route_nodes: Vec<OsmNodeId>,
}

/// Fixed Dijkstra query across Hoboken, a smoke test of the whole pipeline
async fn test_route(State(state): State<Arc<AppState>>) -> Result<Json<TestRouteResponse>, ApiError> {
    let request = RouteRequest::new(TEST_ORIGIN, TEST_DESTINATION);

    let response = run_blocking(&state, move |state| {
        let network = state.cache.get_or_load(DEFAULT_PLACE)?;
        let outcome = shortest_route(&network, &request)?;

        Ok(TestRouteResponse {
            algorithm: request.algorithm,
            total_nodes: outcome.route.len(),
            total_distance_m: total_length(&outcome.view, outcome.route.nodes()),
            route_nodes: outcome.route.osm_ids(&outcome.view),
        })
    })
    .await?;

    Ok(Json(response))
}

/// Raw `/route-geojson` parameters; everything is validated in [`RouteParams::parse`]
#[derive(Debug, Default, Deserialize)]
pub struct RouteParams {
    pub place: Option<String>,
    pub algo: Option<String>,
    pub weight: Option<String>,
    pub avoid_highways: Option<String>,
    pub origin_lat: Option<String>,
    pub origin_lon: Option<String>,
    pub dest_lat: Option<String>,
    pub dest_lon: Option<String>,
}

impl RouteParams {
    /// Place name and route request described by the parameters.
    ///
    /// # Errors
    ///
    /// Coordinates are checked first, in `origin_lat`, `origin_lon`,
    /// `dest_lat`, `dest_lon` order, giving [`ApiError::MissingParam`] or
    /// [`ApiError::InvalidParam`]. An unknown `algo` or `weight` is an
    /// [`ApiError::Internal`].
    pub fn parse(&self) -> Result<(String, RouteRequest), ApiError> {
        let origin_lat = coordinate("origin_lat", self.origin_lat.as_deref())?;
        let origin_lon = coordinate("origin_lon", self.origin_lon.as_deref())?;
        let dest_lat = coordinate("dest_lat", self.dest_lat.as_deref())?;
        let dest_lon = coordinate("dest_lon", self.dest_lon.as_deref())?;

        let algorithm = self
            .algo
            .as_deref()
            .map(str::parse::<Algorithm>)
            .transpose()?
            .unwrap_or_default();
        let weight = self
            .weight
            .as_deref()
            .map(str::parse::<WeightMode>)
            .transpose()?
            .unwrap_or_default();
        let avoid_highways = self.avoid_highways.as_deref().is_some_and(is_truthy);

        let place = self
            .place
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACE.to_string());
        let request = RouteRequest::new((origin_lat, origin_lon), (dest_lat, dest_lon))
            .algorithm(algorithm)
            .weight(weight)
            .avoid_highways(avoid_highways);

        Ok((place, request))
    }
}

async fn route_geojson(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RouteParams>,
) -> Result<Json<Feature>, ApiError> {
    let (place, request) = params.parse()?;
    tracing::debug!(
        "Route on '{place}': {} by {}, avoid_highways={}",
        request.algorithm,
        request.weight,
        request.avoid_highways
    );

    let feature = run_blocking(&state, move |state| {
        let network = state.cache.get_or_load(&place)?;
        let outcome = shortest_route(&network, &request)?;
        let summary = summarize(&outcome.view, &outcome.route, request.weight);
        let properties = RouteProperties::new(
            request.algorithm,
            request.weight,
            request.avoid_highways,
            &summary,
        );

        Ok(route_to_feature(&outcome.view, outcome.route.nodes(), &properties)?)
    })
    .await?;

    Ok(Json(feature))
}

fn coordinate(name: &'static str, raw: Option<&str>) -> Result<f64, ApiError> {
    let raw = raw.ok_or(ApiError::MissingParam(name))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ApiError::InvalidParam(name))
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Runs `job` on the blocking pool, failing once the request time limit passes
async fn run_blocking<T, F>(state: &Arc<AppState>, job: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let limit = state.request_timeout;
    let shared = Arc::clone(state);
    let task = tokio::task::spawn_blocking(move || job(&shared));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ApiError::Internal(format!(
            "route computation failed: {join_error}"
        ))),
        Err(_) => Err(ApiError::Internal(format!(
            "route computation timed out after {:.1}s",
            limit.as_secs_f64()
        ))),
    }
}
