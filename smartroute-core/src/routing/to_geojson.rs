use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use serde_json::json;

use crate::{
    Error, Meters, Seconds,
    model::RoadNetwork,
    routing::{
        query::{Algorithm, WeightMode},
        summary::RouteSummary,
    },
};

/// Properties attached to a route feature
#[derive(Debug, Clone, Serialize)]
pub struct RouteProperties {
    pub algorithm: Algorithm,
    pub weight: WeightMode,
    pub avoid_highways: bool,
    pub distance_m: Meters,
    pub duration_s: Seconds,
    pub nodes: usize,
}

impl RouteProperties {
    pub fn new(
        algorithm: Algorithm,
        weight: WeightMode,
        avoid_highways: bool,
        summary: &RouteSummary,
    ) -> Self {
        Self {
            algorithm,
            weight,
            avoid_highways,
            distance_m: summary.distance_m,
            duration_s: summary.duration_s,
            nodes: summary.nodes,
        }
    }
}

/// Node positions of a route, in order, as `(x = lon, y = lat)`
pub fn route_coordinates(network: &RoadNetwork, nodes: &[NodeIndex]) -> LineString<f64> {
    nodes
        .iter()
        .filter_map(|&node| network.node(node))
        .map(|node| Coord::from(node.geometry))
        .collect()
}

/// Converts a route to a `GeoJSON` `Feature` with a `LineString` geometry.
pub fn route_to_feature(
    network: &RoadNetwork,
    nodes: &[NodeIndex],
    properties: &RouteProperties,
) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&route_coordinates(network, nodes)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
