//! Point-to-point route query over a road network

use std::{borrow::Cow, fmt, str::FromStr};

use geo::{Distance, Haversine, Point};
use petgraph::{
    algo::astar,
    graph::{EdgeReference, NodeIndex},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, OsmNodeId, cost,
    filter::filtered_network,
    model::{RoadEdge, RoadNetwork},
};

/// Path search variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Exact lowest-cost search without a heuristic
    #[default]
    Dijkstra,
    /// Lowest-cost search guided by the geodesic distance to the destination
    AStar,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" => Ok(Algorithm::AStar),
            _ => Err(Error::InvalidAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge attribute minimized by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// Segment length in meters
    #[default]
    Distance,
    /// Derived travel time in seconds
    Time,
}

impl WeightMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightMode::Distance => "distance",
            WeightMode::Time => "time",
        }
    }

    fn edge_cost(self, edge: &RoadEdge) -> f64 {
        match self {
            WeightMode::Distance => edge.length,
            WeightMode::Time => edge.travel_time.unwrap_or_default(),
        }
    }
}

impl FromStr for WeightMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" => Ok(WeightMode::Distance),
            "time" => Ok(WeightMode::Time),
            _ => Err(Error::InvalidWeightMode(s.to_string())),
        }
    }
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of a single route query
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest {
    /// Origin (x = lon, y = lat)
    pub origin: Point<f64>,
    /// Destination (x = lon, y = lat)
    pub destination: Point<f64>,
    pub algorithm: Algorithm,
    pub weight: WeightMode,
    pub avoid_highways: bool,
}

impl RouteRequest {
    /// Request between two `(lat, lon)` pairs with default options
    pub fn new(origin: (f64, f64), destination: (f64, f64)) -> Self {
        Self {
            origin: Point::new(origin.1, origin.0),
            destination: Point::new(destination.1, destination.0),
            algorithm: Algorithm::default(),
            weight: WeightMode::default(),
            avoid_highways: false,
        }
    }

    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: WeightMode) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn avoid_highways(mut self, avoid: bool) -> Self {
        self.avoid_highways = avoid;
        self
    }
}

/// Ordered node sequence of a path, both endpoints included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    nodes: Vec<NodeIndex>,
}

impl Route {
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// OSM IDs of the route nodes, in order
    pub fn osm_ids(&self, network: &RoadNetwork) -> Vec<OsmNodeId> {
        self.nodes
            .iter()
            .filter_map(|&node| network.osm_id(node))
            .collect()
    }
}

/// Result of [`shortest_route`].
///
/// `view` is the network the search ran on: the cached network itself, or a
/// filtered and/or time-annotated copy of it. Summaries must read edge
/// attributes from here.
#[derive(Debug)]
pub struct RouteOutcome<'a> {
    pub route: Route,
    pub cost: f64,
    pub view: Cow<'a, RoadNetwork>,
}

/// Finds the lowest-cost route between the request endpoints.
///
/// # Errors
///
/// - [`Error::NoPointsFound`] if the network has no nodes to snap to
/// - [`Error::NoPath`] if the snapped nodes are not connected in the searched view
pub fn shortest_route<'a>(
    network: &'a RoadNetwork,
    request: &RouteRequest,
) -> Result<RouteOutcome<'a>, Error> {
    let (origin, origin_offset) = network
        .nearest_node(&request.origin)
        .ok_or(Error::NoPointsFound)?;
    let (destination, destination_offset) = network
        .nearest_node(&request.destination)
        .ok_or(Error::NoPointsFound)?;

    log::debug!(
        "Snapped origin to {origin:?} ({origin_offset:.1} m), destination to {destination:?} ({destination_offset:.1} m)"
    );

    let mut view = filtered_network(network, request.avoid_highways);
    if request.weight == WeightMode::Time {
        // Annotate a private copy; the cached network is never touched.
        cost::apply_travel_times(view.to_mut());
    }

    let Some((total, nodes)) = search(&view, origin, destination, request) else {
        return Err(Error::NoPath {
            from: network.osm_id(origin).unwrap_or_default(),
            to: network.osm_id(destination).unwrap_or_default(),
        });
    };

    log::debug!(
        "{} {} search found {} nodes, cost {total:.1}",
        request.algorithm,
        request.weight,
        nodes.len()
    );

    Ok(RouteOutcome {
        route: Route::new(nodes),
        cost: total,
        view,
    })
}

fn search(
    view: &RoadNetwork,
    origin: NodeIndex,
    destination: NodeIndex,
    request: &RouteRequest,
) -> Option<(f64, Vec<NodeIndex>)> {
    let weight = request.weight;
    let goal = view.node(destination)?.geometry;

    // Converts straight-line meters into a lower bound of the selected cost.
    let scale = match (request.algorithm, weight) {
        (Algorithm::Dijkstra, _) => 0.0,
        (Algorithm::AStar, WeightMode::Distance) => 1.0,
        (Algorithm::AStar, WeightMode::Time) => 3.6 / cost::max_speed_kmh(view),
    };

    astar(
        &view.graph,
        origin,
        |node| node == destination,
        |edge: EdgeReference<'_, RoadEdge>| weight.edge_cost(edge.weight()),
        |node| {
            if scale == 0.0 {
                return 0.0;
            }
            view.node(node)
                .map_or(0.0, |n| Haversine.distance(n.geometry, goal) * scale)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_choices() {
        assert_eq!("Dijkstra".parse::<Algorithm>().unwrap(), Algorithm::Dijkstra);
        assert_eq!("ASTAR".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!("time".parse::<WeightMode>().unwrap(), WeightMode::Time);
        assert!(matches!(
            "bellman-ford".parse::<Algorithm>(),
            Err(Error::InvalidAlgorithm(name)) if name == "bellman-ford"
        ));
        assert!(matches!(
            "fuel".parse::<WeightMode>(),
            Err(Error::InvalidWeightMode(_))
        ));
    }

    #[test]
    fn request_takes_lat_lon_pairs() {
        let request = RouteRequest::new((40.742, -74.032), (40.735, -74.027));
        assert_eq!(request.origin.x(), -74.032);
        assert_eq!(request.origin.y(), 40.742);
        assert_eq!(request.algorithm, Algorithm::Dijkstra);
        assert_eq!(request.weight, WeightMode::Distance);
        assert!(!request.avoid_highways);
    }

    #[test]
    fn empty_network_has_nothing_to_snap() {
        let network = RoadNetwork::builder().build();
        let request = RouteRequest::new((0.0, 0.0), (1.0, 1.0));
        assert!(matches!(
            shortest_route(&network, &request),
            Err(Error::NoPointsFound)
        ));
    }
}
