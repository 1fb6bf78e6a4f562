use thiserror::Error;

use crate::OsmNodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("No path between node {from} and node {to}")]
    NoPath { from: OsmNodeId, to: OsmNodeId },
    #[error("Algorithm must be 'dijkstra' or 'astar', got '{0}'")]
    InvalidAlgorithm(String),
    #[error("Weight must be 'distance' or 'time', got '{0}'")]
    InvalidWeightMode(String),
    #[error("No map data found for place '{0}'")]
    PlaceNotFound(String),
    #[error("No drivable roads found for place '{0}'")]
    EmptyNetwork(String),
    #[error("OSM error: {0}")]
    OsmError(#[from] osmpbf::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
