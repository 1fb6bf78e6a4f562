//! This module is responsible for turning map data for a place into a
//! drivable road network.

mod builder;
mod config;
mod osm;

pub use builder::create_road_network;
pub use config::{NetworkSourceConfig, place_slug};

use crate::{Error, model::RoadNetwork};

/// Builds the road network of a place by name
pub trait NetworkLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the place is unknown or its data cannot be read
    fn load(&self, place: &str) -> Result<RoadNetwork, Error>;
}

/// Loads networks from OSM PBF extracts on disk
#[derive(Debug, Clone)]
pub struct OsmPbfLoader {
    config: NetworkSourceConfig,
}

impl OsmPbfLoader {
    pub fn new(config: NetworkSourceConfig) -> Self {
        Self { config }
    }
}

impl NetworkLoader for OsmPbfLoader {
    fn load(&self, place: &str) -> Result<RoadNetwork, Error> {
        create_road_network(&self.config, place)
    }
}
