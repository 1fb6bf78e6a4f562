use log::info;

use super::config::NetworkSourceConfig;
use super::osm::read_drivable_network;
use crate::{Error, model::RoadNetwork};

/// Builds the drivable road network of a place from its OSM extract
///
/// # Errors
///
/// Returns an error if the place has no extract, the extract cannot be read,
/// or it contains no drivable roads
pub fn create_road_network(config: &NetworkSourceConfig, place: &str) -> Result<RoadNetwork, Error> {
    let path = config.resolve(place)?;
    info!("Processing street data (OSM) for '{place}': {}", path.display());

    let network = read_drivable_network(&path)?;
    if network.edge_count() == 0 {
        return Err(Error::EmptyNetwork(place.to_string()));
    }

    info!(
        "Road network for '{place}' ready: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );

    // Decoding the extract leaves freed blocks in the allocator; hand them
    // back to the OS since the network lives for the rest of the process.
    // SAFETY: glibc only, enforced by the cfg below.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::debug!("Memory trimming released nothing");
        }
    }

    Ok(network)
}
