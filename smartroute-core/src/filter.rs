//! Highway avoidance: a view of the network without motorway-class edges.

use std::borrow::Cow;

use crate::model::RoadNetwork;

/// Road classes removed when highways are avoided
pub const HIGHWAY_CLASSES: [&str; 2] = ["motorway", "motorway_link"];

pub fn is_highway_class(class: &str) -> bool {
    HIGHWAY_CLASSES.contains(&class)
}

/// Returns the network to search.
///
/// Without avoidance the input is borrowed as is. With avoidance an owned copy
/// without motorway edges is returned; the input is never modified, so a
/// cached network stays usable for later queries.
pub fn filtered_network(network: &RoadNetwork, avoid_highways: bool) -> Cow<'_, RoadNetwork> {
    if !avoid_highways {
        return Cow::Borrowed(network);
    }

    let filtered = network.retain_edges(|edge| !edge.highway_class().is_some_and(is_highway_class));
    log::debug!(
        "Highway filter removed {} of {} edges",
        network.edge_count() - filtered.edge_count(),
        network.edge_count()
    );
    Cow::Owned(filtered)
}
