// Re-export key components
pub use crate::cache::NetworkCache;
pub use crate::cost::{apply_travel_times, edge_speed_kmh, parse_maxspeed_kmh, travel_time_seconds};
pub use crate::filter::filtered_network;
pub use crate::loading::{NetworkLoader, NetworkSourceConfig, OsmPbfLoader, create_road_network};
pub use crate::model::{RoadEdge, RoadNetwork, RoadNetworkBuilder, RoadNode, TagValue};
pub use crate::routing::{
    Algorithm, Route, RouteOutcome, RouteProperties, RouteRequest, RouteSummary, WeightMode,
    route_to_feature, shortest_route, summarize, total_length, total_travel_time,
};

// Core types
pub use crate::Error;
pub use crate::Meters;
pub use crate::OsmNodeId;
pub use crate::Seconds;
