//! Data model for road routing
//!
//! Contains the road network graph and the tag values attached to its edges.

pub mod streets;
pub mod tags;

pub use streets::{RoadEdge, RoadNetwork, RoadNetworkBuilder, RoadNode};
pub use tags::TagValue;
