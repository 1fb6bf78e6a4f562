//! Road routing over drivable OpenStreetMap networks.
//!
//! The crate turns a place's OSM extract into a directed multigraph, derives
//! per-edge travel times, and finds shortest routes by distance or time,
//! optionally avoiding motorways. Routes are summarized into totals and
//! exported as `GeoJSON`.

pub mod cache;
pub mod cost;
mod error;
pub mod filter;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

/// OSM node identifier
pub type OsmNodeId = i64;
/// Distance in meters
pub type Meters = f64;
/// Duration in seconds
pub type Seconds = f64;
