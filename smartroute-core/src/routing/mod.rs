//! Route computation: query, summary and `GeoJSON` output

pub mod query;
pub mod summary;
pub mod to_geojson;

pub use query::{Algorithm, Route, RouteOutcome, RouteRequest, WeightMode, shortest_route};
pub use summary::{RouteSummary, summarize, total_length, total_travel_time};
pub use to_geojson::{RouteProperties, route_coordinates, route_to_feature};
